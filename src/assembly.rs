//! Composite curve chain reconstruction
//!
//! Children of a composite curve are often written in arbitrary order and
//! orientation. Each child contributes two endpoint slots, `2i` (start) and
//! `2i + 1` (end). Every slot is matched to its nearest slot on a different
//! child; matches further apart than the join tolerance are dropped. The
//! chain then starts from an unmatched slot (or slot 0 for a closed loop)
//! and follows the matches child by child.

use crate::types::Vector3;

/// Default distance under which two endpoints are considered joined
pub const DEFAULT_JOIN_TOLERANCE: f64 = 1e-5;

/// One child in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainStep {
    /// Index into the input endpoint list
    pub child: usize,
    /// The child must be traversed end to start
    pub reversed: bool,
}

/// Result of assembling one composite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeAssembly {
    /// Children reached by the walk, in chain order
    pub steps: Vec<ChainStep>,
    /// The walk returned to the slot it started from
    pub closed: bool,
    /// Slots with more than one other slot within tolerance
    pub ambiguous: Vec<usize>,
    /// Children the walk never reached, in input order
    pub unreached: Vec<usize>,
}

impl CompositeAssembly {
    /// Whether every child joined the chain unambiguously
    pub fn is_clean(&self) -> bool {
        self.ambiguous.is_empty() && self.unreached.is_empty()
    }
}

/// Nearest-endpoint chain builder
#[derive(Debug, Clone, Copy)]
pub struct CompositeCurveAssembler {
    tolerance: f64,
}

impl Default for CompositeCurveAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_JOIN_TOLERANCE)
    }
}

impl CompositeCurveAssembler {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Order and orient children given their `(start, end)` points
    pub fn assemble(&self, endpoints: &[(Vector3, Vector3)]) -> CompositeAssembly {
        let count = endpoints.len();
        if count == 0 {
            return CompositeAssembly::default();
        }
        if count == 1 {
            let (start, end) = endpoints[0];
            return CompositeAssembly {
                steps: vec![ChainStep { child: 0, reversed: false }],
                closed: start.distance(&end) <= self.tolerance,
                ..CompositeAssembly::default()
            };
        }

        let slot_point = |slot: usize| {
            let (start, end) = endpoints[slot / 2];
            if slot % 2 == 0 {
                start
            } else {
                end
            }
        };

        let slots = 2 * count;
        let mut nearest: Vec<Option<(usize, f64)>> = vec![None; slots];
        let mut within = vec![0usize; slots];
        for a in 0..slots {
            for b in 0..slots {
                if a / 2 == b / 2 {
                    continue;
                }
                let d = slot_point(a).distance(&slot_point(b));
                if d <= self.tolerance {
                    within[a] += 1;
                }
                // Strict comparison keeps the first of equally near slots.
                if nearest[a].map_or(true, |(_, best)| d < best) {
                    nearest[a] = Some((b, d));
                }
            }
        }

        let links: Vec<Option<usize>> = nearest
            .iter()
            .map(|n| n.filter(|&(_, d)| d <= self.tolerance).map(|(slot, _)| slot))
            .collect();

        let start = links.iter().position(Option::is_none).unwrap_or(0);
        let mut visited = vec![false; count];
        let mut steps = Vec::with_capacity(count);
        let mut closed = false;
        let mut slot = start;
        loop {
            let child = slot / 2;
            visited[child] = true;
            steps.push(ChainStep {
                child,
                reversed: slot % 2 == 1,
            });
            let Some(next) = links[slot ^ 1] else {
                break;
            };
            if next == start {
                closed = true;
                break;
            }
            if visited[next / 2] {
                break;
            }
            slot = next;
        }

        CompositeAssembly {
            steps,
            closed,
            ambiguous: (0..slots).filter(|&s| within[s] > 1).collect(),
            unreached: (0..count).filter(|&c| !visited[c]).collect(),
        }
    }
}
