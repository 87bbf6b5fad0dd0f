//! Sampling interface shared by curve entities
//!
//! Curves are parameterised on `t ∈ [0, 1]` from their current start to
//! their current end, in model space (after the attached transform). The
//! default `linspace`/`arange` implementations are built on `point_at`;
//! curves with a cheaper batched path override `linspace`.

use crate::types::{Transform, Vector3};

/// Geometry that can report endpoints and be sampled
pub trait Curve {
    /// Model-space start and end points in the current orientation
    fn endpoints(&self) -> (Vector3, Vector3);

    /// Flip the orientation in place; the geometric locus is unchanged
    fn reverse(&mut self);

    /// Model-space arc length
    fn length(&self) -> f64;

    /// Model-space point at parameter `t` (0 = start, 1 = end)
    fn point_at(&self, t: f64) -> Vector3;

    /// Transform currently applied to the local definition
    fn transform(&self) -> &Transform;

    /// Replace the applied transform and refresh cached endpoints
    fn set_transform(&mut self, transform: Transform);

    /// `n` points from start to end
    ///
    /// With `endpoint` the last point is the end point; without it the
    /// spacing is `1/n` and the end is excluded.
    fn linspace(&self, n: usize, endpoint: bool) -> Vec<Vector3> {
        parameter_steps(n, endpoint)
            .into_iter()
            .map(|t| self.point_at(t))
            .collect()
    }

    /// Points spaced about `dx` apart along the curve
    fn arange(&self, dx: f64, endpoint: bool) -> Vec<Vector3> {
        self.linspace(sample_count(self.length(), dx), endpoint)
    }
}

/// Evenly spaced parameters in `[0, 1]`
pub fn parameter_steps(n: usize, endpoint: bool) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let divisions = (if endpoint { n - 1 } else { n }) as f64;
            (0..n).map(|i| i as f64 / divisions).collect()
        }
    }
}

/// Number of samples for a spacing of `dx` over `length`: `⌈length / dx⌉`
///
/// Non-positive or non-finite spacing yields no samples.
pub fn sample_count(length: f64, dx: f64) -> usize {
    if !(dx > 0.0 && dx.is_finite()) || !length.is_finite() {
        return 0;
    }
    (length / dx).ceil().max(0.0) as usize
}

/// A curve as seen through the document: either a single curve entity or
/// an assembled composite of further curves
pub enum CurveRef<'a> {
    Single(&'a dyn Curve),
    Chain {
        children: Vec<CurveRef<'a>>,
        closed: bool,
    },
}

impl<'a> CurveRef<'a> {
    pub fn endpoints(&self) -> Option<(Vector3, Vector3)> {
        match self {
            CurveRef::Single(curve) => Some(curve.endpoints()),
            CurveRef::Chain { children, .. } => {
                let (start, _) = children.first()?.endpoints()?;
                let (_, end) = children.last()?.endpoints()?;
                Some((start, end))
            }
        }
    }

    pub fn length(&self) -> f64 {
        match self {
            CurveRef::Single(curve) => curve.length(),
            CurveRef::Chain { children, .. } => children.iter().map(CurveRef::length).sum(),
        }
    }

    /// Whether the endpoints of the chain meet
    pub fn is_closed(&self) -> bool {
        match self {
            CurveRef::Single(_) => false,
            CurveRef::Chain { closed, .. } => *closed,
        }
    }

    /// Number of leaf curves
    pub fn leaf_count(&self) -> usize {
        match self {
            CurveRef::Single(_) => 1,
            CurveRef::Chain { children, .. } => children.iter().map(CurveRef::leaf_count).sum(),
        }
    }

    /// Point at arc-length fraction `t` along the whole chain
    pub fn point_at(&self, t: f64) -> Option<Vector3> {
        match self {
            CurveRef::Single(curve) => Some(curve.point_at(t)),
            CurveRef::Chain { children, .. } => {
                let lengths: Vec<f64> = children.iter().map(CurveRef::length).collect();
                let total: f64 = lengths.iter().sum();
                if total <= 0.0 {
                    return children.first()?.point_at(0.0);
                }
                let mut remaining = t.clamp(0.0, 1.0) * total;
                for (child, &len) in children.iter().zip(&lengths) {
                    if remaining <= len && len > 0.0 {
                        return child.point_at(remaining / len);
                    }
                    remaining -= len;
                }
                children.last()?.point_at(1.0)
            }
        }
    }

    /// `n` points spaced evenly in arc length
    pub fn linspace(&self, n: usize, endpoint: bool) -> Vec<Vector3> {
        match self {
            CurveRef::Single(curve) => curve.linspace(n, endpoint),
            CurveRef::Chain { .. } => parameter_steps(n, endpoint)
                .into_iter()
                .filter_map(|t| self.point_at(t))
                .collect(),
        }
    }

    pub fn arange(&self, dx: f64, endpoint: bool) -> Vec<Vector3> {
        self.linspace(sample_count(self.length(), dx), endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_steps_with_endpoint() {
        assert_eq!(parameter_steps(3, true), vec![0.0, 0.5, 1.0]);
        assert_eq!(parameter_steps(1, true), vec![0.0]);
        assert!(parameter_steps(0, true).is_empty());
    }

    #[test]
    fn test_parameter_steps_without_endpoint() {
        assert_eq!(parameter_steps(4, false), vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_count(10.0, 3.0), 4);
        assert_eq!(sample_count(10.0, 2.5), 4);
        assert_eq!(sample_count(0.0, 1.0), 0);
        assert_eq!(sample_count(10.0, 0.0), 0);
        assert_eq!(sample_count(10.0, -1.0), 0);
        assert_eq!(sample_count(10.0, f64::NAN), 0);
    }
}
