//! Rational B-spline curve entity (type 126)
//!
//! Parameter layout, with `N = 1 + K - M` and `A = N + 2M`:
//!
//! | index              | content                        |
//! |--------------------|--------------------------------|
//! | 1, 2               | `K` (upper control index), `M` (degree) |
//! | 3..=6              | property flags                 |
//! | 7..=7+A            | knot sequence                  |
//! | 8+A..=8+A+K        | weights                        |
//! | 9+A+K..=11+A+4K    | control points (x, y, z)       |
//! | 12+A+4K, 13+A+4K   | parameter range `V0`, `V1`     |
//! | 14+A+4K..=16+A+4K  | unit normal (planar curves)    |

use super::curve::parameter_steps;
use super::{Curve, DirectoryEntry, Entity};
use crate::error::Result;
use crate::io::iges::parameters::ParameterList;
use crate::types::{Transform, Vector3};
use bitflags::bitflags;
use nalgebra::Vector4;
use std::fmt;

/// Polyline segments used to approximate curve length
pub const DEFAULT_LENGTH_SAMPLES: usize = 64;

const NAME: &str = "RationalBSplineCurve";

bitflags! {
    /// Property flags (parameters 3-6)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BSplineProperties: u8 {
        /// Curve lies in the plane given by the normal
        const PLANAR = 0x1;
        /// Start and end coincide
        const CLOSED = 0x2;
        /// All weights equal
        const POLYNOMIAL = 0x4;
        const PERIODIC = 0x8;
    }
}

/// A rational B-spline curve
#[derive(Debug, Clone)]
pub struct RationalBSplineCurve {
    /// Directory entry data
    pub directory: DirectoryEntry,
    /// Upper index of the control points (`K + 1` points)
    pub k: usize,
    /// Degree
    pub m: usize,
    pub properties: BSplineProperties,
    pub knots: Vec<f64>,
    pub weights: Vec<f64>,
    pub control_points: Vec<Vector3>,
    /// Start of the parameter range
    pub v0: f64,
    /// End of the parameter range
    pub v1: f64,
    /// Plane normal, present on planar curves that record one
    pub normal: Option<Vector3>,
    /// Traversed from `v1` to `v0`
    pub reversed: bool,
    length_samples: usize,
    transform: Transform,
}

impl RationalBSplineCurve {
    pub const TYPE_CODE: i32 = 126;

    pub fn new() -> Self {
        RationalBSplineCurve {
            directory: DirectoryEntry::new(Self::TYPE_CODE),
            k: 0,
            m: 0,
            properties: BSplineProperties::empty(),
            knots: Vec::new(),
            weights: Vec::new(),
            control_points: Vec::new(),
            v0: 0.0,
            v1: 0.0,
            normal: None,
            reversed: false,
            length_samples: DEFAULT_LENGTH_SAMPLES,
            transform: Transform::identity(),
        }
    }

    /// Build from control data; the parameter range covers the clamped
    /// knot interval
    pub fn from_control_points(
        degree: usize,
        knots: Vec<f64>,
        weights: Vec<f64>,
        control_points: Vec<Vector3>,
    ) -> Self {
        let k = control_points.len().saturating_sub(1);
        let v0 = knots.get(degree).copied().unwrap_or(0.0);
        let v1 = knots.get(k + 1).copied().unwrap_or(1.0);
        RationalBSplineCurve {
            k,
            m: degree,
            knots,
            weights,
            control_points,
            v0,
            v1,
            ..Self::new()
        }
    }

    /// Number of knot spans, `1 + K - M`
    pub fn n(&self) -> usize {
        1 + self.k - self.m
    }

    /// Index offset `N + 2M`; the knot sequence holds `A + 1` values
    pub fn a(&self) -> usize {
        self.n() + 2 * self.m
    }

    /// Segments used by `length`
    pub fn length_samples(&self) -> usize {
        self.length_samples
    }

    pub fn set_length_samples(&mut self, samples: usize) {
        self.length_samples = samples.max(1);
    }

    /// Knot span containing `u`, clamped to the valid range
    fn find_span(&self, u: f64) -> usize {
        let last = self.k;
        if u >= self.knots[last + 1] {
            return last;
        }
        (self.m..=last)
            .rev()
            .find(|&i| self.knots[i] <= u)
            .unwrap_or(self.m)
    }

    /// Point at curve parameter `u` in definition space
    ///
    /// De Boor's algorithm on homogeneous control points `(w·P, w)`.
    pub fn evaluate(&self, u: f64) -> Vector3 {
        if self.control_points.is_empty() {
            return Vector3::ZERO;
        }
        let p = self.m;
        let lo = self.knots[p];
        let hi = self.knots[self.k + 1];
        let u = u.clamp(lo.min(hi), hi.max(lo));
        let span = self.find_span(u);

        let mut d: Vec<Vector4<f64>> = (0..=p)
            .map(|j| {
                let i = span - p + j;
                let w = self.weights[i];
                let c = self.control_points[i];
                Vector4::new(c.x * w, c.y * w, c.z * w, w)
            })
            .collect();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = span - p + j;
                let denom = self.knots[i + p + 1 - r] - self.knots[i];
                let alpha = if denom.abs() > 0.0 {
                    (u - self.knots[i]) / denom
                } else {
                    0.0
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }

        let h = d[p];
        if h.w.abs() > 0.0 {
            Vector3::new(h.x / h.w, h.y / h.w, h.z / h.w)
        } else {
            Vector3::new(h.x, h.y, h.z)
        }
    }

    /// Curve parameter for traversal fraction `t`
    fn parameter(&self, t: f64) -> f64 {
        if self.reversed {
            self.v1 + t * (self.v0 - self.v1)
        } else {
            self.v0 + t * (self.v1 - self.v0)
        }
    }
}

/// `A` and the index of `V1` for upper index `k` and degree `m`, or `None`
/// when the layout does not fit in `usize`
fn record_end(k: usize, m: usize) -> Option<(usize, usize)> {
    let n = k.checked_sub(m)?.checked_add(1)?;
    let a = m.checked_mul(2)?.checked_add(n)?;
    let last = k.checked_mul(4)?.checked_add(a)?.checked_add(13)?;
    Some((a, last))
}

impl Default for RationalBSplineCurve {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for RationalBSplineCurve {
    fn directory(&self) -> &DirectoryEntry {
        &self.directory
    }

    fn directory_mut(&mut self) -> &mut DirectoryEntry {
        &mut self.directory
    }

    fn entity_name(&self) -> &'static str {
        NAME
    }

    fn load_parameters(&mut self, params: &ParameterList) -> Result<()> {
        let k = params.count(1, NAME)?;
        let m = params.count(2, NAME)?;
        if k < m {
            return Err(params.invalid(1, &k.to_string(), "upper index no smaller than the degree"));
        }

        let mut properties = BSplineProperties::empty();
        for (index, flag) in [
            (3, BSplineProperties::PLANAR),
            (4, BSplineProperties::CLOSED),
            (5, BSplineProperties::POLYNOMIAL),
            (6, BSplineProperties::PERIODIC),
        ] {
            properties.set(flag, params.integer(index, NAME)? != 0);
        }

        // Every offset below is bounded by the V1 index.
        let a = record_end(k, m)
            .filter(|&(_, last)| last < params.len())
            .map(|(a, _)| a)
            .ok_or_else(|| {
                let last = record_end(k, m).map_or(usize::MAX, |(_, last)| last);
                params.missing(last, NAME)
            })?;
        let knots = params.reals(7..8 + a, NAME)?;
        let weights = params.reals(8 + a..9 + a + k, NAME)?;
        let control_points = (0..=k)
            .map(|i| params.point(9 + a + k + 3 * i, NAME))
            .collect::<Result<Vec<_>>>()?;
        let v0 = params.real(12 + a + 4 * k, NAME)?;
        let v1 = params.real(13 + a + 4 * k, NAME)?;
        let normal = if params.has(16 + a + 4 * k) {
            Some(params.point(14 + a + 4 * k, NAME)?)
        } else {
            None
        };

        self.k = k;
        self.m = m;
        self.properties = properties;
        self.knots = knots;
        self.weights = weights;
        self.control_points = control_points;
        self.v0 = v0;
        self.v1 = v1;
        self.normal = normal;
        Ok(())
    }
}

impl Curve for RationalBSplineCurve {
    fn endpoints(&self) -> (Vector3, Vector3) {
        (self.point_at(0.0), self.point_at(1.0))
    }

    fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Polyline approximation over `length_samples` segments
    fn length(&self) -> f64 {
        self.linspace(self.length_samples + 1, true)
            .windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }

    fn point_at(&self, t: f64) -> Vector3 {
        self.transform.apply(self.evaluate(self.parameter(t)))
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn linspace(&self, n: usize, endpoint: bool) -> Vec<Vector3> {
        let local: Vec<Vector3> = parameter_steps(n, endpoint)
            .into_iter()
            .map(|t| self.evaluate(self.parameter(t)))
            .collect();
        self.transform.apply_points(&local)
    }
}

impl fmt::Display for RationalBSplineCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RationalBSplineCurve degree {} with {} control points over [{}, {}]",
            self.m,
            self.control_points.len(),
            self.v0,
            self.v1
        )?;
        if self.reversed {
            write!(f, " (reversed)")?;
        }
        Ok(())
    }
}
