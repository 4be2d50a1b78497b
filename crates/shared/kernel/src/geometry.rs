use crate::vec::Vector;

/// Axis-aligned box spanned by its lower-left vertex `v0` and upper-right vertex `v1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid<const D: usize> {
    pub v0: Vector<D>,
    pub v1: Vector<D>,
}

impl<const D: usize> Cuboid<D> {
    #[must_use]
    pub const fn new(v0: Vector<D>, v1: Vector<D>) -> Self {
        Self { v0, v1 }
    }

    /// Strict containment; with `inclusion == false` the result is negated.
    #[must_use]
    pub fn contains(&self, pos: &Vector<D>, inclusion: bool) -> bool {
        let inside = (0..D).all(|d| pos[d] > self.v0[d] && pos[d] < self.v1[d]);
        inside == inclusion
    }

    /// Displacement the potential acts against.
    ///
    /// * inclusion: per-axis excess beyond the faces, zero inside.
    /// * exclusion: offset from the closest face along its axis while inside, zero outside.
    #[must_use]
    pub fn smallest_difference(&self, pos: &Vector<D>, inclusion: bool) -> Vector<D> {
        let mut difference = Vector::zero();
        if inclusion {
            for d in 0..D {
                if pos[d] < self.v0[d] {
                    difference[d] = pos[d] - self.v0[d];
                } else if pos[d] > self.v1[d] {
                    difference[d] = pos[d] - self.v1[d];
                }
            }
        } else if self.contains(pos, true) {
            let mut best = (f64::INFINITY, 0, 0.);
            for d in 0..D {
                for face in [self.v0[d], self.v1[d]] {
                    let offset = pos[d] - face;
                    if offset.abs() < best.0 {
                        best = (offset.abs(), d, offset);
                    }
                }
            }
            difference[best.1] = best.2;
        }
        difference
    }

    #[must_use]
    pub fn describe(&self) -> String {
        format!("minimum vertex v0={} and maximum vertex v1={}", self.v0, self.v1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Cuboid<2> {
        Cuboid::new(Vector::new([-1., -1.]), Vector::new([1., 1.]))
    }

    #[test]
    fn test_contains_is_strict() {
        let c = unit_square();
        assert!(c.contains(&Vector::new([0., 0.]), true));
        assert!(!c.contains(&Vector::new([1., 0.]), true));
        assert!(c.contains(&Vector::new([1., 0.]), false));
    }

    #[test]
    fn test_inclusion_difference() {
        let c = unit_square();
        assert_eq!(c.smallest_difference(&Vector::new([0.5, 0.]), true), Vector::zero());
        assert_eq!(c.smallest_difference(&Vector::new([3., -1.5]), true), Vector::new([2., -0.5]));
    }

    #[test]
    fn test_exclusion_difference() {
        let c = unit_square();
        assert_eq!(c.smallest_difference(&Vector::new([5., 0.]), false), Vector::zero());
        let d = c.smallest_difference(&Vector::new([0.2, 0.9]), false);
        assert!(d[0].abs() < 1e-12);
        assert!((d[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_describe() {
        assert_eq!(unit_square().describe(), "minimum vertex v0=(-1, -1) and maximum vertex v1=(1, 1)");
    }
}
