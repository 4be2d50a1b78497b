//! The simulation box, centred at the origin, with optional periodic boundaries.

use crate::vec::Vector;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBox<const D: usize> {
    size: [f64; D],
    periodic: bool,
}

impl<const D: usize> SimulationBox<D> {
    #[must_use]
    pub const fn new(size: [f64; D], periodic: bool) -> Self {
        Self { size, periodic }
    }

    #[must_use]
    pub const fn size(&self) -> &[f64; D] {
        &self.size
    }

    #[must_use]
    pub const fn periodic(&self) -> bool {
        self.periodic
    }

    #[must_use]
    pub fn volume(&self) -> f64 {
        self.size.iter().product()
    }

    /// Shifts every component into `[-L/2, L/2)`; no-op without periodic boundaries.
    pub fn wrap(&self, pos: &mut Vector<D>) {
        if !self.periodic {
            return;
        }
        for (x, &l) in pos.0.iter_mut().zip(self.size.iter()) {
            *x = wrap_component(*x, l);
        }
    }

    #[must_use]
    pub fn wrapped(&self, mut pos: Vector<D>) -> Vector<D> {
        self.wrap(&mut pos);
        pos
    }

    /// Minimum-image difference `p2 - p1`.
    #[must_use]
    pub fn shortest_difference(&self, p1: &Vector<D>, p2: &Vector<D>) -> Vector<D> {
        self.wrapped(*p2 - *p1)
    }

    #[must_use]
    pub fn distance_squared(&self, p1: &Vector<D>, p2: &Vector<D>) -> f64 {
        self.shortest_difference(p1, p2).norm_squared()
    }

    #[must_use]
    pub fn contains(&self, pos: &Vector<D>) -> bool {
        pos.iter().zip(self.size.iter()).all(|(&x, &l)| x >= -0.5 * l && x < 0.5 * l)
    }

    pub fn uniform_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector<D> {
        let mut pos = Vector::zero();
        for (x, &l) in pos.0.iter_mut().zip(self.size.iter()) {
            *x = rng.random_range(-0.5 * l..0.5 * l);
        }
        pos
    }
}

fn wrap_component(x: f64, l: f64) -> f64 {
    let half = 0.5 * l;
    if (-half..half).contains(&x) {
        return x;
    }
    let shifted = x - l * ((x + half) / l).floor();
    // rounding can land exactly on the upper edge
    if shifted >= half { shifted - l } else { shifted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_wrap_periodic() {
        let b = SimulationBox::new([10., 4.], true);
        let mut p = Vector::new([5.5, -2.5]);
        b.wrap(&mut p);
        assert!((p[0] + 4.5).abs() < 1e-12);
        assert!((p[1] - 1.5).abs() < 1e-12);

        let mut edge = Vector::new([5., -2.]);
        b.wrap(&mut edge);
        assert!((edge[0] + 5.).abs() < 1e-12);
        assert!((edge[1] + 2.).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_is_noop_without_periodicity() {
        let b = SimulationBox::new([10., 4.], false);
        let p = Vector::new([50., -20.]);
        assert_eq!(b.wrapped(p), p);
        assert!(!b.contains(&p));
    }

    #[test]
    fn test_minimum_image_distance() {
        let b = SimulationBox::new([10., 10.], true);
        let p1 = Vector::new([4.8, 0.]);
        let p2 = Vector::new([-4.8, 0.]);
        let d = b.shortest_difference(&p1, &p2);
        assert!((d[0] - 0.4).abs() < 1e-12);
        assert!((b.distance_squared(&p1, &p2) - 0.16).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_positions_are_inside() {
        let b = SimulationBox::new([0.3, 0.3, 0.3], true);
        let mut rng = StdRng::seed_from_u64(3);
        assert!((0..1000).all(|_| b.contains(&b.uniform_position(&mut rng))));
    }

    proptest! {
        #[test]
        fn prop_wrap_lands_inside(x in -1e4_f64..1e4, y in -1e4_f64..1e4, lx in 0.1_f64..50., ly in 0.1_f64..50.) {
            let b = SimulationBox::new([lx, ly], true);
            let p = b.wrapped(Vector::new([x, y]));
            prop_assert!(b.contains(&p));
        }

        #[test]
        fn prop_wrap_is_idempotent(x in -1e3_f64..1e3, l in 0.1_f64..20.) {
            let b = SimulationBox::new([l], true);
            let once = b.wrapped(Vector::new([x]));
            prop_assert_eq!(b.wrapped(once), once);
        }

        #[test]
        fn prop_shortest_difference_is_antisymmetric(a in -5_f64..5., c in -5_f64..5.) {
            let b = SimulationBox::new([10.], true);
            let (p1, p2) = (Vector::new([a]), Vector::new([c]));
            let d12 = b.distance_squared(&p1, &p2);
            let d21 = b.distance_squared(&p2, &p1);
            prop_assert!((d12 - d21).abs() < 1e-9);
            prop_assert!(d12 <= 25. + 1e-9);
        }
    }
}
