//! Euler-Maruyama for `dY = f(t, Y) dt + sigma(t, Y) dW` with diagonal noise.

use ctiprd_kernel::random::normal_vector;
use ctiprd_kernel::vec::Vector;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct EulerMaruyama<const D: usize> {
    rng: StdRng,
}

impl<const D: usize> EulerMaruyama<D> {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// `y + f(t, y) h + sigma(t, y) * dW` with `dW ~ N(0, h)` per component.
    pub fn step<F, S>(&mut self, f: F, sigma: S, h: f64, t: f64, y: &Vector<D>) -> Vector<D>
    where
        F: Fn(f64, &Vector<D>) -> Vector<D>,
        S: Fn(f64, &Vector<D>) -> Vector<D>,
    {
        let dw = normal_vector::<D, _>(&mut self.rng) * h.sqrt();
        let noise = sigma(t, y);
        let mut next = *y + f(t, y) * h;
        for d in 0..D {
            next[d] += noise[d] * dw[d];
        }
        next
    }

    /// Integrates `n_steps` steps from `(t0, y0)`; the result starts with `(t0, y0)`.
    pub fn eval<F, S>(&mut self, f: F, sigma: S, h: f64, n_steps: usize, t0: f64, y0: Vector<D>) -> Vec<(f64, Vector<D>)>
    where
        F: Fn(f64, &Vector<D>) -> Vector<D>,
        S: Fn(f64, &Vector<D>) -> Vector<D>,
    {
        let mut out = Vec::with_capacity(n_steps + 1);
        let (mut t, mut y) = (t0, y0);
        out.push((t, y));
        for _ in 0..n_steps {
            y = self.step(&f, &sigma, h, t, &y);
            t += h;
            out.push((t, y));
        }
        out
    }
}
