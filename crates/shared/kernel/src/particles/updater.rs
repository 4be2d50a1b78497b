use super::ParticleCollection;
use crate::pbc::SimulationBox;
use crate::vec::Vector;

/// Sequential event applier.
///
/// Each slot can be claimed once; checked operations fail on an already claimed slot, which is
/// how conflicting reaction events are resolved. Additions and removals are buffered until
/// [`ParticleCollectionUpdater::finish`], in-place updates are applied immediately.
#[derive(Debug)]
pub struct ParticleCollectionUpdater<'a, const D: usize> {
    collection: &'a mut ParticleCollection<D>,
    sim_box: &'a SimulationBox<D>,
    claimed: Vec<bool>,
    to_add: Vec<(Vector<D>, usize)>,
    to_remove: Vec<usize>,
}

impl<'a, const D: usize> ParticleCollectionUpdater<'a, D> {
    pub fn new(collection: &'a mut ParticleCollection<D>, sim_box: &'a SimulationBox<D>) -> Self {
        let claimed = vec![false; collection.len()];
        Self { collection, sim_box, claimed, to_add: Vec::new(), to_remove: Vec::new() }
    }

    #[must_use]
    pub fn collection(&self) -> &ParticleCollection<D> {
        &*self.collection
    }

    #[must_use]
    pub const fn sim_box(&self) -> &SimulationBox<D> {
        self.sim_box
    }

    /// Marks a live slot as taken; `false` if it is blank or already claimed.
    pub fn claim(&mut self, ix: usize) -> bool {
        if !self.collection.exists(ix) {
            return false;
        }
        match self.claimed.get_mut(ix) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            },
            _ => false,
        }
    }

    pub fn release(&mut self, ix: usize) {
        if let Some(flag) = self.claimed.get_mut(ix) {
            *flag = false;
        }
    }

    #[must_use]
    pub fn is_claimed(&self, ix: usize) -> bool {
        self.claimed.get(ix).copied().unwrap_or(false)
    }

    /// Queues a new particle; the position is wrapped into the box first.
    pub fn add(&mut self, ty: usize, pos: Vector<D>) {
        self.to_add.push((self.sim_box.wrapped(pos), ty));
    }

    /// Queues `ix` for removal. With `checked` the slot must be claimable.
    pub fn remove(&mut self, ix: usize, checked: bool) -> bool {
        if checked && !self.claim(ix) {
            return false;
        }
        self.to_remove.push(ix);
        true
    }

    /// Changes type and/or position of `ix` in place. With `checked` the slot must be claimable.
    pub fn direct_update(&mut self, ix: usize, ty: Option<usize>, pos: Option<Vector<D>>, checked: bool) -> bool {
        if checked && !self.claim(ix) {
            return false;
        }
        if let Some(ty) = ty {
            self.collection.set_type(ix, ty);
        }
        if let Some(pos) = pos {
            self.collection.set_position(ix, self.sim_box.wrapped(pos));
        }
        true
    }

    #[must_use]
    pub fn pending(&self) -> (usize, usize) {
        (self.to_add.len(), self.to_remove.len())
    }

    /// Applies the buffered additions and removals.
    pub fn finish(self) {
        let Self { collection, to_add, to_remove, .. } = self;
        collection.update(to_add, to_remove);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ParticleCollection<2>, SimulationBox<2>) {
        let mut c = ParticleCollection::new();
        for i in 0..4 {
            c.add_particle(Vector::new([f64::from(i) * 0.5, 0.]), 0);
        }
        (c, SimulationBox::new([4., 4.], true))
    }

    #[test]
    fn test_claims_are_exclusive() {
        let (mut c, b) = setup();
        let mut up = ParticleCollectionUpdater::new(&mut c, &b);
        assert!(up.claim(1));
        assert!(!up.claim(1));
        assert!(!up.claim(17));
        up.release(1);
        assert!(up.claim(1));
        assert!(!up.remove(1, true));
        assert!(up.remove(1, false));
    }

    #[test]
    fn test_direct_update_wraps_position() {
        let (mut c, b) = setup();
        let mut up = ParticleCollectionUpdater::new(&mut c, &b);
        assert!(up.direct_update(0, Some(3), Some(Vector::new([2.5, 0.])), true));
        assert!(!up.direct_update(0, Some(1), None, true));
        up.finish();
        assert_eq!(c.type_of(0), Some(3));
        assert_eq!(c.position(0), Some(&Vector::new([-1.5, 0.])));
    }

    #[test]
    fn test_finish_applies_batch() {
        let (mut c, b) = setup();
        let mut up = ParticleCollectionUpdater::new(&mut c, &b);
        assert!(up.remove(2, true));
        assert!(up.remove(3, true));
        up.add(5, Vector::new([-2.5, 1.]));
        assert_eq!(up.pending(), (1, 2));
        up.finish();

        assert_eq!(c.len(), 4);
        assert_eq!(c.n_particles(), 3);
        assert_eq!(c.type_of(2), Some(5));
        assert_eq!(c.position(2), Some(&Vector::new([1.5, 1.])));
        assert!(!c.exists(3));
    }
}
