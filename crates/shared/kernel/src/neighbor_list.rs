//! Cell-linked neighbor list.
//!
//! The box is divided into cells of edge `cutoff / n_subdivides`; neighbors of a particle are
//! searched in all cells within `n_subdivides` cells along every axis. Cell contents are kept in
//! a compressed layout: `cell_offsets[c]..cell_offsets[c + 1]` indexes into `cell_particles`.

use crate::error::KernelError;
use crate::index::Index;
use crate::particles::ParticlesView;
use crate::pbc::SimulationBox;
use crate::prefix_sum::PrefixSum;
use crate::vec::Vector;
use ctiprd_pool::{ThreadPool, partition};
use fxhash::FxHashSet;
use tracing::trace;

const NOT_INSERTED: usize = usize::MAX;

/// For every cell, the sorted unique cells within `r` cells along each axis (itself included).
#[derive(Debug, Clone)]
pub struct CellAdjacency {
    offsets: Vec<usize>,
    cells: Vec<usize>,
}

impl CellAdjacency {
    #[must_use]
    pub fn new<const D: usize>(index: &Index<D>, r: usize, periodic: bool) -> Self {
        let mut offsets = Vec::with_capacity(index.size() + 1);
        let mut cells = Vec::new();
        offsets.push(0);

        for cell in 0..index.size() {
            let ijk = index.inverse(cell);
            let ranges: Vec<Vec<usize>> =
                (0..D).map(|d| axis_neighbors(ijk[d], index[d], r, periodic)).collect();

            let mut adjacent = Vec::with_capacity(ranges.iter().map(Vec::len).product());
            let mut current = [0; D];
            collect_product(&ranges, 0, &mut current, index, &mut adjacent);
            adjacent.sort_unstable();
            adjacent.dedup();

            cells.extend(adjacent);
            offsets.push(cells.len());
        }

        Self { offsets, cells }
    }

    #[must_use]
    pub fn neighbors(&self, cell: usize) -> &[usize] {
        &self.cells[self.offsets[cell]..self.offsets[cell + 1]]
    }

    #[must_use]
    pub fn n_neighbors(&self, cell: usize) -> usize {
        self.offsets[cell + 1] - self.offsets[cell]
    }

    #[must_use]
    pub fn n_cells(&self) -> usize {
        self.offsets.len() - 1
    }
}

fn axis_neighbors(c: usize, n: usize, r: usize, periodic: bool) -> Vec<usize> {
    if periodic {
        if n <= 2 * r + 1 {
            (0..n).collect()
        } else {
            (0..=2 * r).map(|k| (c + n + k - r) % n).collect()
        }
    } else {
        (c.saturating_sub(r)..=(c + r).min(n - 1)).collect()
    }
}

fn collect_product<const D: usize>(
    ranges: &[Vec<usize>],
    axis: usize,
    current: &mut [usize; D],
    index: &Index<D>,
    out: &mut Vec<usize>,
) {
    if axis == D {
        out.push(index.index(current));
        return;
    }
    for &k in &ranges[axis] {
        current[axis] = k;
        collect_product(ranges, axis + 1, current, index, out);
    }
}

#[derive(Debug, Clone)]
pub struct NeighborList<const D: usize> {
    sim_box: SimulationBox<D>,
    cutoff: f64,
    cell_size: f64,
    index: Index<D>,
    adjacency: CellAdjacency,
    types: Option<FxHashSet<usize>>,
    cell_offsets: Vec<usize>,
    cell_particles: Vec<usize>,
    particle_cell: Vec<usize>,
}

impl<const D: usize> NeighborList<D> {
    /// # Errors
    /// [`KernelError::InvalidSystem`] for a non-positive cutoff, zero subdivisions or a
    /// non-positive box edge.
    pub fn new(sim_box: SimulationBox<D>, cutoff: f64, n_subdivides: usize) -> Result<Self, KernelError> {
        if !(cutoff > 0.) || n_subdivides == 0 {
            return Err(KernelError::InvalidSystem {
                message: format!("cutoff {cutoff} and subdivisions {n_subdivides} must be positive").into(),
                context: Some("neighbor list".into()),
            });
        }
        if sim_box.size().iter().any(|&l| !(l > 0.)) {
            return Err(KernelError::InvalidSystem {
                message: "grid sizes must be positive".into(),
                context: Some("neighbor list".into()),
            });
        }

        let cell_size = cutoff / n_subdivides as f64;
        let n_cells = sim_box.size().map(|l| ((l / cell_size).floor() as usize).max(1));
        let index = Index::new(n_cells);
        let adjacency = CellAdjacency::new(&index, n_subdivides, sim_box.periodic());

        trace!(?n_cells, cell_size, cutoff, "Neighbor list grid");

        Ok(Self {
            sim_box,
            cutoff,
            cell_size,
            cell_offsets: vec![0; index.size() + 1],
            index,
            adjacency,
            types: None,
            cell_particles: Vec::new(),
            particle_cell: Vec::new(),
        })
    }

    /// Restricts insertion to the given types.
    pub fn set_types(&mut self, types: impl IntoIterator<Item = usize>) {
        self.types = Some(types.into_iter().collect());
    }

    /// Admits every type again.
    pub fn clear_types(&mut self) {
        self.types = None;
    }

    #[must_use]
    pub fn is_allowed_type(&self, ty: usize) -> bool {
        self.types.as_ref().is_none_or(|t| t.contains(&ty))
    }

    #[must_use]
    pub const fn cutoff(&self) -> f64 {
        self.cutoff
    }

    #[must_use]
    pub const fn n_cells(&self) -> &[usize; D] {
        self.index.dims()
    }

    #[must_use]
    pub const fn adjacency(&self) -> &CellAdjacency {
        &self.adjacency
    }

    /// Cell coordinates of a position; positions outside the box are clamped to the border cells.
    #[must_use]
    pub fn grid_pos(&self, pos: &Vector<D>) -> [usize; D] {
        let size = self.sim_box.size();
        let dims = self.index.dims();
        std::array::from_fn(|d| {
            let projection = ((pos[d] + 0.5 * size[d]) / self.cell_size).floor().max(0.);
            (projection as usize).min(dims[d] - 1)
        })
    }

    #[must_use]
    pub fn position_to_cell(&self, pos: &Vector<D>) -> usize {
        self.index.index(&self.grid_pos(pos))
    }

    /// Cell a particle was sorted into by the last [`NeighborList::update`].
    #[must_use]
    pub fn cell_of(&self, id: usize) -> Option<usize> {
        self.particle_cell.get(id).copied().filter(|&c| c != NOT_INSERTED)
    }

    /// Particles currently sorted into `cell`.
    #[must_use]
    pub fn cell_contents(&self, cell: usize) -> &[usize] {
        &self.cell_particles[self.cell_offsets[cell]..self.cell_offsets[cell + 1]]
    }

    /// Re-sorts all live particles of allowed type into cells.
    ///
    /// # Errors
    /// [`KernelError::Pool`] if a worker job fails.
    pub fn update(&mut self, particles: ParticlesView<'_, D>, pool: &ThreadPool) -> Result<(), KernelError> {
        let this = &*self;
        let assignments = pool.map_scoped(partition(particles.len(), pool.granularity()), |range| {
            range
                .map(|id| match particles.position(id) {
                    Some(pos) if this.is_allowed_type(particles.type_of(id)) => this.position_to_cell(pos),
                    _ => NOT_INSERTED,
                })
                .collect::<Vec<_>>()
        })?;
        self.particle_cell = assignments.into_iter().flatten().collect();

        let mut counts = vec![0_usize; self.index.size()];
        for &cell in self.particle_cell.iter().filter(|&&c| c != NOT_INSERTED) {
            counts[cell] += 1;
        }
        let mut offsets = PrefixSum::exclusive(&counts, pool)?;
        let total = offsets.last().copied().unwrap_or(0) + counts.last().copied().unwrap_or(0);

        let mut cursor = offsets.clone();
        self.cell_particles.clear();
        self.cell_particles.resize(total, 0);
        for (id, &cell) in self.particle_cell.iter().enumerate() {
            if cell != NOT_INSERTED {
                self.cell_particles[cursor[cell]] = id;
                cursor[cell] += 1;
            }
        }
        offsets.push(total);
        self.cell_offsets = offsets;
        Ok(())
    }

    /// Calls `f(neighbor_id, &position, type)` for every particle in the cells adjacent to `id`'s cell.
    pub fn for_each_neighbor<F>(&self, id: usize, particles: ParticlesView<'_, D>, mut f: F)
    where
        F: FnMut(usize, &Vector<D>, usize),
    {
        let Some(cell) = self.cell_of(id) else {
            return;
        };
        for &neighbor_cell in self.adjacency.neighbors(cell) {
            for &nid in self.cell_contents(neighbor_cell) {
                if nid != id
                    && let Some(pos) = particles.position(nid)
                {
                    f(nid, pos, particles.type_of(nid));
                }
            }
        }
    }

    /// Calls `f(i, j)` once for every unordered pair in adjacent cells, with `i < j`.
    pub fn for_each_pair<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize),
    {
        for cell in 0..self.index.size() {
            for &i in self.cell_contents(cell) {
                for &neighbor_cell in self.adjacency.neighbors(cell) {
                    for &j in self.cell_contents(neighbor_cell) {
                        if j > i {
                            f(i, j);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::ParticleCollection;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::BTreeSet;

    #[test]
    fn test_adjacency_periodic_2d() {
        let index = Index::new([15, 15]);
        let adj = CellAdjacency::new(&index, 2, true);
        assert_eq!(adj.n_cells(), 225);
        assert!((0..index.size()).all(|c| adj.n_neighbors(c) == 25));
    }

    #[test]
    fn test_adjacency_periodic_3d() {
        let index = Index::new([15, 15, 15]);
        let adj = CellAdjacency::new(&index, 2, true);
        assert!((0..index.size()).all(|c| adj.n_neighbors(c) == 125));
    }

    #[test]
    fn test_adjacency_periodic_thin_axis() {
        let index = Index::new([15, 3]);
        let adj = CellAdjacency::new(&index, 2, true);
        assert!((0..index.size()).all(|c| adj.n_neighbors(c) == 15));
    }

    #[test]
    fn test_adjacency_non_periodic() {
        let index = Index::new([15, 15]);
        let adj = CellAdjacency::new(&index, 2, false);
        assert_eq!(adj.n_neighbors(index.index(&[0, 0])), 9);
        assert_eq!(adj.n_neighbors(index.index(&[0, 5])), 15);
        assert_eq!(adj.n_neighbors(index.index(&[5, 5])), 25);
        assert!(adj.neighbors(index.index(&[5, 5])).contains(&index.index(&[5, 5])));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let sim_box = SimulationBox::new([1., 1.], true);
        assert!(NeighborList::new(sim_box, 0., 2).is_err());
        assert!(NeighborList::new(sim_box, 1., 0).is_err());
        assert!(NeighborList::new(SimulationBox::new([0., 1.], true), 1., 2).is_err());
    }

    #[test]
    fn test_grid_pos_clamps() {
        let nl = NeighborList::new(SimulationBox::new([10., 10.], false), 1., 2).unwrap();
        assert_eq!(nl.n_cells(), &[20, 20]);
        assert_eq!(nl.grid_pos(&Vector::new([-5., 4.99])), [0, 19]);
        assert_eq!(nl.grid_pos(&Vector::new([-50., 50.])), [0, 19]);
    }

    fn brute_force_pairs<const D: usize>(
        particles: &ParticleCollection<D>,
        sim_box: &SimulationBox<D>,
        cutoff: f64,
    ) -> BTreeSet<(usize, usize)> {
        let mut pairs = BTreeSet::new();
        for (i, pi, _) in particles.iter() {
            for (j, pj, _) in particles.iter() {
                if i < j && sim_box.distance_squared(pi, pj) < cutoff * cutoff {
                    pairs.insert((i, j));
                }
            }
        }
        pairs
    }

    fn check_against_brute_force<const D: usize>(size: [f64; D], periodic: bool, cutoff: f64) {
        let pool = ThreadPool::with_threads(4).unwrap();
        let sim_box = SimulationBox::new(size, periodic);
        let mut particles = ParticleCollection::new();
        particles.initialize_uniform(400, 0, &sim_box, &mut StdRng::seed_from_u64(11));
        particles.initialize_uniform(100, 1, &sim_box, &mut StdRng::seed_from_u64(12));
        for ix in (0..500).step_by(9) {
            particles.remove_particle(ix);
        }

        let mut nl = NeighborList::new(sim_box, cutoff, 2).unwrap();
        nl.update(particles.view(), &pool).unwrap();

        let mut found = BTreeSet::new();
        nl.for_each_pair(|i, j| {
            assert!(found.insert((i, j)), "pair ({i}, {j}) visited twice");
        });
        let expected = brute_force_pairs(&particles, &sim_box, cutoff);
        assert!(expected.is_subset(&found));

        for (i, _, _) in particles.iter() {
            let mut neighbors = BTreeSet::new();
            nl.for_each_neighbor(i, particles.view(), |j, _, _| {
                neighbors.insert(j);
            });
            assert!(!neighbors.contains(&i));
            for &(a, b) in &expected {
                if a == i {
                    assert!(neighbors.contains(&b));
                } else if b == i {
                    assert!(neighbors.contains(&a));
                }
            }
        }
    }

    #[test]
    fn test_matches_brute_force_periodic_2d() {
        check_against_brute_force([10., 7.3], true, 0.9);
    }

    #[test]
    fn test_matches_brute_force_open_3d() {
        check_against_brute_force([3., 3., 2.1], false, 0.5);
    }

    #[test]
    fn test_matches_brute_force_small_periodic_box() {
        check_against_brute_force([1., 1.], true, 0.6);
    }

    #[test]
    fn test_type_filter() {
        let pool = ThreadPool::with_threads(2).unwrap();
        let sim_box = SimulationBox::new([4., 4.], true);
        let mut particles = ParticleCollection::new();
        let a = particles.add_particle(Vector::new([0., 0.]), 0);
        let b = particles.add_particle(Vector::new([0.1, 0.]), 1);
        let c = particles.add_particle(Vector::new([0.2, 0.]), 0);

        let mut nl = NeighborList::new(sim_box, 1., 1).unwrap();
        nl.set_types([0]);
        nl.update(particles.view(), &pool).unwrap();
        assert!(nl.is_allowed_type(0));
        assert!(!nl.is_allowed_type(1));
        assert_eq!(nl.cell_of(b), None);

        let mut seen = Vec::new();
        nl.for_each_neighbor(a, particles.view(), |j, _, _| seen.push(j));
        assert_eq!(seen, vec![c]);

        nl.clear_types();
        nl.update(particles.view(), &pool).unwrap();
        assert!(nl.cell_of(b).is_some());
    }
}
