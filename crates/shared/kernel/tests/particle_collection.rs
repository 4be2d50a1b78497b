use ctiprd_kernel::prelude::*;

#[test]
fn particle_collection_parallel_modification() {
    let pool = ThreadPool::with_threads(5).unwrap();
    let mut collection = ParticleCollection::<2>::new();
    for _ in 0..1000 {
        collection.add_particle(Vector::new([0., 0.]), 0);
    }
    assert_eq!(collection.n_particles(), 1000);

    collection
        .for_each_particle(&pool, |_, pos, _, force| {
            *pos = Vector::new([55., 22.]);
            *force = Vector::new([11., -11.]);
        })
        .unwrap();

    assert!(collection.positions().iter().all(|p| *p == Some(Vector::new([55., 22.]))));
    assert!(collection.forces().iter().all(|f| *f == Vector::new([11., -11.])));
}

#[test]
fn updater_round_trip_keeps_slot_count_stable() {
    let sim_box = SimulationBox::new([10., 10.], true);
    let mut collection = ParticleCollection::<2>::new();
    for i in 0..10 {
        collection.add_particle(Vector::new([f64::from(i) - 4.5, 0.]), 0);
    }

    {
        let mut updater = ParticleCollectionUpdater::new(&mut collection, &sim_box);
        for ix in 0..5 {
            assert!(updater.remove(ix, true));
        }
        for ix in 0..5 {
            assert!(!updater.direct_update(ix, Some(1), None, true));
        }
        for _ in 0..3 {
            updater.add(1, Vector::new([12., 0.]));
        }
        updater.finish();
    }

    assert_eq!(collection.len(), 10);
    assert_eq!(collection.n_particles(), 8);
    assert_eq!(collection.count_by_type(2), vec![5, 3]);
    assert!(collection.iter().all(|(_, p, _)| sim_box.contains(p)));

    collection.update(vec![(Vector::new([1., 1.]), 0); 4], vec![]);
    assert_eq!(collection.len(), 12);
    assert_eq!(collection.n_blanks(), 0);
}

fn live_of_type(collection: &ParticleCollection<2>, ty: usize) -> impl Iterator<Item = (usize, &Vector<2>)> {
    collection.iter().filter(move |&(_, _, t)| t == ty).map(|(ix, p, _)| (ix, p))
}

#[test]
fn iteration_skips_blanks_and_outlives_the_view() {
    let mut collection = ParticleCollection::<2>::new();
    for i in 0..6_u8 {
        collection.add_particle(Vector::new([f64::from(i), 0.]), usize::from(i % 2));
    }
    collection.remove_particle(1);
    collection.remove_particle(4);

    let live: Vec<_> = collection.iter().map(|(ix, _, ty)| (ix, ty)).collect();
    assert_eq!(live, vec![(0, 0), (2, 0), (3, 1), (5, 1)]);

    let odd: Vec<_> = live_of_type(&collection, 1).collect();
    assert_eq!(odd, vec![(3, &Vector::new([3., 0.])), (5, &Vector::new([5., 0.]))]);

    let view = collection.view();
    let from_view: Vec<_> = view.iter().map(|(ix, _, _)| ix).collect();
    assert_eq!(from_view, view.iter().map(|(ix, _, _)| ix).collect::<Vec<_>>());
    assert_eq!(from_view.len(), collection.n_particles());
}
