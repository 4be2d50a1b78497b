use ctiprd_kernel::domain::system::{ParticleTypeSpec, ReactionSpec, SystemSpec};
use ctiprd_kernel::particles::ParticleCollection;
use ctiprd_kernel::pool::ThreadPool;
use ctiprd_kernel::system::System;
use ctiprd_kernel::vec::Vector;
use ctiprd_reactions::{ReactionEvent, ReactionReport, UncontrolledApproximation};

const ALWAYS: f64 = 1e12;

fn system(reactions: Vec<ReactionSpec>) -> System<2> {
    let spec = SystemSpec {
        name: "reactions".into(),
        description: String::new(),
        dim: 2,
        box_size: vec![10., 10.],
        periodic: true,
        kbt: 1.,
        types: vec![ParticleTypeSpec::new("A", 1.), ParticleTypeSpec::new("B", 1.), ParticleTypeSpec::new("C", 1.)],
        reactions,
        external_potentials: vec![],
        pair_potentials: vec![],
        initial: vec![],
    };
    System::from_spec(&spec).unwrap()
}

fn fusion(rate: f64, radius: f64) -> ReactionSpec {
    ReactionSpec::Fusion {
        educt1: "A".into(),
        educt2: "B".into(),
        product: "C".into(),
        reaction_radius: radius,
        rate,
        weight1: 0.5,
        weight2: 0.5,
    }
}

#[test]
fn decay_removes_every_particle_at_high_rate() {
    let pool = ThreadPool::with_threads(3).unwrap();
    let system = system(vec![ReactionSpec::Decay { educt: "A".into(), rate: ALWAYS }]);
    let mut handler = UncontrolledApproximation::new(&system, 1).unwrap();
    assert!(handler.neighbor_list().is_none());

    let mut particles = ParticleCollection::new();
    for i in 0..50 {
        particles.add_particle(Vector::new([f64::from(i) * 0.1, 0.]), 0);
    }
    particles.add_particle(Vector::new([1., 1.]), 1);

    let report = handler.perform(&mut particles, 1., &pool).unwrap();
    assert_eq!(report, ReactionReport { proposed: 50, performed: 50 });
    assert_eq!(particles.count_by_type(3), vec![0, 1, 0]);
}

#[test]
fn conversion_and_zero_rate() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let system = system(vec![
        ReactionSpec::Conversion { educt: "A".into(), product: "B".into(), rate: ALWAYS },
        ReactionSpec::Decay { educt: "B".into(), rate: 0. },
    ]);
    let mut handler = UncontrolledApproximation::new(&system, 2).unwrap();

    let mut particles = ParticleCollection::new();
    for _ in 0..20 {
        particles.add_particle(Vector::new([0., 0.]), 0);
    }
    let report = handler.perform(&mut particles, 0.01, &pool).unwrap();
    assert_eq!(report.performed, 20);
    assert_eq!(particles.count_by_type(3), vec![0, 20, 0]);

    let report = handler.perform(&mut particles, 0.01, &pool).unwrap();
    assert_eq!(report, ReactionReport::default());
}

#[test]
fn fission_places_products_within_distance() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let system = system(vec![ReactionSpec::Fission {
        educt: "A".into(),
        product1: "B".into(),
        product2: "C".into(),
        product_distance: 0.5,
        rate: ALWAYS,
    }]);
    let mut handler = UncontrolledApproximation::new(&system, 3).unwrap();

    let mut particles = ParticleCollection::new();
    particles.add_particle(Vector::new([4.9, -4.9]), 0);
    let report = handler.perform(&mut particles, 1., &pool).unwrap();
    assert_eq!(report.performed, 1);
    assert_eq!(particles.count_by_type(3), vec![0, 1, 1]);

    let p1 = *particles.position(0).unwrap();
    let p2 = *particles.position(1).unwrap();
    assert!(system.sim_box().contains(&p1));
    assert!(system.sim_box().contains(&p2));
    assert!(system.sim_box().distance_squared(&p1, &p2) <= 0.25 + 1e-12);

    let center = Vector::new([4.9, -4.9]);
    let d1 = system.sim_box().distance_squared(&center, &p1).sqrt();
    let d2 = system.sim_box().distance_squared(&center, &p2).sqrt();
    assert!((d1 - d2).abs() < 1e-9);
}

#[test]
fn fusion_respects_radius_and_weights() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let system = system(vec![fusion(ALWAYS, 0.2)]);
    let mut handler = UncontrolledApproximation::new(&system, 4).unwrap();
    assert!((handler.radius() - 0.2).abs() < f64::EPSILON);

    let mut particles = ParticleCollection::new();
    particles.add_particle(Vector::new([4.95, 0.]), 1);
    particles.add_particle(Vector::new([-4.95, 0.]), 0);
    particles.add_particle(Vector::new([0., 0.]), 0);
    particles.add_particle(Vector::new([0.3, 0.]), 1);

    let report = handler.perform(&mut particles, 1., &pool).unwrap();
    assert_eq!(report, ReactionReport { proposed: 1, performed: 1 });
    assert_eq!(particles.count_by_type(3), vec![1, 1, 1]);

    let product = particles.iter().find(|(_, _, ty)| *ty == 2).map(|(_, p, _)| *p).unwrap();
    let expected = Vector::new([-5., 0.]);
    assert!(system.sim_box().distance_squared(&product, &expected) < 1e-18);
}

#[test]
fn conflicting_pair_events_are_resolved_by_claims() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let system = system(vec![fusion(ALWAYS, 0.5)]);
    let mut handler = UncontrolledApproximation::new(&system, 5).unwrap();

    let mut particles = ParticleCollection::new();
    particles.add_particle(Vector::new([0., 0.]), 0);
    particles.add_particle(Vector::new([0.1, 0.]), 1);
    particles.add_particle(Vector::new([0., 0.1]), 1);

    let events = handler.propose(&particles, 1., &pool).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| matches!(e, ReactionEvent::Pair { id1: 0, .. })));

    let performed = handler.apply(&mut particles, events);
    assert_eq!(performed, 1);
    assert_eq!(particles.n_particles(), 2);
    assert_eq!(particles.count_by_type(3), vec![0, 1, 1]);
}

#[test]
fn catalysis_converts_only_the_educt() {
    let pool = ThreadPool::with_threads(2).unwrap();
    let system = system(vec![ReactionSpec::Catalysis {
        catalyst: "C".into(),
        educt: "A".into(),
        product: "B".into(),
        reaction_radius: 0.2,
        rate: ALWAYS,
    }]);
    let mut handler = UncontrolledApproximation::new(&system, 6).unwrap();

    let mut particles = ParticleCollection::new();
    particles.add_particle(Vector::new([0.1, 0.]), 0);
    particles.add_particle(Vector::new([0., 0.]), 2);
    particles.add_particle(Vector::new([-0.1, 0.]), 0);
    particles.add_particle(Vector::new([3., 3.]), 0);

    let report = handler.perform(&mut particles, 1., &pool).unwrap();
    assert_eq!(report.performed, 2);
    assert_eq!(particles.type_of(0), Some(1));
    assert_eq!(particles.type_of(1), Some(2));
    assert_eq!(particles.type_of(2), Some(1));
    assert_eq!(particles.type_of(3), Some(0));
}

#[test]
fn decay_fraction_matches_firing_probability() {
    let pool = ThreadPool::with_threads(4).unwrap();
    let system = system(vec![ReactionSpec::Decay { educt: "A".into(), rate: 0.5 }]);
    let mut handler = UncontrolledApproximation::new(&system, 7).unwrap();

    let n = 20_000;
    let mut particles = ParticleCollection::new();
    for _ in 0..n {
        particles.add_particle(Vector::zero(), 0);
    }
    let report = handler.perform(&mut particles, 0.1, &pool).unwrap();
    let expected = f64::from(n) * (1. - (-0.05_f64).exp());
    assert!((report.performed as f64 - expected).abs() < 5. * expected.sqrt(), "{report:?} vs {expected}");
}

#[test]
fn same_seed_reproduces_the_step() {
    let pool = ThreadPool::with_threads(3).unwrap();
    let system = system(vec![
        ReactionSpec::Decay { educt: "B".into(), rate: 2. },
        ReactionSpec::Fission {
            educt: "A".into(),
            product1: "A".into(),
            product2: "A".into(),
            product_distance: 0.1,
            rate: 3.,
        },
        fusion(4., 0.3),
    ]);

    let run = || {
        let mut handler = UncontrolledApproximation::new(&system, 42).unwrap();
        let mut particles = ParticleCollection::new();
        for i in 0..200 {
            particles.add_particle(Vector::new([f64::from(i % 20) * 0.25 - 2.5, f64::from(i / 20) * 0.25]), (i % 2) as usize);
        }
        for _ in 0..5 {
            handler.perform(&mut particles, 0.1, &pool).unwrap();
        }
        particles.positions().to_vec()
    };
    assert_eq!(run(), run());
}

proptest::proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(24))]

    #[test]
    fn fusions_remove_one_particle_each(seed in 0_u64..1_000, n in 1_usize..40) {
        let pool = ThreadPool::with_threads(2).unwrap();
        let system = system(vec![fusion(ALWAYS, 0.5)]);
        let mut handler = UncontrolledApproximation::new(&system, seed).unwrap();

        let mut particles = ParticleCollection::new();
        for i in 0..n {
            let x = (i % 10) as f64 * 0.3;
            let y = (i / 10) as f64 * 0.3;
            particles.add_particle(Vector::new([x, y]), i % 2);
        }
        let report = handler.perform(&mut particles, 1., &pool).unwrap();

        proptest::prop_assert!(report.performed <= report.proposed);
        proptest::prop_assert_eq!(particles.n_particles(), n - report.performed);
        let counts = particles.count_by_type(3);
        proptest::prop_assert_eq!(counts[2], report.performed);
    }
}
