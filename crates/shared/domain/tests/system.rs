use ctiprd_domain::system::{
    ExternalPotentialSpec, PairPotentialSpec, ParticleTypeSpec, ReactionSpec, SystemSpec,
};

const SPEC: &str = r#"
name = "toy"
dim = 2
box_size = [4.0, 4.0]
periodic = true

[[types]]
name = "A"
diffusion_constant = 1.0

[[types]]
name = "B"
diffusion_constant = 0.5

[[reactions]]
kind = "fusion"
educt1 = "A"
educt2 = "B"
product = "B"
reaction_radius = 0.1
rate = 2.0

[[reactions]]
kind = "decay"
educt = "B"
rate = 0.3

[[external_potentials]]
kind = "double_well"
k = 1.0

[[pair_potentials]]
kind = "harmonic_repulsion"
type1 = "A"
type2 = "A"
cutoff = 1.0
force_constant = 2.0

[[initial]]
type = "A"
count = 12
"#;

#[test]
fn system_spec_reads_tagged_tables() {
    let spec: SystemSpec = toml::from_str(SPEC).expect("spec parses");
    assert_eq!(spec.dim, 2);
    assert!((spec.kbt - 1.).abs() < f64::EPSILON);
    assert_eq!(spec.type_names(), vec!["A", "B"]);
    assert_eq!(spec.types[1], ParticleTypeSpec::new("B", 0.5));
    assert_eq!(spec.initial_particles(), 12);

    match &spec.reactions[0] {
        ReactionSpec::Fusion { weight1, weight2, .. } => {
            assert!((weight1 - 0.5).abs() < f64::EPSILON);
            assert!((weight2 - 0.5).abs() < f64::EPSILON);
        },
        other => panic!("unexpected reaction {other:?}"),
    }
    assert_eq!(spec.reactions[0].order(), 2);
    assert_eq!(spec.reactions[1].kind(), "decay");
    assert!((spec.reactions[1].rate() - 0.3).abs() < f64::EPSILON);

    assert!(matches!(&spec.external_potentials[0], ExternalPotentialSpec::DoubleWell { types, .. } if types.is_empty()));
    assert!(matches!(
        &spec.pair_potentials[0],
        PairPotentialSpec::HarmonicRepulsion { type1, type2, .. } if type1 == "A" && type2 == "A"
    ));
}

#[test]
fn unknown_reaction_kind_is_rejected() {
    let raw = r#"{ "kind": "teleport", "educt": "A", "rate": 1.0 }"#;
    assert!(serde_json::from_str::<ReactionSpec>(raw).is_err());
}
