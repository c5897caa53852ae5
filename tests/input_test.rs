use fsucc_rs::FsuccError;
use fsucc_rs::contract::apply_generators;
use fsucc_rs::input::parse_input;
use fsucc_rs::maths::norm;

const H2_MINIMAL: &str = r#"
fock = { norb = 2, nthreads = 2 }
reference = { 0, 2 }
ucc = {
    generators = {
        { a = { 1 }, i = { 0 }, amp = 0.1 },
        { a = { 3 }, i = { 2 }, amp = 0.1 },
        { a = { 1, 3 }, i = { 0, 2 }, amp = -0.05 },
    },
}
hamiltonian = {
    constant = 0.7,
    terms = {
        { -1.25, 0.0, -0.5 },
        { 0.675, 0, 0, 0, 0.18, 0, 0, 0, 0.7 },
    },
}
write = { verbose = true }
"#;

#[test]
fn parses_full_input() {
    let input = parse_input(H2_MINIMAL).unwrap();
    assert_eq!(input.fock.norb, 2);
    assert_eq!(input.fock.nthreads, 2);
    assert_eq!(input.reference, vec![0, 2]);
    assert!(!input.ucc.adjoint);
    assert_eq!(input.ucc.generators.len(), 3);
    assert_eq!(input.ucc.generators[2].aidx, vec![1, 3]);
    assert_eq!(input.ucc.generators[2].amp, -0.05);
    let h = input.hamiltonian.unwrap();
    assert_eq!(h.constant, 0.7);
    assert_eq!(h.terms[0].shape(), &[3]);
    assert_eq!(h.terms[1].shape(), &[3, 3]);
    assert!(input.write.verbose);
    assert_eq!(input.write.threshold, 1e-8);
}

#[test]
fn generators_from_input_keep_norm() {
    let input = parse_input(H2_MINIMAL).unwrap();
    let nspin = 2 * input.fock.norb;
    let mut psi = vec![0.0; 1 << nspin];
    psi[0b0101] = 1.0;
    apply_generators(&input.ucc.generators, &mut psi, nspin, false).unwrap();
    assert!((norm(&psi) - 1.0).abs() < 1e-12);
    assert!(psi[0b0101].abs() < 1.0);
}

#[test]
fn minimal_input_defaults() {
    let input = parse_input("fock = { norb = 1 }\nreference = { }\n").unwrap();
    assert_eq!(input.fock.nthreads, 0);
    assert!(input.ucc.generators.is_empty());
    assert!(input.hamiltonian.is_none());
    assert!(!input.write.verbose);
}

#[test]
fn rejects_bad_generators() {
    let nilpotent = "fock = { norb = 2 }\nreference = { 0 }\nucc = { generators = { { a = { 1, 1 }, i = { 0, 2 }, amp = 0.1 } } }\n";
    assert!(matches!(parse_input(nilpotent), Err(FsuccError::InvalidGenerator(_))));
    let out_of_range = "fock = { norb = 2 }\nreference = { 0 }\nucc = { generators = { { a = { 4 }, i = { 0 }, amp = 0.1 } } }\n";
    assert!(matches!(parse_input(out_of_range), Err(FsuccError::IndexOutOfRange {index: 4, norb: 4})));
    let duplicate = "fock = { norb = 2 }\nreference = { 0 }\nucc = { generators = { { a = { 1 }, i = { 0 } }, { a = { 0 }, i = { 1 } } } }\n";
    assert!(matches!(parse_input(duplicate), Err(FsuccError::InvalidGenerator(_))));
}

#[test]
fn rejects_bad_hamiltonian_and_reference() {
    let short = "fock = { norb = 2 }\nreference = { 0 }\nhamiltonian = { terms = { { 1.0, 2.0 } } }\n";
    assert!(matches!(parse_input(short), Err(FsuccError::OperatorShape {len: 2, expected: 3, ..})));
    let twice = "fock = { norb = 2 }\nreference = { 0, 0 }\n";
    assert!(matches!(parse_input(twice), Err(FsuccError::InvalidInput(_))));
    assert!(matches!(parse_input("fock = { }"), Err(FsuccError::Lua(_))));
}
