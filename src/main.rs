// main.rs
use std::time::Instant;

use fsucc_rs::{expectation, FsuccError, Result};
use fsucc_rs::bits::mask_from_indices;
use fsucc_rs::contract::apply_generators;
use fsucc_rs::error::fock_dim;
use fsucc_rs::input::load_input;
use fsucc_rs::maths::norm;
use fsucc_rs::utils::{print_fock_vector, print_generators};

fn main() {
    env_logger::init();
    let t_total = Instant::now();
    let input_path = match std::env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("Usage: fsucc <input.lua>");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&input_path) {
        eprintln!("fsucc: {}", e);
        std::process::exit(1);
    }
    println!("\n Total wall time: {:?}", t_total.elapsed());
}

fn run(input_path: &str) -> Result<()> {
    let input = load_input(input_path)?;
    if input.fock.nthreads > 0 {
        rayon::ThreadPoolBuilder::new().num_threads(input.fock.nthreads).build_global()?;
    }

    let norb = input.fock.norb;
    let nspin = 2 * norb;
    let ndet = fock_dim(nspin)?;
    let ref_det = mask_from_indices(&input.reference, nspin)?
        .ok_or_else(|| FsuccError::InvalidInput(format!("reference {:?} occupies a spin-orbital twice", input.reference)))?;

    println!("{}", "=".repeat(100));
    println!("Fock space: {} spatial orbitals, {} spin-orbitals, {} determinants, {} threads", norb, nspin, ndet, rayon::current_num_threads());
    println!("Reference determinant: {} ({:?})", ref_det, input.reference);
    println!("Generators: {}{}", input.ucc.generators.len(), if input.ucc.adjoint {" (adjoint)"} else {""});
    if input.write.verbose {
        print_generators(&input.ucc.generators);
    }

    let mut psi = vec![0.0; ndet];
    psi[ref_det as usize] = 1.0;

    // Energy of the reference before rotating it.
    let e_ref = match &input.hamiltonian {
        Some(h) => Some(expectation(h, &psi, norb)?),
        None => None,
    };

    let t_ucc = Instant::now();
    apply_generators(&input.ucc.generators, &mut psi, nspin, input.ucc.adjoint)?;
    let d_ucc = t_ucc.elapsed();

    let t_h = Instant::now();
    let e_ucc = match &input.hamiltonian {
        Some(h) => Some(expectation(h, &psi, norb)?),
        None => None,
    };
    let d_h = t_h.elapsed();

    println!("{}", "=".repeat(100));
    println!("Wavefunction (|c| > {:.1e}):", input.write.threshold);
    print_fock_vector(&psi, nspin, input.write.threshold);
    println!("{}", "=".repeat(100));
    println!("||Psi||: {:.12}", norm(&psi));
    if let (Some(e0), Some(e)) = (e_ref, e_ucc) {
        println!("E(reference): {}", e0);
        println!("E(UCC): {}, [E - E(reference)]: {}", e, e - e0);
    }
    println!("Generator product time: {:?}", d_ucc);
    if input.hamiltonian.is_some() {
        println!("H|Psi> time: {:?}", d_h);
    }
    Ok(())
}
