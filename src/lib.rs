pub mod error;
pub mod bits;
pub mod parity;
pub mod spectator;
pub mod mixer;
pub mod contract;
pub mod hamiltonian;
pub mod maths;
pub mod input;
pub mod utils;

pub use error::{FsuccError, Result};
pub use mixer::{FockPair, Hermitian, Mixer, Unitary};
pub use contract::{contract, contract_hermitian, contract_unitary, contract_unitary_adjoint, project};
pub use hamiltonian::{apply_nbody, apply_spinsym, expectation, SpinSymOperator};

// Determinant bitstring. Bit k set means spin-orbital k is occupied.
pub type Det = u64;

// Width of the determinant bitmask. A Fock space of norb spin-orbitals has 2^norb determinants,
// which must be addressable, so norb is strictly below this.
pub const DET_BITS: usize = Det::BITS as usize;

// Storage for one excitation generator a0'a1'...i1 i0 - h.c. with its amplitude.
#[derive(Clone, Debug, PartialEq)]
pub struct Generator {
    pub aidx: Vec<usize>, // Creation-then-annihilation targets.
    pub iidx: Vec<usize>, // Annihilation-then-creation sources.
    pub amp: f64,
}
