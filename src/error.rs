use thiserror::Error;

use crate::DET_BITS;

/// Caller contract violations. A repeated operator index is not one of these: it is an
/// algebraic zero and the contraction returns `Ok(())` without touching its output.
#[derive(Debug, Error)]
pub enum FsuccError {
    #[error("{norb} spin-orbitals do not fit a {max}-bit determinant space")]
    TooManySpinOrbitals { norb: usize, max: usize },

    #[error("orbital index {index} out of range for norb = {norb}")]
    IndexOutOfRange { index: usize, norb: usize },

    #[error("{what} has length {len}, expected {expected}")]
    LengthMismatch { what: &'static str, len: usize, expected: usize },

    #[error("{nelec}-body operator has {len} amplitudes, expected {expected} (npair = {npair})")]
    OperatorShape { len: usize, expected: usize, npair: usize, nelec: usize },

    #[error("n-body operator rank must be at least 1")]
    InvalidRank,

    #[error("hermitian mixing accumulates into a separate buffer and cannot run in place")]
    AliasedAccumulation,

    #[error("invalid generator: {0}")]
    InvalidGenerator(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("lua input: {0}")]
    Lua(#[from] rlua::Error),
}

pub type Result<T> = std::result::Result<T, FsuccError>;

/// Number of determinants 2^norb of a Fock space over `norb` spin-orbitals.
/// # Arguments:
///     `norb`: usize, number of spin-orbitals.
pub fn fock_dim(norb: usize) -> Result<usize> {
    if norb >= DET_BITS {
        return Err(FsuccError::TooManySpinOrbitals {norb, max: DET_BITS});
    }
    1usize.checked_shl(norb as u32).ok_or(FsuccError::TooManySpinOrbitals {norb, max: usize::BITS as usize})
}

/// Check that a wavefunction slice spans the full 2^norb determinant space.
/// # Arguments:
///     `what`: str, name of the buffer for the error message.
///     `len`: usize, length of the buffer.
///     `norb`: usize, number of spin-orbitals.
pub fn check_fock_len(what: &'static str, len: usize, norb: usize) -> Result<usize> {
    let expected = fock_dim(norb)?;
    if len != expected {
        return Err(FsuccError::LengthMismatch {what, len, expected});
    }
    Ok(expected)
}
