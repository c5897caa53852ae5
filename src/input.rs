use std::fs;

use ndarray::{ArrayD, IxDyn};
use rlua::{Lua, Table};

use crate::Generator;
use crate::bits::mask_from_indices;
use crate::contract::check_generators;
use crate::error::{fock_dim, FsuccError, Result};
use crate::hamiltonian::SpinSymOperator;
use crate::maths::npair;

// Storage for Fock space info.
pub struct FockOptions {
    pub norb: usize,     // Spatial orbitals; the Fock space has 2 * norb spin-orbitals.
    pub nthreads: usize, // 0 leaves the rayon default.
}

// Storage for the unitary generator product.
pub struct UccOptions {
    pub adjoint: bool,
    pub generators: Vec<Generator>,
}

// Storage for output options.
pub struct WriteOptions {
    pub verbose: bool,
    pub threshold: f64,
}

/// Storage for Input file parameters.
pub struct Input {
    pub fock: FockOptions,
    pub reference: Vec<usize>,
    pub ucc: UccOptions,
    pub hamiltonian: Option<SpinSymOperator>,
    pub write: WriteOptions,
}

/// Read input parameters from lua file and assign to Input object.
/// # Arguments
///     `path`: str, file path to input file.
pub fn load_input(path: &str) -> Result<Input> {
    let src = fs::read_to_string(path)?;
    parse_input(&src)
}

/// Run a lua input script and read its globals into an Input object.
/// # Arguments
///     `src`: str, lua source.
pub fn parse_input(src: &str) -> Result<Input> {
    let lua = Lua::new();
    lua.load(src).exec()?;
    let globals = lua.globals();

    // Fock table.
    let fock_tbl: Table = globals.get("fock")?;
    let norb: usize = fock_tbl.get("norb")?;
    let nthreads: usize = fock_tbl.get::<_, Option<usize>>("nthreads")?.unwrap_or(0);
    let nspin = 2 * norb;
    fock_dim(nspin)?;
    let fock = FockOptions {norb, nthreads};

    // Reference determinant as a list of occupied spin-orbitals.
    let ref_tbl: Table = globals.get("reference")?;
    let reference = ref_tbl.sequence_values::<usize>().collect::<rlua::Result<Vec<usize>>>()?;
    if mask_from_indices(&reference, nspin)?.is_none() {
        return Err(FsuccError::InvalidInput(format!("reference {:?} occupies a spin-orbital twice", reference)));
    }

    // UCC table. Missing table means an empty product.
    let ucc = match globals.get::<_, Option<Table>>("ucc")? {
        Some(t) => {
            let adjoint: bool = t.get::<_, Option<bool>>("adjoint")?.unwrap_or(false);
            let mut generators = Vec::new();
            if let Some(gens) = t.get::<_, Option<Table>>("generators")? {
                for g in gens.sequence_values::<Table>() {
                    let g = g?;
                    let aidx = read_indices(&g, "a")?;
                    let iidx = read_indices(&g, "i")?;
                    let amp: f64 = g.get::<_, Option<f64>>("amp")?.unwrap_or(0.0);
                    generators.push(Generator::new(aidx, iidx, amp));
                }
            }
            check_generators(&generators, nspin)?;
            UccOptions {adjoint, generators}
        }
        None => UccOptions {adjoint: false, generators: Vec::new()},
    };

    // Hamiltonian table: constant plus flattened n-body terms in increasing order.
    let hamiltonian = match globals.get::<_, Option<Table>>("hamiltonian")? {
        Some(t) => {
            let constant: f64 = t.get::<_, Option<f64>>("constant")?.unwrap_or(0.0);
            let mut terms = Vec::new();
            if let Some(terms_tbl) = t.get::<_, Option<Table>>("terms")? {
                let np = npair(norb);
                for (ix, term) in terms_tbl.sequence_values::<Table>().enumerate() {
                    let nelec = ix + 1;
                    let flat = term?.sequence_values::<f64>().collect::<rlua::Result<Vec<f64>>>()?;
                    let len = flat.len();
                    let arr = ArrayD::from_shape_vec(IxDyn(&vec![np; nelec]), flat).map_err(|_| {
                        FsuccError::OperatorShape {len, expected: np.checked_pow(nelec as u32).unwrap_or(usize::MAX), npair: np, nelec}
                    })?;
                    terms.push(arr);
                }
            }
            let op = SpinSymOperator::new(constant, terms);
            op.check(norb)?;
            Some(op)
        }
        None => None,
    };

    // Write table.
    let write = match globals.get::<_, Option<Table>>("write")? {
        Some(t) => WriteOptions {
            verbose: t.get::<_, Option<bool>>("verbose")?.unwrap_or(false),
            threshold: t.get::<_, Option<f64>>("threshold")?.unwrap_or(1e-8),
        },
        None => WriteOptions {verbose: false, threshold: 1e-8},
    };

    Ok(Input {fock, reference, ucc, hamiltonian, write})
}

// Optional list of orbital indices stored under `key`; absent means empty.
fn read_indices(t: &Table, key: &str) -> Result<Vec<usize>> {
    match t.get::<_, Option<Table>>(key)? {
        Some(idx) => Ok(idx.sequence_values::<usize>().collect::<rlua::Result<Vec<usize>>>()?),
        None => Ok(Vec::new()),
    }
}
