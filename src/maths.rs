// maths.rs
use rayon::prelude::*;

/// Number of lower-triangular spatial orbital pairs p >= q.
/// # Arguments:
///     `norb`: usize, number of spatial orbitals.
pub fn npair(norb: usize) -> usize {
    norb * (norb + 1) / 2
}

/// Unpack a lower-triangular pair index pq = p (p + 1) / 2 + q into (p, q) with p >= q.
/// p steps up while q is still past the diagonal, and q loses p each step.
/// # Arguments:
///     `pq`: usize, compound pair index.
#[inline(always)]
pub fn unpack_tril(pq: usize) -> (usize, usize) {
    let mut p = 0;
    let mut q = pq;
    while p < q {
        p += 1;
        q -= p;
    }
    (p, q)
}

/// Compound lower-triangular index of the pair (p, q), either order.
#[inline(always)]
pub fn tril_index(p: usize, q: usize) -> usize {
    let (p, q) = if p >= q {(p, q)} else {(q, p)};
    p * (p + 1) / 2 + q
}

/// Calculate the dot product of two wavefunctions in parallel.
/// # Arguments:
///     `x`: [f64], vector 1.
///     `y`: [f64], vector 2.
pub(crate) fn parallel_dot(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.par_iter().zip(y.par_iter()).map(|(&xi, &yi)| xi * yi).sum::<f64>()
}

/// Euclidean norm of a wavefunction.
pub fn norm(x: &[f64]) -> f64 {
    parallel_dot(x, x).sqrt()
}

/// Calculate y = alpha * x in parallel, overwriting y.
/// # Arguments:
///     `alpha`: f64, scale factor.
///     `x`: [f64], input vector.
///     `y`: [f64], output vector of the same length.
pub(crate) fn parallel_scale_into(alpha: f64, x: &[f64], y: &mut [f64]) {
    debug_assert_eq!(x.len(), y.len());
    y.par_iter_mut().zip(x.par_iter()).for_each(|(yi, &xi)| *yi = alpha * xi);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tril_roundtrip_order() {
        let pairs: Vec<(usize, usize)> = (0..npair(4)).map(unpack_tril).collect();
        assert_eq!(pairs, vec![(0, 0), (1, 0), (1, 1), (2, 0), (2, 1), (2, 2), (3, 0), (3, 1), (3, 2), (3, 3)]);
        for (pq, &(p, q)) in pairs.iter().enumerate() {
            assert_eq!(tril_index(p, q), pq);
            assert_eq!(tril_index(q, p), pq);
        }
    }

    #[test]
    fn dot_and_scale() {
        let x = vec![1.0, 2.0, 2.0];
        assert_eq!(parallel_dot(&x, &x), 9.0);
        assert_eq!(norm(&x), 3.0);
        let mut y = vec![0.0; 3];
        parallel_scale_into(-2.0, &x, &mut y);
        assert_eq!(y, vec![-2.0, -4.0, -4.0]);
    }
}
