use super::{check_dims, Dims};

/// Textbook triple loop: `C[m][p] = Σ_n A[m][n] · B[n][p]`.
///
/// The innermost loop walks a column of B with a stride of `P` elements, so
/// almost every load of B touches a new cache line on large matrices. Each
/// cell of C is overwritten with its sum.
///
/// * `a` - A (`M × N`), row-major
/// * `b` - B (`N × P`), row-major
/// * `c` - C (`M × P`), row-major
pub fn matmul_naive(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    check_dims(a, b, c, dims);
    let Dims { m: rows, n: inner, p: cols } = dims;

    for m in 0..rows {
        for p in 0..cols {
            let mut sum = 0.0f32;
            for n in 0..inner {
                sum += a[m * inner + n] * b[n * cols + p];
            }
            c[m * cols + p] = sum;
        }
    }
}

/// Same loop nest as [`matmul_naive`] over a pre-transposed B.
///
/// `bt` holds Bᵗ (`P × N`, row-major), so the innermost loop is a dot product
/// of two contiguous rows.
pub fn matmul_naive_transposed(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    check_dims(a, bt, c, dims);
    let Dims { m: rows, n: inner, p: cols } = dims;

    for m in 0..rows {
        for p in 0..cols {
            let mut sum = 0.0f32;
            for n in 0..inner {
                sum += a[m * inner + n] * bt[p * inner + n];
            }
            c[m * cols + p] = sum;
        }
    }
}
