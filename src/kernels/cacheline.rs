//! Cache-line blocked kernels.
//!
//! All three dimensions are cut into `TILE × TILE` blocks (one cache line of
//! `f32` per tile row) and visited in (M, P, N) order. Tiles on the right and
//! bottom edges are clipped to the remaining extent.

use std::cmp::min;

use super::{check_dims, Dims, TILE};

/// Blocked `C += A · B` with the naive accumulation pattern inside each tile.
///
/// C must be zeroed by the caller: partial products from every N-tile are
/// added into it.
pub fn matmul_cacheline(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
    check_dims(a, b, c, dims);
    let Dims { m: rows, n: inner, p: cols } = dims;

    for m in (0..rows).step_by(TILE) {
        let tile_m = min(TILE, rows - m);
        for p in (0..cols).step_by(TILE) {
            let tile_p = min(TILE, cols - p);
            for n in (0..inner).step_by(TILE) {
                let tile_n = min(TILE, inner - n);

                for m2 in 0..tile_m {
                    let a_row = (m + m2) * inner + n;
                    let c_row = (m + m2) * cols + p;

                    for n2 in 0..tile_n {
                        let a_val = a[a_row + n2];
                        let b_row = (n + n2) * cols + p;

                        for p2 in 0..tile_p {
                            c[c_row + p2] += a_val * b[b_row + p2];
                        }
                    }
                }
            }
        }
    }
}

/// Blocked `C += A · B` from a pre-transposed B, one partial dot product per
/// cell and N-tile.
///
/// `bt` holds Bᵗ (`P × N`). Within a tile each cell of C receives the dot
/// product of an A row segment and a Bᵗ row segment of at most `TILE`
/// elements, added onto what earlier N-tiles left there.
pub fn matmul_cacheline_transposed(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    check_dims(a, bt, c, dims);
    let Dims { m: rows, n: inner, p: cols } = dims;

    for m in (0..rows).step_by(TILE) {
        let tile_m = min(TILE, rows - m);
        for p in (0..cols).step_by(TILE) {
            let tile_p = min(TILE, cols - p);
            for n in (0..inner).step_by(TILE) {
                let tile_n = min(TILE, inner - n);

                for m2 in 0..tile_m {
                    let a_seg = &a[(m + m2) * inner + n..][..tile_n];
                    let c_row = (m + m2) * cols + p;

                    for p2 in 0..tile_p {
                        let bt_seg = &bt[(p + p2) * inner + n..][..tile_n];

                        let mut sum = 0.0f32;
                        for (x, y) in a_seg.iter().zip(bt_seg) {
                            sum += x * y;
                        }
                        c[c_row + p2] += sum;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::naive::matmul_naive;
    use crate::matrix::transpose;

    fn sequence(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i % 7 + 1) as f32).collect()
    }

    #[test]
    fn test_cacheline_matches_naive_on_ragged_tiles() {
        let dims = Dims { m: 17, n: 33, p: 18 };
        let a = sequence(dims.m * dims.n);
        let b = sequence(dims.n * dims.p);

        let mut expected = vec![0.0; dims.m * dims.p];
        matmul_naive(&a, &b, &mut expected, dims);

        let mut c = vec![0.0; dims.m * dims.p];
        matmul_cacheline(&a, &b, &mut c, dims);
        assert_eq!(c, expected);
    }

    #[test]
    fn test_cacheline_transposed_matches_naive() {
        let dims = Dims { m: 20, n: 35, p: 3 };
        let a = sequence(dims.m * dims.n);
        let b = sequence(dims.n * dims.p);
        let mut bt = vec![0.0; b.len()];
        transpose(&b, &mut bt, dims.n, dims.p);

        let mut expected = vec![0.0; dims.m * dims.p];
        matmul_naive(&a, &b, &mut expected, dims);

        let mut c = vec![0.0; dims.m * dims.p];
        matmul_cacheline_transposed(&a, &bt, &mut c, dims);
        assert_eq!(c, expected);
    }

    #[test]
    fn test_cacheline_accumulates_into_existing_output() {
        let a = [1.0, 1.0, 1.0, 1.0];
        let b = [1.0, 0.0, 0.0, 1.0];
        let mut c = [1.0; 4];
        matmul_cacheline(&a, &b, &mut c, Dims::square(2));
        assert_eq!(c, [2.0, 2.0, 2.0, 2.0]);

        let mut c = [1.0; 4];
        matmul_cacheline_transposed(&a, &b, &mut c, Dims::square(2));
        assert_eq!(c, [2.0, 2.0, 2.0, 2.0]);
    }
}
