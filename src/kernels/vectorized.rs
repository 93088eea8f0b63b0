//! Tiled loops shared by the SSE and AVX kernels, generic over the register
//! width.
//!
//! These functions are `#[inline(always)]` so that, instantiated inside a
//! `#[target_feature]` wrapper, the vector operations compile to the wrapper's
//! instruction set.

use std::cmp::min;

use super::{check_dims, Dims, TILE};
use crate::simd::SimdVector;

/// Cache-line tiling of [`matmul_cacheline`](super::cacheline::matmul_cacheline)
/// with the P loop vectorized.
///
/// For each A element the value is broadcast and `C[p2..p2+LANES] +=
/// a · B[p2..p2+LANES]` runs while a full register fits in both the tile and
/// the matrix; the remaining columns of the tile are finished one by one.
#[inline(always)]
pub(crate) fn blocked<V: SimdVector>(a: &[f32], b: &[f32], c: &mut [f32], dims: Dims) {
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
                        let a_vec = V::splat(a_val);
                        let b_row = (n + n2) * cols + p;

                        let mut p2 = 0;
                        while p2 + V::LANES <= tile_p {
                            let b_vec = V::load(&b[b_row + p2..]);
                            let c_slot = &mut c[c_row + p2..];
                            let c_vec = V::load(c_slot);
                            (c_vec + a_vec * b_vec).store(c_slot);
                            p2 += V::LANES;
                        }

                        while p2 < tile_p {
                            c[c_row + p2] += a_val * b[b_row + p2];
                            p2 += 1;
                        }
                    }
                }
            }
        }
    }
}

/// (M, P) tiling over a pre-transposed B; each cell of C is a full-length
/// vector dot product, reduced horizontally and stored once.
///
/// Unlike [`matmul_cacheline_transposed`](super::cacheline::matmul_cacheline_transposed)
/// N is not tiled, so C is overwritten rather than accumulated into.
#[inline(always)]
pub(crate) fn transposed<V: SimdVector>(a: &[f32], bt: &[f32], c: &mut [f32], dims: Dims) {
    check_dims(a, bt, c, dims);
    let Dims { m: rows, n: inner, p: cols } = dims;

    for m in (0..rows).step_by(TILE) {
        let tile_m = min(TILE, rows - m);
        for p in (0..cols).step_by(TILE) {
            let tile_p = min(TILE, cols - p);

            for m2 in 0..tile_m {
                let a_row = &a[(m + m2) * inner..][..inner];
                let c_row = (m + m2) * cols + p;

                for p2 in 0..tile_p {
                    let bt_row = &bt[(p + p2) * inner..][..inner];

                    let mut acc = V::zero();
                    let mut n = 0;
                    while n + V::LANES <= inner {
                        acc = acc + V::load(&a_row[n..]) * V::load(&bt_row[n..]);
                        n += V::LANES;
                    }

                    let mut sum = acc.horizontal_sum();
                    while n < inner {
                        sum += a_row[n] * bt_row[n];
                        n += 1;
                    }

                    c[c_row + p2] = sum;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::cacheline::matmul_cacheline;
    use crate::kernels::naive::matmul_naive;
    use crate::matrix::transpose;
    use crate::simd::Lanes;

    fn sequence(len: usize, modulus: usize) -> Vec<f32> {
        (0..len).map(|i| (i % modulus + 1) as f32).collect()
    }

    #[test]
    fn test_portable_blocked_is_bit_identical_to_cacheline() {
        // Non-integer values: lane-wise mul then add must round like the scalar loop.
        let dims = Dims { m: 19, n: 21, p: 23 };
        let a: Vec<f32> = (0..dims.m * dims.n).map(|i| (i as f32).sin()).collect();
        let b: Vec<f32> = (0..dims.n * dims.p).map(|i| (i as f32).cos()).collect();

        let mut expected = vec![0.0; dims.m * dims.p];
        matmul_cacheline(&a, &b, &mut expected, dims);

        for lanes in [4, 8] {
            let mut c = vec![0.0; dims.m * dims.p];
            match lanes {
                4 => blocked::<Lanes<4>>(&a, &b, &mut c, dims),
                _ => blocked::<Lanes<8>>(&a, &b, &mut c, dims),
            }
            let same = c.iter().zip(&expected).all(|(x, y)| x.to_bits() == y.to_bits());
            assert!(same, "{lanes}-lane blocked kernel diverged from scalar");
        }
    }

    #[test]
    fn test_portable_transposed_matches_naive() {
        for (m, n, p) in [(1, 1, 1), (3, 3, 3), (5, 9, 2), (17, 17, 17), (2, 40, 33)] {
            let dims = Dims { m, n, p };
            let a = sequence(m * n, 10);
            let b = sequence(n * p, 9);
            let mut bt = vec![0.0; b.len()];
            transpose(&b, &mut bt, n, p);

            let mut expected = vec![0.0; m * p];
            matmul_naive(&a, &b, &mut expected, dims);

            let mut c4 = vec![0.0; m * p];
            transposed::<Lanes<4>>(&a, &bt, &mut c4, dims);
            assert_eq!(c4, expected, "4 lanes, dims {m}x{n}x{p}");

            let mut c8 = vec![0.0; m * p];
            transposed::<Lanes<8>>(&a, &bt, &mut c8, dims);
            assert_eq!(c8, expected, "8 lanes, dims {m}x{n}x{p}");
        }
    }

    #[test]
    fn test_transposed_overwrites_output() {
        let a = [1.0, 2.0];
        let bt = [3.0, 4.0];
        let mut c = [50.0];
        transposed::<Lanes<4>>(&a, &bt, &mut c, Dims { m: 1, n: 2, p: 1 });
        assert_eq!(c, [11.0]);
    }
}
