//! Every kernel against an independent reference product.
//!
//! Operands hold small integers, so every partial sum is exactly representable
//! and all kernels must agree with the reference bit for bit regardless of
//! summation order.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use matbench::kernels::naive::matmul_naive;
use matbench::matrix::{equals, transpose};
use matbench::{Dims, Kernel, Matrix};

const EDGES: [usize; 7] = [1, 7, 16, 17, 32, 33, 128];

/// Runs `kernel` on freshly zeroed output with B in the orientation it expects.
fn product(kernel: Kernel, a: &Matrix, b: &Matrix, bt: &Matrix) -> Matrix {
    let dims = Dims {
        m: a.rows(),
        n: a.cols(),
        p: b.cols(),
    };
    let mut c = Matrix::allocate(dims.m, dims.p).unwrap();
    let rhs = if kernel.expects_transposed() { bt } else { b };
    kernel.run(a.as_slice(), rhs.as_slice(), c.as_mut_slice(), dims);
    c
}

fn reference(a: &Matrix, b: &Matrix) -> Vec<f32> {
    let a = Array2::from_shape_vec((a.rows(), a.cols()), a.as_slice().to_vec()).unwrap();
    let b = Array2::from_shape_vec((b.rows(), b.cols()), b.as_slice().to_vec()).unwrap();
    a.dot(&b).into_iter().collect()
}

fn random_operands(m: usize, n: usize, p: usize, rng: &mut StdRng) -> (Matrix, Matrix, Matrix) {
    let mut a = Matrix::allocate(m, n).unwrap();
    let mut b = Matrix::allocate(n, p).unwrap();
    a.fill_random(rng);
    b.fill_random(rng);
    let bt = b.transposed().unwrap();
    (a, b, bt)
}

fn check_all_kernels(m: usize, n: usize, p: usize, rng: &mut StdRng) {
    let (a, b, bt) = random_operands(m, n, p, rng);
    let expected = reference(&a, &b);

    for kernel in Kernel::ALL {
        let c = product(kernel, &a, &b, &bt);
        assert!(
            equals(c.as_slice(), &expected, m, p),
            "{kernel} diverged from the reference at {m}x{n}x{p}"
        );
    }
}

#[test]
fn test_square_edges() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for size in EDGES {
        check_all_kernels(size, size, size, &mut rng);
    }
}

#[test]
fn test_rectangular_edges() {
    let mut rng = StdRng::seed_from_u64(42);
    // Every (m, n, p) over the small edge sizes, plus a few with the large one.
    for &m in &EDGES[..6] {
        for &n in &EDGES[..6] {
            for &p in &EDGES[..6] {
                check_all_kernels(m, n, p, &mut rng);
            }
        }
    }
    for (m, n, p) in [(128, 7, 33), (1, 128, 17), (33, 17, 128)] {
        check_all_kernels(m, n, p, &mut rng);
    }
}

#[test]
fn test_identity_right_operand() {
    let a = Matrix::from_rows(&[&[2.0, 3.0], &[1.0, 4.0]]).unwrap();
    let b = Matrix::from_rows(&[&[1.0, 0.0], &[0.0, 1.0]]).unwrap();
    let bt = b.transposed().unwrap();

    for kernel in Kernel::ALL {
        assert_eq!(product(kernel, &a, &b, &bt), a, "{kernel}");
    }
}

#[test]
fn test_known_product() {
    let a = Matrix::from_rows(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
    let b = Matrix::from_rows(&[&[7.0, 8.0], &[9.0, 10.0], &[11.0, 12.0]]).unwrap();
    let bt = b.transposed().unwrap();
    let expected = Matrix::from_rows(&[&[58.0, 64.0], &[139.0, 154.0]]).unwrap();

    for kernel in Kernel::ALL {
        assert_eq!(product(kernel, &a, &b, &bt), expected, "{kernel}");
    }
}

#[test]
fn test_one_by_one() {
    let a = Matrix::from_rows(&[&[6.0]]).unwrap();
    let b = Matrix::from_rows(&[&[7.0]]).unwrap();
    let bt = b.transposed().unwrap();

    for kernel in Kernel::ALL {
        let c = product(kernel, &a, &b, &bt);
        assert_eq!(c.as_slice(), &[42.0], "{kernel}");
    }
}

#[test]
fn test_zeroed_output_gives_same_result_twice() {
    let mut rng = StdRng::seed_from_u64(3);
    let (a, b, bt) = random_operands(33, 33, 33, &mut rng);
    let dims = Dims::square(33);

    for kernel in Kernel::ALL {
        let rhs = if kernel.expects_transposed() { &bt } else { &b };
        let mut c = Matrix::allocate(33, 33).unwrap();

        kernel.run(a.as_slice(), rhs.as_slice(), c.as_mut_slice(), dims);
        let first = c.as_slice().to_vec();

        c.zero();
        kernel.run(a.as_slice(), rhs.as_slice(), c.as_mut_slice(), dims);
        assert_eq!(c.as_slice(), &first[..], "{kernel}");
    }
}

#[test]
fn test_blocked_kernels_accumulate_into_output() {
    let mut rng = StdRng::seed_from_u64(9);
    let (a, b, _) = random_operands(17, 17, 17, &mut rng);
    let dims = Dims::square(17);

    let mut once = vec![0.0; 17 * 17];
    matmul_naive(a.as_slice(), b.as_slice(), &mut once, dims);

    for kernel in [Kernel::Cacheline, Kernel::Sse, Kernel::Avx] {
        let mut c = Matrix::allocate(17, 17).unwrap();
        kernel.run(a.as_slice(), b.as_slice(), c.as_mut_slice(), dims);
        kernel.run(a.as_slice(), b.as_slice(), c.as_mut_slice(), dims);
        let doubled: Vec<f32> = once.iter().map(|x| 2.0 * x).collect();
        assert_eq!(c.as_slice(), &doubled[..], "{kernel}");
    }
}

#[test]
fn test_transpose_is_consistent_with_slice_helper() {
    let mut rng = StdRng::seed_from_u64(1);
    let (_, b, bt) = random_operands(1, 7, 16, &mut rng);
    let mut manual = vec![0.0; 7 * 16];
    transpose(b.as_slice(), &mut manual, 7, 16);
    assert_eq!(bt.as_slice(), &manual[..]);
    assert_eq!((bt.rows(), bt.cols()), (16, 7));
}
