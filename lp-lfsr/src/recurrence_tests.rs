use crate::{recover_coefficients, solve, Lfsr, SolveError, F5039, MODULUS};

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

const ORDER: usize = 10;

fn random_elems(rng: &mut ChaCha8Rng, n: usize) -> Vec<F5039> {
    (0..n)
        .map(|_| F5039::from(rng.gen_range(0..MODULUS)))
        .collect()
}

/// seed followed by `extra` generated terms.
fn sequence(seed: &[F5039], coefs: &[F5039], extra: usize) -> Vec<F5039> {
    let mut out = seed.to_vec();
    let lfsr = Lfsr::new(seed.to_vec(), coefs.to_vec()).unwrap();
    out.extend(lfsr.take(extra));
    out
}

#[test]
fn solve_small_system() {
    // x + 2y = 5, 3x + 4y = 6  over Z/5039
    let f = |v: u32| F5039::from(v);
    let a = vec![vec![f(1), f(2)], vec![f(3), f(4)]];
    let b = vec![f(5), f(6)];
    let x = solve(&a, &b).unwrap();
    assert_eq!(f(1) * x[0] + f(2) * x[1], f(5));
    assert_eq!(f(3) * x[0] + f(4) * x[1], f(6));
}

#[test]
fn solve_needs_row_swap() {
    let f = |v: u32| F5039::from(v);
    let a = vec![vec![f(0), f(1)], vec![f(1), f(0)]];
    let b = vec![f(7), f(9)];
    assert_eq!(solve(&a, &b).unwrap(), vec![f(9), f(7)]);
}

#[test]
fn singular_system_is_an_error() {
    let f = |v: u32| F5039::from(v);
    let a = vec![vec![f(1), f(2)], vec![f(2), f(4)]];
    let b = vec![f(1), f(1)];
    assert_eq!(solve(&a, &b), Err(SolveError::Singular { column: 1 }));
}

#[test]
fn shape_errors() {
    let f = |v: u32| F5039::from(v);
    assert!(matches!(
        solve(&[vec![f(1), f(2)]], &[f(1)]),
        Err(SolveError::Shape { .. })
    ));
    assert!(matches!(
        solve(&[vec![f(1)]], &[f(1), f(2)]),
        Err(SolveError::Shape { .. })
    ));
    assert!(matches!(
        Lfsr::new(vec![f(1)], vec![f(1), f(2)]),
        Err(SolveError::Shape { .. })
    ));
}

#[test]
fn recovery_round_trip_random_recurrences() {
    let mut rng = ChaCha8Rng::seed_from_u64(2021);
    let mut recovered = 0;
    for _ in 0..50 {
        let coefs = random_elems(&mut rng, ORDER);
        let seed = random_elems(&mut rng, ORDER);
        let terms = sequence(&seed, &coefs, ORDER);
        assert_eq!(terms.len(), 2 * ORDER);

        match recover_coefficients(&terms, ORDER) {
            Ok(got) => {
                assert_eq!(got, coefs);
                recovered += 1;
            }
            // A random Hankel matrix is singular with probability ~1/5039.
            Err(SolveError::Singular { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(recovered >= 45, "only {recovered} of 50 recovered");
}

#[test]
fn recovered_generator_predicts_the_future() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let coefs = random_elems(&mut rng, ORDER);
    let seed = random_elems(&mut rng, ORDER);
    let full = sequence(&seed, &coefs, 200);

    let mut lfsr = match Lfsr::recover(&full[..2 * ORDER], ORDER) {
        Ok(l) => l,
        Err(SolveError::Singular { .. }) => return,
        Err(e) => panic!("unexpected error: {e}"),
    };
    assert_eq!(lfsr.order(), ORDER);
    assert_eq!(lfsr.coefs(), coefs.as_slice());
    for (i, &want) in full.iter().enumerate().skip(2 * ORDER) {
        assert_eq!(lfsr.step(), want, "term {}", i);
    }
}

#[test]
fn step_slides_the_window() {
    let f = |v: u32| F5039::from(v);
    // Fibonacci: t[i] = t[i-2] + t[i-1]
    let mut lfsr = Lfsr::new(vec![f(1), f(1)], vec![f(1), f(1)]).unwrap();
    let got: Vec<u32> = lfsr.by_ref().take(6).map(|x| x.value()).collect();
    assert_eq!(got, vec![2, 3, 5, 8, 13, 21]);
    assert_eq!(lfsr.state().map(|x| x.value()).collect::<Vec<_>>(), vec![13, 21]);
}

#[test]
fn extra_terms_are_checked() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let coefs = random_elems(&mut rng, ORDER);
    let seed = random_elems(&mut rng, ORDER);
    let mut terms = sequence(&seed, &coefs, ORDER + 5);

    if let Ok(mut lfsr) = Lfsr::recover(&terms, ORDER) {
        // Positioned after the last observed term.
        let next = sequence(&seed, &coefs, ORDER + 6)[2 * ORDER + 5];
        assert_eq!(lfsr.step(), next);

        terms[2 * ORDER + 2] += F5039::ONE;
        assert_eq!(
            Lfsr::recover(&terms, ORDER).unwrap_err(),
            SolveError::Inconsistent { index: 2 * ORDER + 2 }
        );
    }
}

#[test]
fn degenerate_sequences_are_singular() {
    let zeros = vec![F5039::ZERO; 2 * ORDER];
    assert!(matches!(
        recover_coefficients(&zeros, ORDER),
        Err(SolveError::Singular { column: 0 })
    ));

    let constant = vec![F5039::from(42u32); 2 * ORDER];
    assert!(matches!(
        recover_coefficients(&constant, ORDER),
        Err(SolveError::Singular { .. })
    ));
}

#[test]
fn too_few_terms() {
    let terms = vec![F5039::ONE; 2 * ORDER - 1];
    assert_eq!(
        recover_coefficients(&terms, ORDER),
        Err(SolveError::NotEnoughTerms {
            order: ORDER,
            need: 2 * ORDER,
            got: 2 * ORDER - 1
        })
    );
    assert!(matches!(
        recover_coefficients::<5039>(&[], 0),
        Err(SolveError::NotEnoughTerms { .. })
    ));
}
