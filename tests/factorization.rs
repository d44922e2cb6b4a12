use lenstra_ecm::curve::{EdwardsModel, WeierstrassModel};
use lenstra_ecm::driver::{run_parallel, run_sequential};
use lenstra_ecm::{BigInt, RunContext};
use rug::rand::RandState;

fn rng(seed: u64) -> RandState<'static> {
    let mut r = RandState::new();
    r.seed(&rug::Integer::from(seed));
    r
}

/// §8 scenario 1: N = 100_003 * 10_007, Weierstrass.
#[test]
fn sequential_weierstrass_factors_1000730021() {
    let ctx = RunContext::build(BigInt::from_u64(1_000_730_021), None, true, false, false, 1).unwrap();
    let mut model = WeierstrassModel::new(ctx.composite.clone());
    let factor = run_sequential(&ctx, &mut model, &mut rng(101));
    assert!(factor == BigInt::from_u64(100_003) || factor == BigInt::from_u64(10_007));
}

/// §8 scenario 2: same N, Edwards.
#[test]
fn sequential_edwards_factors_1000730021() {
    let ctx = RunContext::build(BigInt::from_u64(1_000_730_021), None, false, true, false, 1).unwrap();
    let mut model = EdwardsModel::new(ctx.composite.clone());
    let factor = run_sequential(&ctx, &mut model, &mut rng(202));
    assert!(factor == BigInt::from_u64(100_003) || factor == BigInt::from_u64(10_007));
}

/// §8 scenario 3: N = 83 * 97, either model.
#[test]
fn sequential_factors_8051_with_both_models() {
    let ctx_w = RunContext::build(BigInt::from_u64(8_051), None, true, false, false, 1).unwrap();
    let mut w = WeierstrassModel::new(ctx_w.composite.clone());
    let fw = run_sequential(&ctx_w, &mut w, &mut rng(303));
    assert!(fw == BigInt::from_u64(83) || fw == BigInt::from_u64(97));

    let ctx_e = RunContext::build(BigInt::from_u64(8_051), None, false, true, false, 1).unwrap();
    let mut e = EdwardsModel::new(ctx_e.composite.clone());
    let fe = run_sequential(&ctx_e, &mut e, &mut rng(304));
    assert!(fe == BigInt::from_u64(83) || fe == BigInt::from_u64(97));
}

/// §8 scenario 4: N = 101 * 103, either model.
#[test]
fn sequential_factors_10403_with_both_models() {
    let ctx_w = RunContext::build(BigInt::from_u64(10_403), None, true, false, false, 1).unwrap();
    let mut w = WeierstrassModel::new(ctx_w.composite.clone());
    let fw = run_sequential(&ctx_w, &mut w, &mut rng(405));
    assert!(fw == BigInt::from_u64(101) || fw == BigInt::from_u64(103));

    let ctx_e = RunContext::build(BigInt::from_u64(10_403), None, false, true, false, 1).unwrap();
    let mut e = EdwardsModel::new(ctx_e.composite.clone());
    let fe = run_sequential(&ctx_e, &mut e, &mut rng(406));
    assert!(fe == BigInt::from_u64(101) || fe == BigInt::from_u64(103));
}

/// §8 scenario 5: N = 100_003 * 10_007, parallel mode with 4 workers.
/// Exactly one worker (the process as a whole, in this single-binary
/// redesign) returns a factor from the expected pair.
#[test]
fn parallel_four_workers_factors_1000730021() {
    let ctx = RunContext::build(BigInt::from_u64(1_000_730_021), None, true, false, true, 4).unwrap();
    let factor = run_parallel(&ctx, WeierstrassModel::new);
    assert!(factor == BigInt::from_u64(100_003) || factor == BigInt::from_u64(10_007));
}

/// §8 scenario 6: N = 6, either model, should resolve within a handful of
/// iterations since a trivial shared factor surfaces almost immediately.
#[test]
fn factors_six_quickly_with_either_model() {
    let ctx_w = RunContext::build(BigInt::from_u64(6), None, true, false, false, 1).unwrap();
    let mut w = WeierstrassModel::new(ctx_w.composite.clone());
    let fw = run_sequential(&ctx_w, &mut w, &mut rng(600));
    assert!(fw == BigInt::from_u64(2) || fw == BigInt::from_u64(3));

    let ctx_e = RunContext::build(BigInt::from_u64(6), None, false, true, false, 1).unwrap();
    let mut e = EdwardsModel::new(ctx_e.composite.clone());
    let fe = run_sequential(&ctx_e, &mut e, &mut rng(601));
    assert!(fe == BigInt::from_u64(2) || fe == BigInt::from_u64(3));
}
