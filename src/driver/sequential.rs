use crate::arith::BigInt;
use crate::context::RunContext;
use crate::curve::CurveModel;
use log::{debug, info};
use rug::rand::RandState;

/// §4.5 — the outer loop: generate a curve, scalar-multiply up to the
/// bound, probe periodically, retry on failure. Runs until a non-trivial
/// factor is found (the algorithm is probabilistic and has no bounded
/// worst case).
pub fn run_sequential<M: CurveModel>(ctx: &RunContext, model: &mut M, rand: &mut RandState) -> BigInt {
    let n = &ctx.composite;
    let bound = &ctx.bound;
    let test_after = ctx.test_after();
    debug!("bound={} test_after={}", bound, test_after);

    let mut counter = BigInt::one();
    let mut curves_tried: u64 = 0;

    loop {
        let mut point = model.generate_curve(rand);
        curves_tried += 1;
        info!("curve {}", curves_tried);

        let mut k = BigInt::from_u64(2);
        while k < *bound {
            point = model.scalar_multiply(&k, &point);
            counter = counter.succ();

            if counter.rem(&test_after).is_zero() {
                let d = model.try_get_factor(&point);
                if d > BigInt::one() && d < *n {
                    return d;
                }
                counter = BigInt::zero();
            }

            if model.is_neutral(&point) {
                debug!("hit neutral element at k={}", k);
                break;
            }
            k = k.succ();
        }

        let d = model.try_get_factor(&point);
        if d > BigInt::one() && d < *n {
            return d;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{EdwardsModel, WeierstrassModel};

    fn rng(seed: u64) -> RandState<'static> {
        let mut r = RandState::new();
        r.seed(&rug::Integer::from(seed));
        r
    }

    fn ctx(n: u64) -> RunContext {
        RunContext::build(BigInt::from_u64(n), None, true, false, false, 1).unwrap()
    }

    #[test]
    fn finds_a_factor_of_8051_with_weierstrass() {
        let run_ctx = ctx(8_051); // 83 * 97
        let mut model = WeierstrassModel::new(run_ctx.composite.clone());
        let mut rand = rng(7);
        let factor = run_sequential(&run_ctx, &mut model, &mut rand);
        assert!(factor == BigInt::from_u64(83) || factor == BigInt::from_u64(97));
    }

    #[test]
    fn finds_a_factor_of_10403_with_edwards() {
        let run_ctx = RunContext::build(BigInt::from_u64(10_403), None, false, true, false, 1).unwrap(); // 101 * 103
        let mut model = EdwardsModel::new(run_ctx.composite.clone());
        let mut rand = rng(11);
        let factor = run_sequential(&run_ctx, &mut model, &mut rand);
        assert!(factor == BigInt::from_u64(101) || factor == BigInt::from_u64(103));
    }

    #[test]
    fn finds_a_factor_of_six_quickly() {
        let run_ctx = ctx(6);
        let mut model = WeierstrassModel::new(run_ctx.composite.clone());
        let mut rand = rng(13);
        let factor = run_sequential(&run_ctx, &mut model, &mut rand);
        assert!(factor == BigInt::from_u64(2) || factor == BigInt::from_u64(3));
    }
}
