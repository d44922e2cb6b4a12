use crate::arith::BigInt;
use crate::curve::ModelKind;
use crate::error::EcmError;

/// Immutable configuration for one factorization run, shared read-only
/// across all workers (§3).
#[derive(Clone, Debug)]
pub struct RunContext {
    pub composite: BigInt,
    pub bound: BigInt,
    pub model: ModelKind,
    pub parallel: bool,
    pub workers: usize,
}

impl RunContext {
    /// Applies the model-selection and bound-clamping rules from §6/§4.5
    /// and returns a ready-to-run context, or the `EcmError` that maps to
    /// the documented exit code.
    pub fn build(
        composite: BigInt,
        user_bound: Option<BigInt>,
        weierstrass: bool,
        edwards: bool,
        parallel: bool,
        workers: usize,
    ) -> Result<RunContext, EcmError> {
        if weierstrass && edwards {
            return Err(EcmError::BothModelsSpecified);
        }
        if composite < BigInt::from_u64(2) {
            return Err(EcmError::CompositeTooSmall);
        }

        // Default is Weierstrass when neither flag is given.
        let model = if edwards {
            ModelKind::Edwards
        } else {
            ModelKind::Weierstrass
        };

        let sqrt_n = composite.isqrt();
        let bound = match user_bound {
            Some(b) if b > BigInt::from_u64(2) => {
                if b < sqrt_n {
                    b
                } else {
                    sqrt_n
                }
            }
            _ => sqrt_n,
        };

        Ok(RunContext {
            composite,
            bound,
            model,
            parallel,
            workers: workers.max(1),
        })
    }

    /// §4.5: GCD probing is expensive, so the driver only probes roughly
    /// every `test_after` iterations, floored at 100.
    pub fn test_after(&self) -> BigInt {
        let divided = self.bound.div_u64(1_000_000);
        if divided < BigInt::from_u64(100) {
            BigInt::from_u64(100)
        } else {
            divided
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_models_is_rejected() {
        let err = RunContext::build(BigInt::from_u64(35), None, true, true, false, 1).unwrap_err();
        assert_eq!(err, EcmError::BothModelsSpecified);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn composite_below_two_is_rejected() {
        let err = RunContext::build(BigInt::from_u64(1), None, false, false, false, 1).unwrap_err();
        assert_eq!(err, EcmError::CompositeTooSmall);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn default_model_is_weierstrass() {
        let ctx = RunContext::build(BigInt::from_u64(35), None, false, false, false, 1).unwrap();
        assert_eq!(ctx.model, ModelKind::Weierstrass);
    }

    #[test]
    fn edwards_flag_selects_edwards() {
        let ctx = RunContext::build(BigInt::from_u64(35), None, false, true, false, 1).unwrap();
        assert_eq!(ctx.model, ModelKind::Edwards);
    }

    #[test]
    fn small_user_bound_is_ignored() {
        let ctx = RunContext::build(BigInt::from_u64(1_000_000), Some(BigInt::from_u64(2)), false, false, false, 1)
            .unwrap();
        assert_eq!(ctx.bound, BigInt::from_u64(1_000_000).isqrt());
    }

    #[test]
    fn oversized_user_bound_is_clamped_to_sqrt_n() {
        let n = BigInt::from_u64(1_000_000);
        let ctx = RunContext::build(n.clone(), Some(BigInt::from_u64(1_000_000)), false, false, false, 1).unwrap();
        assert_eq!(ctx.bound, n.isqrt());
    }

    #[test]
    fn user_bound_within_range_is_kept() {
        let n = BigInt::from_u64(1_000_000);
        let ctx = RunContext::build(n, Some(BigInt::from_u64(50)), false, false, false, 1).unwrap();
        assert_eq!(ctx.bound, BigInt::from_u64(50));
    }

    #[test]
    fn test_after_has_a_floor_of_one_hundred() {
        let ctx = RunContext::build(BigInt::from_u64(10_403), None, false, false, false, 1).unwrap();
        assert_eq!(ctx.test_after(), BigInt::from_u64(100));
    }
}
