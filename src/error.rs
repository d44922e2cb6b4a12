use std::fmt;

/// Errors on the input-validation path (§7). The factorization core itself
/// never returns `Result`: every condition it observes at runtime is either
/// "keep searching" or "done", handled locally (resample, retry, or return
/// the factor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcmError {
    /// CLI parsing failed, or `--help` was requested.
    BadArguments(String),
    /// Both `--weierstrass_model` and `--edwards_model` were given.
    BothModelsSpecified,
    /// The composite number is smaller than 2.
    CompositeTooSmall,
}

impl EcmError {
    /// The documented process exit code for this condition (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            EcmError::BadArguments(_) => 1,
            EcmError::BothModelsSpecified => 2,
            EcmError::CompositeTooSmall => 3,
        }
    }
}

impl fmt::Display for EcmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcmError::BadArguments(msg) => write!(f, "{}", msg),
            EcmError::BothModelsSpecified => write!(f, "Only one model can be specified!"),
            EcmError::CompositeTooSmall => {
                write!(f, "Composite number must be a positive integer bigger than 1!")
            }
        }
    }
}

impl std::error::Error for EcmError {}
