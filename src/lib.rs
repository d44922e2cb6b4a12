//! Elliptic Curve Method integer factorization.
//!
//! `arith` wraps arbitrary-precision modular arithmetic, `point` and
//! `curve` implement the Weierstrass and twisted Edwards group laws,
//! `context` resolves CLI input into a ready-to-run configuration, and
//! `driver` provides the sequential and master/worker-parallel outer loops
//! that drive a `CurveModel` toward a factor.

pub mod arith;
pub mod context;
pub mod curve;
pub mod driver;
pub mod error;
pub mod point;
pub mod wire;

pub use arith::BigInt;
pub use context::RunContext;
pub use curve::{CurveModel, EdwardsModel, ModelKind, WeierstrassModel};
pub use error::EcmError;
pub use point::ProjectivePoint;
