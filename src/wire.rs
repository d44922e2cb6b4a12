use crate::arith::BigInt;
use std::fmt;

/// A (curve, starting point) pair as exchanged between master and worker
/// (§4.6.1). In the original design this was a textual (decimal-string)
/// encoding sent over MPI; here it is a plain Rust enum carried directly
/// over a typed channel (§9), so there is no literal byte-level wire to
/// encode — the `Display` impl below exists only to keep the textual
/// rendering available for logging parity with the original design.
/// Z is always reset to 1 on receipt (see `CurveModel::adopt_packet`).
#[derive(Clone, Debug)]
pub enum CurvePacket {
    Weierstrass {
        x: BigInt,
        y: BigInt,
        a: BigInt,
        b: BigInt,
    },
    Edwards {
        x: BigInt,
        y: BigInt,
        d: BigInt,
    },
}

impl fmt::Display for CurvePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurvePacket::Weierstrass { x, y, a, b } => {
                write!(f, "weierstrass point=({}, {}) a={} b={}", x, y, a, b)
            }
            CurvePacket::Edwards { x, y, d } => {
                write!(f, "edwards point=({}, {}) d={}", x, y, d)
            }
        }
    }
}

/// Message tag values from §4.6.1, kept as named constants for
/// documentation fidelity with the original design. Rust's channel API
/// does not need numeric tags on the wire — each channel only ever carries
/// one message type — but the values are retained here rather than
/// dropped, since they are part of what the spec names.
pub const TAG_NEW_ECC: u32 = 0x1000;
pub const TAG_STOP: u32 = 0x0100;
