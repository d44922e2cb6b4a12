use crate::arith::BigInt;
use std::fmt;

/// A point P = (X : Y : Z) in projective coordinates over Z/NZ.
///
/// Two points are equal iff their three coordinates are componentwise
/// equal; arithmetic never needs true projective-equivalence comparison
/// because every coordinate written by curve arithmetic is reduced modulo
/// N at write time (see the curve formulas in `crate::curve`).
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ProjectivePoint {
    pub x: BigInt,
    pub y: BigInt,
    pub z: BigInt,
}

impl ProjectivePoint {
    pub fn new(x: BigInt, y: BigInt, z: BigInt) -> Self {
        ProjectivePoint { x, y, z }
    }

    /// Reset Z to 1, as done on the receiving side whenever a (curve,
    /// point) pair crosses a worker boundary (§4.6.1).
    pub fn with_z_reset(mut self) -> Self {
        self.z = BigInt::one();
        self
    }
}

impl fmt::Display for ProjectivePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
