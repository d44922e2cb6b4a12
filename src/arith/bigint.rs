use rug::ops::Pow;
use rug::{rand::RandState, Integer};
use std::fmt;
use std::str::FromStr;

/// Thin adapter over `rug::Integer`.
///
/// Every modular operation below reduces its result into `[0, modulus)`
/// before returning, so call sites never need to think about `rug`'s
/// possibly-negative remainders.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BigInt(Integer);

fn take_mod(a: Integer, modulus: &Integer) -> Integer {
    let (_, rem) = <(Integer, Integer)>::from(a.div_rem_ref(modulus));
    if rem < 0 {
        rem + modulus
    } else {
        rem
    }
}

impl BigInt {
    pub fn zero() -> Self {
        BigInt(Integer::from(0))
    }

    pub fn one() -> Self {
        BigInt(Integer::from(1))
    }

    pub fn from_u64(v: u64) -> Self {
        BigInt(Integer::from(v))
    }

    pub fn from_integer(v: Integer) -> Self {
        BigInt(v)
    }

    pub fn as_integer(&self) -> &Integer {
        &self.0
    }

    pub fn into_integer(self) -> Integer {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn add_mod(&self, other: &BigInt, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0 + &other.0), &modulus.0))
    }

    pub fn sub_mod(&self, other: &BigInt, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0 - &other.0), &modulus.0))
    }

    pub fn mul_mod(&self, other: &BigInt, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0 * &other.0), &modulus.0))
    }

    pub fn square_mod(&self, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0).square(), &modulus.0))
    }

    /// Left-shift by a small constant (used for the literal `<< 1`, `<< 2`,
    /// `<< 3` appearing in the curve-arithmetic formulas), then reduce.
    pub fn shl_mod(&self, bits: u32, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0 << bits), &modulus.0))
    }

    pub fn pow_mod_small(&self, exponent: u32, modulus: &BigInt) -> BigInt {
        BigInt(take_mod(Integer::from(&self.0).pow(exponent), &modulus.0))
    }

    pub fn gcd(&self, other: &BigInt) -> BigInt {
        BigInt(Integer::from(&self.0).gcd(&other.0))
    }

    /// Modular inverse. `None` iff `gcd(self, modulus) != 1`; the caller is
    /// expected to have already checked that, per §4.1 — a `None` here is
    /// routed upward as a candidate-factor event rather than treated as an
    /// error.
    pub fn invert_mod(&self, modulus: &BigInt) -> Option<BigInt> {
        self.0
            .invert_ref(&modulus.0)
            .map(|incomplete| BigInt(Integer::from(incomplete)))
    }

    /// Uniform random value in `[0, self)`.
    pub fn random_below(&self, rand: &mut RandState) -> BigInt {
        BigInt(Integer::from(&self.0).random_below(rand))
    }

    pub fn isqrt(&self) -> BigInt {
        BigInt(Integer::from(&self.0).sqrt())
    }

    /// Bit-test of bit 0 — true when `self` is odd.
    pub fn is_odd(&self) -> bool {
        self.0.is_odd()
    }

    pub fn shr1(&self) -> BigInt {
        BigInt(Integer::from(&self.0 >> 1u32))
    }

    /// Plain (non-modular) division by a small constant, used only for the
    /// `test_after` iteration-spacing heuristic (§4.5) — never for curve
    /// arithmetic, which stays modular throughout.
    pub fn div_u64(&self, divisor: u64) -> BigInt {
        BigInt(Integer::from(&self.0 / divisor))
    }

    /// Plain (non-modular) remainder, used only for the driver's
    /// `counter % test_after` probe-spacing check (§4.5) — both operands
    /// are always nonnegative loop counters here, never curve coordinates.
    pub fn rem(&self, divisor: &BigInt) -> BigInt {
        BigInt(Integer::from(&self.0 % &divisor.0))
    }

    /// Plain (non-modular) successor, used only to step loop counters
    /// (`k`, `counter`) in the drivers.
    pub fn succ(&self) -> BigInt {
        BigInt(Integer::from(&self.0 + 1))
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BigInt {
    type Err = rug::integer::ParseIntegerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BigInt(Integer::from_str(s)?))
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        BigInt::from_u64(v)
    }
}
