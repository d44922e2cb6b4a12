pub mod edwards;
pub mod weierstrass;

pub use edwards::EdwardsModel;
pub use weierstrass::WeierstrassModel;

use crate::arith::BigInt;
use crate::point::ProjectivePoint;
use crate::wire::CurvePacket;
use rug::rand::RandState;

/// Polymorphic interface over an elliptic-curve model (§4.2).
///
/// `WeierstrassModel` and `EdwardsModel` are the two implementations; the
/// driver is generic over `CurveModel` so dispatch is resolved statically
/// per the model the caller selected, rather than through a vtable.
pub trait CurveModel {
    /// N, the composite being factored. Shared, immutable for the run.
    fn modulus(&self) -> &BigInt;

    /// The model's neutral element ("infinity point").
    fn neutral(&self) -> &ProjectivePoint;

    /// Group-law addition. Implementations dispatch the `P == Q` case to
    /// `double` and the either-operand-neutral cases to the identity.
    fn add(&self, p: &ProjectivePoint, q: &ProjectivePoint) -> ProjectivePoint;

    /// Point doubling.
    fn double(&self, p: &ProjectivePoint) -> ProjectivePoint;

    /// Samples a fresh curve (rejecting duplicates and, for Weierstrass,
    /// singular curves), records it in this model's `SeenCurves`, and
    /// returns a point lying on it.
    fn generate_curve(&mut self, rand: &mut RandState) -> ProjectivePoint;

    /// Encodes this model's current curve plus `point` for transmission to
    /// another worker (§4.6.1).
    fn to_packet(&self, point: &ProjectivePoint) -> CurvePacket;

    /// Adopts a curve received from another worker, discarding whatever
    /// curve this model was previously on, and returns the associated
    /// starting point with Z reset to 1.
    fn adopt_packet(&mut self, packet: CurvePacket) -> ProjectivePoint;

    fn is_neutral(&self, p: &ProjectivePoint) -> bool {
        p == self.neutral()
    }

    /// `GCD(P.Z, N)`: 1 means no factor yet, N means pathological, anything
    /// strictly between is the win.
    fn try_get_factor(&self, p: &ProjectivePoint) -> BigInt {
        p.z.gcd(self.modulus())
    }

    /// Right-to-left double-and-add scalar multiplication with the
    /// mandatory early exit on an intermediate neutral doubling (§4.2).
    fn scalar_multiply(&self, k: &BigInt, p: &ProjectivePoint) -> ProjectivePoint {
        let mut q = self.neutral().clone();
        let mut n = p.clone();
        let mut k = k.clone();
        while !k.is_zero() {
            if k.is_odd() {
                q = self.add(&q, &n);
            }
            n = self.double(&n);
            if self.is_neutral(&n) {
                break;
            }
            k = k.shr1();
        }
        q
    }
}

/// Which curve family a run uses. Selects which `CurveModel`
/// monomorphization the driver is instantiated with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    Weierstrass,
    Edwards,
}

impl ModelKind {
    pub fn name(self) -> &'static str {
        match self {
            ModelKind::Weierstrass => "Weierstrass",
            ModelKind::Edwards => "Edwards",
        }
    }
}
