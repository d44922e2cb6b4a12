use crate::arith::BigInt;
use crate::curve::CurveModel;
use crate::point::ProjectivePoint;
use crate::wire::CurvePacket;
use rug::rand::RandState;
use std::collections::BTreeSet;

/// y^2 = x^3 + a*x + b (mod N), neutral element (0, 1, 0).
pub struct WeierstrassModel {
    modulus: BigInt,
    neutral: ProjectivePoint,
    a: BigInt,
    b: BigInt,
    seen: BTreeSet<(BigInt, BigInt)>,
}

impl WeierstrassModel {
    pub fn new(modulus: BigInt) -> Self {
        WeierstrassModel {
            modulus,
            neutral: ProjectivePoint::new(BigInt::zero(), BigInt::one(), BigInt::zero()),
            a: BigInt::zero(),
            b: BigInt::zero(),
            seen: BTreeSet::new(),
        }
    }

    pub fn a(&self) -> &BigInt {
        &self.a
    }

    pub fn b(&self) -> &BigInt {
        &self.b
    }

    /// Adopts an already-generated curve (a, b), as a worker does on
    /// receiving one from the master (§4.6.1). The starting point's Z is
    /// reset to 1 by the caller.
    pub fn set_curve(&mut self, a: BigInt, b: BigInt) {
        self.a = a;
        self.b = b;
    }

    /// GCD(4a^3 + 27b^2, N) == 1, i.e. the curve is non-singular over Z/NZ.
    fn is_nonsingular(&self, a: &BigInt, b: &BigInt) -> bool {
        let four_a_cubed = a.pow_mod_small(3, &self.modulus).shl_mod(2, &self.modulus);
        let twenty_seven_b_sq = b
            .square_mod(&self.modulus)
            .mul_mod(&BigInt::from_u64(27), &self.modulus);
        let discriminant_like = four_a_cubed.add_mod(&twenty_seven_b_sq, &self.modulus);
        discriminant_like.gcd(&self.modulus) == BigInt::one()
    }
}

impl CurveModel for WeierstrassModel {
    fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    fn neutral(&self) -> &ProjectivePoint {
        &self.neutral
    }

    fn add(&self, p: &ProjectivePoint, q: &ProjectivePoint) -> ProjectivePoint {
        if self.is_neutral(p) {
            return q.clone();
        }
        if self.is_neutral(q) {
            return p.clone();
        }
        if p == q {
            return self.double(p);
        }

        let m = &self.modulus;
        let a = q.y.mul_mod(&p.z, m);
        let b = p.y.mul_mod(&q.z, m);
        let c = q.x.mul_mod(&p.z, m);
        let d = p.x.mul_mod(&q.z, m);
        let e = a.sub_mod(&b, m);
        let f = c.sub_mod(&d, m);
        let g = f.square_mod(m);
        let h = g.mul_mod(&f, m);
        let i = p.z.mul_mod(&q.z, m);
        let j = {
            let e_sq_i = e.square_mod(m).mul_mod(&i, m);
            let two_g_d = g.mul_mod(&d, m).shl_mod(1, m);
            e_sq_i.sub_mod(&h, m).sub_mod(&two_g_d, m)
        };

        let x_r = f.mul_mod(&j, m);
        let y_r = {
            let gd_minus_j = g.mul_mod(&d, m).sub_mod(&j, m);
            e.mul_mod(&gd_minus_j, m).sub_mod(&h.mul_mod(&b, m), m)
        };
        let z_r = h.mul_mod(&i, m);

        ProjectivePoint::new(x_r, y_r, z_r)
    }

    fn double(&self, p: &ProjectivePoint) -> ProjectivePoint {
        if self.is_neutral(p) {
            return p.clone();
        }
        let m = &self.modulus;
        let a = {
            let a_z_sq = self.a.mul_mod(&p.z.square_mod(m), m);
            let three_x_sq = {
                let x_sq = p.x.square_mod(m);
                x_sq.add_mod(&x_sq, m).add_mod(&x_sq, m)
            };
            a_z_sq.add_mod(&three_x_sq, m)
        };
        let b = p.y.mul_mod(&p.z, m);
        let c = p.x.mul_mod(&p.y, m).mul_mod(&b, m);
        let d = a.square_mod(m).sub_mod(&c.shl_mod(3, m), m);

        let x_r = b.mul_mod(&d, m).shl_mod(1, m);
        let y_r = {
            let four_c_minus_d = c.shl_mod(2, m).sub_mod(&d, m);
            let eight_y2_b2 = p.y.square_mod(m).shl_mod(3, m).mul_mod(&b.square_mod(m), m);
            a.mul_mod(&four_c_minus_d, m).sub_mod(&eight_y2_b2, m)
        };
        let z_r = b.square_mod(m).mul_mod(&b, m).shl_mod(3, m);

        ProjectivePoint::new(x_r, y_r, z_r)
    }

    fn generate_curve(&mut self, rand: &mut RandState) -> ProjectivePoint {
        let m = &self.modulus;
        loop {
            let x = m.random_below(rand);
            let y = m.random_below(rand);
            let a = m.random_below(rand);
            let x_cubed = x.square_mod(m).mul_mod(&x, m);
            let b = y
                .square_mod(m)
                .sub_mod(&x_cubed, m)
                .sub_mod(&a.mul_mod(&x, m), m);

            if self.seen.contains(&(a.clone(), b.clone())) {
                continue;
            }
            if !self.is_nonsingular(&a, &b) {
                continue;
            }

            self.seen.insert((a.clone(), b.clone()));
            self.a = a;
            self.b = b;
            return ProjectivePoint::new(x, y, BigInt::one());
        }
    }

    fn to_packet(&self, point: &ProjectivePoint) -> CurvePacket {
        CurvePacket::Weierstrass {
            x: point.x.clone(),
            y: point.y.clone(),
            a: self.a.clone(),
            b: self.b.clone(),
        }
    }

    fn adopt_packet(&mut self, packet: CurvePacket) -> ProjectivePoint {
        match packet {
            CurvePacket::Weierstrass { x, y, a, b } => {
                self.set_curve(a, b);
                ProjectivePoint::new(x, y, BigInt::one())
            }
            CurvePacket::Edwards { .. } => {
                panic!("worker received an Edwards packet while running the Weierstrass model")
            }
        }
    }
}
