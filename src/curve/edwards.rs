use crate::arith::BigInt;
use crate::curve::CurveModel;
use crate::point::ProjectivePoint;
use crate::wire::CurvePacket;
use rug::rand::RandState;
use std::collections::BTreeSet;

/// x^2 + y^2 = 1 + d*x^2*y^2 (mod N), neutral element (0, 1, 1).
pub struct EdwardsModel {
    modulus: BigInt,
    neutral: ProjectivePoint,
    d: BigInt,
    seen: BTreeSet<BigInt>,
}

impl EdwardsModel {
    pub fn new(modulus: BigInt) -> Self {
        EdwardsModel {
            modulus,
            neutral: ProjectivePoint::new(BigInt::zero(), BigInt::one(), BigInt::one()),
            d: BigInt::one(),
            seen: BTreeSet::new(),
        }
    }

    pub fn d(&self) -> &BigInt {
        &self.d
    }

    /// Adopts an already-generated curve `d`, as a worker does on receiving
    /// one from the master (§4.6.1).
    pub fn set_curve(&mut self, d: BigInt) {
        self.d = d;
    }
}

impl CurveModel for EdwardsModel {
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
        let a = p.z.mul_mod(&q.z, m);
        let b = a.square_mod(m);
        let c = p.x.mul_mod(&q.x, m);
        let d = p.y.mul_mod(&q.y, m);
        let e = c.mul_mod(&d, m);
        let f = b.sub_mod(&e, m);
        let g = b.add_mod(&e, m);

        let x_r = {
            let sum_cross = p.x.add_mod(&p.y, m).mul_mod(&q.x.add_mod(&q.y, m), m);
            let inner = sum_cross.sub_mod(&c, m).sub_mod(&d, m);
            a.mul_mod(&f, m).mul_mod(&inner, m)
        };
        let y_r = a.mul_mod(&g, m).mul_mod(&d.sub_mod(&c, m), m);
        let z_r = f.mul_mod(&g, m);

        ProjectivePoint::new(x_r, y_r, z_r)
    }

    fn double(&self, p: &ProjectivePoint) -> ProjectivePoint {
        if self.is_neutral(p) {
            return p.clone();
        }
        let m = &self.modulus;
        let b = p.x.add_mod(&p.y, m).square_mod(m);
        let c = p.x.square_mod(m);
        let d = p.y.square_mod(m);
        let f = c.add_mod(&d, m);
        let h = p.z.square_mod(m);
        let j = f.sub_mod(&h.shl_mod(1, m), m);

        let x_r = b.sub_mod(&c, m).sub_mod(&d, m).mul_mod(&j, m);
        let y_r = f.mul_mod(&c.sub_mod(&d, m), m);
        let z_r = f.mul_mod(&j, m);

        ProjectivePoint::new(x_r, y_r, z_r)
    }

    fn generate_curve(&mut self, rand: &mut RandState) -> ProjectivePoint {
        let m = &self.modulus;
        self.d = BigInt::one(); // sentinel meaning "keep sampling"
        let mut x = BigInt::zero();
        let mut y = BigInt::zero();

        while self.d < BigInt::from_u64(2) {
            x = m.random_below(rand);
            y = m.random_below(rand);
            let square_x = x.square_mod(m);
            let square_y = y.square_mod(m);
            let mult = square_x.mul_mod(&square_y, m);

            if mult.gcd(m) == BigInt::one() {
                let inv = mult.invert_mod(m).expect("gcd(mult, N) == 1 was just checked");
                self.d = square_x
                    .add_mod(&square_y, m)
                    .sub_mod(&BigInt::one(), m)
                    .mul_mod(&inv, m);
            }

            if self.seen.contains(&self.d) {
                self.d = BigInt::one();
            }
        }

        self.seen.insert(self.d.clone());
        ProjectivePoint::new(x, y, BigInt::one())
    }

    fn to_packet(&self, point: &ProjectivePoint) -> CurvePacket {
        CurvePacket::Edwards {
            x: point.x.clone(),
            y: point.y.clone(),
            d: self.d.clone(),
        }
    }

    fn adopt_packet(&mut self, packet: CurvePacket) -> ProjectivePoint {
        match packet {
            CurvePacket::Edwards { x, y, d } => {
                self.set_curve(d);
                ProjectivePoint::new(x, y, BigInt::one())
            }
            CurvePacket::Weierstrass { .. } => {
                panic!("worker received a Weierstrass packet while running the Edwards model")
            }
        }
    }
}
