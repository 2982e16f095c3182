use num_bigint::BigUint;

use crate::fields::fq::Fq as FqTrait;

use super::{basis::BasisX, curve::Curve, point::PointX};

impl<Fq: FqTrait> Curve<Fq> {
    /// x-only doubling formula using A24 = (A + 2) / 4
    #[inline(always)]
    pub fn xdbl(&self, P: &PointX<Fq>) -> PointX<Fq> {
        let mut V1 = (P.X.clone() + P.Z.clone()).square();
        let V2 = (P.X.clone() - P.Z.clone()).square();
        let X = V1.clone() * V2.clone();
        V1 -= V2.clone();
        let mut Z = V1.clone();
        Z *= self.A24.clone();
        Z += V2;
        Z *= V1;

        PointX { X, Z }
    }

    /// Return [2^n]P using repeated x-only doubling.
    pub fn xdbl_iter(&self, P: &PointX<Fq>, n: usize) -> PointX<Fq> {
        let mut Q = P.clone();
        for _ in 0..n {
            Q = self.xdbl(&Q);
        }
        Q
    }

    /// x-only differential addition, returns P + Q given PQ = P - Q.
    #[inline(always)]
    pub fn xadd(P: &PointX<Fq>, Q: &PointX<Fq>, PQ: &PointX<Fq>) -> PointX<Fq> {
        let V1 = (P.X.clone() - P.Z.clone()) * (Q.X.clone() + Q.Z.clone());
        let V2 = (P.X.clone() + P.Z.clone()) * (Q.X.clone() - Q.Z.clone());
        PointX {
            X: PQ.Z.clone() * (V1.clone() + V2.clone()).square(),
            Z: PQ.X.clone() * (V1 - V2).square(),
        }
    }

    /// Return n*P as a new point (x-only variant).
    pub fn xmul(&self, P: &PointX<Fq>, n: &BigUint) -> PointX<Fq> {
        // Montgomery ladder: see https://eprint.iacr.org/2017/212
        // We keep R1 - R0 = P throughout.
        let mut R0 = PointX::infinity(&P.X);
        let mut R1 = P.clone();
        for i in (0..n.bits()).rev() {
            if n.bit(i) {
                R0 = Self::xadd(&R0, &R1, P);
                R1 = self.xdbl(&R1);
            } else {
                R1 = Self::xadd(&R0, &R1, P);
                R0 = self.xdbl(&R0);
            }
        }

        // The ladder may fail if P = (0,0) (which is a point of
        // order 2) because in that case xadd() returns Z = 0
        // systematically, so the result is considered to be the
        // point-at-infinity, which is wrong if n is odd.
        // We adjust the result in that case.
        if P.is_origin() && n.bit(0) {
            return PointX::new(&P.X.zero(), &P.X.one());
        }
        R0
    }

    pub fn xmul_u64(&self, P: &PointX<Fq>, n: u64) -> PointX<Fq> {
        self.xmul(P, &BigUint::from(n))
    }

    /// Return P + n*Q, X-only variant given the x-only basis x(P), x(Q) and x(P - Q).
    pub fn three_point_ladder(&self, B: &BasisX<Fq>, n: &BigUint) -> PointX<Fq> {
        let nbits = n.bits();
        if nbits == 0 {
            return B.P.clone();
        }

        let mut X0 = B.Q.clone();
        let mut X1 = B.P.clone();
        let mut X2 = B.PQ.clone();

        // Bits of n are scanned from the least significant, with
        // X0 = [2^i]Q after i steps. The swap flag cc records whether
        // X1 and X2 are currently exchanged.
        let mut cc = false;
        for i in 0..nbits {
            let bit = n.bit(i);
            if bit ^ cc {
                std::mem::swap(&mut X1, &mut X2);
            }
            X2 = Self::xadd(&X0, &X2, &X1);
            X0 = self.xdbl(&X0);
            cc = bit;
        }
        if cc {
            std::mem::swap(&mut X1, &mut X2);
        }

        X1
    }
}
