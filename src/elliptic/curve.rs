use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use super::projective_point::Point;
use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;

/// Curve y^2 = x^3 + A*x^2 + x, for a given constant A
/// (special case of a Montgomery curve).
#[derive(Clone, Debug)]
pub struct Curve<Fq: FqTrait> {
    pub A: Fq,   // A
    pub A24: Fq, // (A+2)/4
}

impl<Fq: FqTrait> Curve<Fq> {
    /// Create a new curve instance, with the provided constant.
    pub fn new(A: &Fq) -> Result<Self> {
        // We check that the curve is not singular, i.e. A^2 != 4.
        let two = A.from_i64(2);
        let A2 = A.clone() + two;
        if A.square() == A.from_i64(4) {
            return Err(IsogenyError::SingularCurve(A.to_string()));
        }
        // p is odd, so 4 is always invertible
        let quarter = A.from_i64(4).invert().ok_or_else(|| {
            IsogenyError::InvalidParameter("characteristic must be odd".to_string())
        })?;

        Ok(Self {
            A: A.clone(),
            A24: A2 * quarter,
        })
    }

    /// The point-at-infinity of this curve.
    pub fn infinity(&self) -> Point<Fq> {
        Point::infinity(&self.A)
    }

    /// The j-invariant 256 * (A^2 - 3)^3 / (A^2 - 4).
    pub fn j_invariant(&self) -> Fq {
        let AA = self.A.square();
        let num = AA.clone() - self.A.from_i64(3);
        let num = num.square() * num * self.A.from_i64(256);
        let den = AA - self.A.from_i64(4);
        // den != 0 as the curve is non-singular
        num / den
    }

    /// Evaluate x^3 + A*x^2 + x.
    pub fn rhs(&self, x: &Fq) -> Fq {
        let mut y = x.clone() + self.A.clone(); // y = x + A
        y *= x.clone(); // y = x^2 + A*x
        y += x.one(); // x^2 + A*x + 1
        y * x.clone() // y = x^3 + A*x^2 + x
    }

    /// Return true if P lies on the curve, in projective coordinates
    /// Y^2*Z = X^3 + A*X^2*Z + X*Z^2.
    pub fn is_on_curve(&self, P: &Point<Fq>) -> bool {
        if P.is_zero() {
            return P.X.is_zero() && !P.Y.is_zero();
        }
        let (X, Y, Z) = (P.X.clone(), P.Y.clone(), P.Z.clone());
        let lhs = Y.square() * Z.clone();
        let XX = X.square();
        let rhs = XX.clone() * X.clone()
            + self.A.clone() * XX * Z.clone()
            + X * Z.square();
        lhs == rhs
    }

    /// P3 <- P1 + P2
    pub fn add_into(&self, P3: &mut Point<Fq>, P1: &Point<Fq>, P2: &Point<Fq>) {
        // Complete routine, to handle all edge cases:
        //   if Z1 == 0:            # P1 == inf
        //       return P2
        //   if Z2 == 0:            # P2 == inf
        //       return P1
        //   L <- Y2*Z1 - Y1*Z2
        //   T <- X2*Z1 - X1*Z2
        //   if T == 0:             # x1 == x2
        //       if L == 0:         # ... and y1 == y2: doubling case
        //           L <- 3*X1^2 + 2*A*X1*Z1 + Z1^2
        //           T <- 2*Y1*Z1
        //       else:              # ... but y1 != y2, thus P2 = -P1
        //           return inf
        //   U <- Z1*Z2*L^2 - (X1*Z2 + X2*Z1 + A*Z1*Z2)*T^2
        //   X3 <- U*T
        //   Y3 <- L*(X1*Z2*T^2 - U) - Y1*Z2*T^3
        //   Z3 <- Z1*Z2*T^3
        //
        // If P1 == -P2 then we let T == 0 and L != 0, which
        // properly leads to Z3 == 0.
        if P1.is_zero() {
            *P3 = P2.clone();
            return;
        }
        if P2.is_zero() {
            *P3 = P1.clone();
            return;
        }

        // T = X2*Z1 - X1*Z2
        // L = Y2*Z1 - Y1*Z2
        let x1z2 = P1.X.clone() * P2.Z.clone();
        let x2z1 = P2.X.clone() * P1.Z.clone();
        let mut T = x2z1.clone() - x1z2.clone();
        let y1z2 = P1.Y.clone() * P2.Z.clone();
        let y2z1 = P2.Y.clone() * P1.Z.clone();
        let mut L = y2z1 - y1z2.clone();

        if T.is_zero() && L.is_zero() {
            // Td = 2*Y1*Z1
            // Ld = 3*X1^2 + 2*A*X1*Z1 + Z1^2
            T = (P1.Y.clone() * P1.Z.clone()).mul2();
            let x1x1 = P1.X.square();
            let z1z1 = P1.Z.square();
            let dx1z1 = (P1.X.clone() + P1.Z.clone()).square() - x1x1.clone() - z1z1.clone();
            L = x1x1.mul_small(3) + z1z1 + self.A.clone() * dx1z1;
        }

        // U = L^2*Z1*Z2 - (X1*Z2 + X2*Z1 + A*Z1*Z2)*T^2
        let T2 = T.square();
        let T3 = T.clone() * T2.clone();
        let z1z2 = P1.Z.clone() * P2.Z.clone();
        let U = (L.square() * z1z2.clone())
            - ((x1z2.clone() + x2z1 + (self.A.clone() * z1z2.clone())) * T2.clone());

        // X3 = U*T
        // Y3 = L*(X1*Z2*T^2 - U) - Y1*Z2*T^3
        // Z3 = Z1*Z2*T^3
        P3.X = U.clone() * T;
        P3.Y = (L * ((x1z2 * T2) - U)) - (y1z2 * T3.clone());
        P3.Z = z1z2 * T3;
    }

    /// Return P1 + P2 as a new point
    pub fn add(&self, P1: &Point<Fq>, P2: &Point<Fq>) -> Point<Fq> {
        let mut P3 = self.infinity();
        self.add_into(&mut P3, P1, P2);
        P3
    }

    /// Return P1 - P2 as a new point
    pub fn sub(&self, P1: &Point<Fq>, P2: &Point<Fq>) -> Point<Fq> {
        self.add(P1, &(-P2))
    }

    pub fn double_from_coords(&self, X: &Fq, Y: &Fq, Z: &Fq) -> (Fq, Fq, Fq) {
        // Doubling formulas in 6M+3S
        // X' <- 2*Y*Z*(X^2 - Z^2)^2
        // Y' <- V*(M*(M + 2*A*X*Z) + 4*X^2*Z^2)
        // Z' <- 8*(Y*Z)^3
        let xx = X.square();
        let zz = Z.square();
        let dxz = (X.clone() + Z.clone()).square() - xx.clone() - zz.clone();
        let dyz = (Y.clone() * Z.clone()).mul2();
        let v = xx.clone() - zz.clone();
        let m = xx + zz;
        let X2 = dyz.clone() * v.square();
        let Y2 = v * ((m.clone() * (m + (self.A.clone() * dxz.clone()))) + dxz.square());
        let Z2 = dyz.clone() * dyz.square();

        (X2, Y2, Z2)
    }

    /// Return 2*P as a new point
    pub fn double(&self, P: &Point<Fq>) -> Point<Fq> {
        // Points of order at most two double to infinity
        if P.is_zero() || P.Y.is_zero() {
            return self.infinity();
        }
        let (X2, Y2, Z2) = self.double_from_coords(&P.X, &P.Y, &P.Z);
        Point::new(&X2, &Y2, &Z2)
    }

    /// Return [2^n]*P as a new point
    pub fn double_iter(&self, P: &Point<Fq>, n: usize) -> Point<Fq> {
        let mut P3 = P.clone();
        for _ in 0..n {
            P3 = self.double(&P3);
        }
        P3
    }

    /// Return [n]*P as a new point, using double-and-add over the bits of n.
    pub fn mul(&self, P: &Point<Fq>, n: &BigUint) -> Point<Fq> {
        let mut R = self.infinity();
        for i in (0..n.bits()).rev() {
            R = self.double(&R);
            if n.bit(i) {
                R = self.add(&R, P);
            }
        }
        R
    }

    pub fn mul_u64(&self, P: &Point<Fq>, n: u64) -> Point<Fq> {
        self.mul(P, &BigUint::from(n))
    }

    /// Given the x-coordinate of a point, lift it to a projective point,
    /// or return `None` when x is not the abscissa of a point on the curve.
    pub fn lift_point(&self, x: &Fq) -> Option<Point<Fq>> {
        let y = self.rhs(x).sqrt()?;
        Some(Point::new_xy(x, &y))
    }

    /// Given the x-coordinates of x(P), x(Q) and x(P - Q) lift the points
    /// onto the curve <P, Q>.
    pub fn lift_basis(&self, xP: &Fq, xQ: &Fq, xPQ: &Fq) -> Option<(Point<Fq>, Point<Fq>)> {
        let P = self.lift_point(xP)?;

        // Okeya-Sakurai algorithm to recover Q.Y without a sqrt
        let mut v2 = xP.clone() + xQ.clone();
        let v3 = (xP.clone() - xQ.clone()).square() * xPQ.clone();
        let v1 = self.A.mul2();
        v2 += v1.clone();
        let v4 = xP.clone() * xQ.clone() + xP.one();
        v2 *= v4;
        v2 -= v1;
        let y = v3 - v2;
        let v1 = P.Y.mul2();
        if v1.is_zero() {
            // P has order 2 and Q.Y cannot be recovered from it
            return None;
        }
        let x = xQ.clone() * v1.clone();
        let Q = Point::new(&x, &y, &v1);

        Some((P, Q))
    }

    /// Sample a uniformly random point on the curve.
    pub fn random_point<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Point<Fq> {
        loop {
            let x = self.A.rand(rng);
            if let Some(P) = self.lift_point(&x) {
                // Both square roots are equally likely
                return if rng.next_u32() & 1 == 1 { -P } else { P };
            }
        }
    }
}

impl<Fq: FqTrait> PartialEq for Curve<Fq> {
    fn eq(&self, other: &Self) -> bool {
        self.A == other.A
    }
}

impl<Fq: FqTrait> Eq for Curve<Fq> {}

impl<Fq: FqTrait> ::std::fmt::Display for Curve<Fq> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "Elliptic Curve: y^2 = x^3 + ({})*x^2 + x", self.A)
    }
}
