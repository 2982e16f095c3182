use num_bigint::BigUint;

use crate::fields::fq::Fq as FqTrait;

use super::{curve::Curve, projective_point::Point};

/// Affine point, `None` is the point-at-infinity.
type Affine<Fq> = Option<(Fq, Fq)>;

impl<Fq: FqTrait> Curve<Fq> {
    fn affine_add(&self, P: &Affine<Fq>, R: &Affine<Fq>) -> Affine<Fq> {
        let to_point = |A: &Affine<Fq>| match A {
            Some((x, y)) => Point::new_xy(x, y),
            None => self.infinity(),
        };
        self.add(&to_point(P), &to_point(R)).to_xy()
    }

    /// Evaluate at Q the line through P and R (the tangent when P = R, the
    /// vertical line when P = -R).
    fn line_eval(&self, P: &Affine<Fq>, R: &Affine<Fq>, Q: &(Fq, Fq)) -> Fq {
        let (xQ, yQ) = Q;
        let ((xP, yP), (xR, yR)) = match (P, R) {
            (None, None) => return xQ.one(),
            (None, Some((xR, _))) => return xQ.clone() - xR.clone(),
            (Some((xP, _)), None) => return xQ.clone() - xP.clone(),
            (Some(P), Some(R)) => (P, R),
        };

        let slope = if xP == xR {
            // Vertical line through P and -P, or through a point of order two
            if (yP.clone() + yR.clone()).is_zero() {
                return xQ.clone() - xP.clone();
            }
            // Tangent slope (3x^2 + 2Ax + 1) / 2y
            let num = xP.square().mul_small(3) + (self.A.clone() * xP.clone()).mul2() + xP.one();
            num / yP.mul2()
        } else {
            (yR.clone() - yP.clone()) / (xR.clone() - xP.clone())
        };
        yQ.clone() - yP.clone() - slope * (xQ.clone() - xP.clone())
    }

    /// Miller's algorithm computing f_{n,P}(Q), or `None` when a line
    /// function vanishes at Q.
    fn miller_loop(&self, P: &(Fq, Fq), Q: &(Fq, Fq), n: &BigUint) -> Option<Fq> {
        let P_aff: Affine<Fq> = Some(P.clone());
        let mut t = P.0.one();
        let mut V = P_aff.clone();
        let nbits = n.bits();
        for i in (0..nbits.saturating_sub(1)).rev() {
            let S = self.affine_add(&V, &V);
            let ell = self.line_eval(&V, &V, Q);
            let vee = self.line_eval(&S, &neg_affine(&S), Q);
            t = t.square() * ell * vee.invert()?;
            V = S;
            if n.bit(i) {
                let S = self.affine_add(&V, &P_aff);
                let ell = self.line_eval(&V, &P_aff, Q);
                let vee = self.line_eval(&S, &neg_affine(&S), Q);
                t = t * ell * vee.invert()?;
                V = S;
            }
            if t.is_zero() {
                return None;
            }
        }
        Some(t)
    }

    /// Weil pairing e_n(P, Q) for P, Q in E[n], as the ratio of Miller functions
    /// (-1)^n * f_{n,P}(Q) / f_{n,Q}(P). Returns one when P = Q, when either
    /// point is at infinity, or when a Miller function vanishes, which only
    /// happens for linearly dependent inputs.
    pub fn weil_pairing(&self, P: &Point<Fq>, Q: &Point<Fq>, n: &BigUint) -> Fq {
        let one = self.A.one();
        let (Some(P_aff), Some(Q_aff)) = (P.to_xy(), Q.to_xy()) else {
            return one;
        };
        if P_aff == Q_aff {
            return one;
        }
        let Some(fP) = self.miller_loop(&P_aff, &Q_aff, n) else {
            return one;
        };
        let Some(fQ_inv) = self.miller_loop(&Q_aff, &P_aff, n).and_then(|f| f.invert()) else {
            return one;
        };
        let e = fP * fQ_inv;
        if n.bit(0) { -e } else { e }
    }
}

fn neg_affine<Fq: FqTrait>(P: &Affine<Fq>) -> Affine<Fq> {
    P.as_ref().map(|(x, y)| (x.clone(), -y.clone()))
}
