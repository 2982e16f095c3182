use log::trace;
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

use crate::error::{IsogenyError, Result};
use crate::fields::fq::{Fq as FqTrait, order_from_multiple};
use crate::utilities::prime_product::PrimeProduct;

use super::{basis::BasisX, curve::Curve, point::PointX, projective_point::Point};

/// Which point of a basis of even order r must lie above (0, 0), that is
/// satisfy x([r/2]X) = 0. A point above (0, 0) cannot be the kernel of the
/// first 2-isogeny of a Montgomery chain, so the kernel P + [s]Q is kept
/// away from it by putting Q above (0, 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// P lies above (0, 0), Q does not
    P,
    /// Q lies above (0, 0), P does not
    Q,
    /// Neither point lies above (0, 0)
    Neither,
    /// No constraint
    Unconstrained,
}

/// A basis <P, Q> of the r-torsion of a curve.
#[derive(Clone, Debug)]
pub struct TorsionBasis<Fq: FqTrait> {
    pub P: Point<Fq>,
    pub Q: Point<Fq>,
    pub order: PrimeProduct,
}

impl<Fq: FqTrait> TorsionBasis<Fq> {
    pub fn new(P: &Point<Fq>, Q: &Point<Fq>, order: &PrimeProduct) -> Self {
        Self {
            P: P.clone(),
            Q: Q.clone(),
            order: order.clone(),
        }
    }

    /// The x-only basis x(P), x(Q), x(P - Q).
    pub fn to_basis_x(&self, E: &Curve<Fq>) -> BasisX<Fq> {
        let PQ = E.sub(&self.P, &self.Q);
        BasisX::from_array([self.P.to_point_x(), self.Q.to_point_x(), PQ.to_point_x()])
    }

    /// Return the basis [N/n]P, [N/n]Q of the n-torsion, where N is the
    /// order of this basis and n divides N.
    pub fn subgroup(&self, E: &Curve<Fq>, n: &PrimeProduct) -> Result<Self> {
        let (cofactor, rem) = self.order.value().div_rem(n.value());
        if !rem.is_zero() {
            return Err(IsogenyError::InvalidParameter(format!(
                "{} does not divide the basis order {}",
                n.value(),
                self.order.value()
            )));
        }
        Ok(Self {
            P: E.mul(&self.P, &cofactor),
            Q: E.mul(&self.Q, &cofactor),
            order: n.clone(),
        })
    }
}

/// Random points tested by `check_supersingular`. A curve that is not
/// supersingular of order (p + 1)^2 passes each test with probability at
/// most 1/2.
pub const SUPERSINGULAR_CHECK_SAMPLES: usize = 16;

impl<Fq: FqTrait> Curve<Fq> {
    /// Return an error unless [p + 1]X = 0 for a batch of random points X.
    /// Over GF(p^2) a group of exponent dividing p + 1 has order exactly
    /// (p + 1)^2 by the Hasse bound, so the curve is then supersingular.
    pub fn check_supersingular<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Result<()> {
        let p_plus_one = self.A.characteristic() + 1u32;
        for _ in 0..SUPERSINGULAR_CHECK_SAMPLES {
            let X = self.random_point(rng).to_point_x();
            if !self.xmul(&X, &p_plus_one).is_zero() {
                return Err(IsogenyError::InvalidParameter(format!(
                    "curve with A = {} does not have order (p + 1)^2",
                    self.A
                )));
            }
        }
        Ok(())
    }

    /// Given a multiple m of the order of P, return the exact order of P.
    pub fn point_order_from_multiple(&self, P: &PointX<Fq>, m: &PrimeProduct) -> BigUint {
        let mut order = m.value().clone();
        for q in m.primes() {
            loop {
                let (quo, rem) = order.div_rem(&BigUint::from(q));
                if !rem.is_zero() || !self.xmul(P, &quo).is_zero() {
                    break;
                }
                order = quo;
            }
        }
        order
    }

    /// Return true if P has order exactly r.
    pub fn has_exact_order(&self, P: &Point<Fq>, r: &PrimeProduct) -> bool {
        let xP = P.to_point_x();
        if !self.xmul(&xP, r.value()).is_zero() {
            return false;
        }
        r.primes()
            .iter()
            .all(|&q| !self.xmul(&xP, &(r.value() / q)).is_zero())
    }

    /// Return true if [r/2]P = (0, 0), for r even.
    fn lies_above_origin(&self, P: &Point<Fq>, r: &BigUint) -> bool {
        let half = r >> 1u32;
        self.xmul(&P.to_point_x(), &half).is_origin()
    }

    /// Sample a point of exact order r. With `avoid_origin` set, points with
    /// [r/2]P = (0, 0) are rejected.
    fn sample_full_order_point<R: CryptoRng + RngCore>(
        &self,
        r: &PrimeProduct,
        cofactor: &BigUint,
        avoid_origin: bool,
        rng: &mut R,
    ) -> Point<Fq> {
        loop {
            let X = self.mul(&self.random_point(rng), cofactor);
            if X.is_zero() || !self.has_exact_order(&X, r) {
                continue;
            }
            if avoid_origin && r.is_even() && self.lies_above_origin(&X, r.value()) {
                continue;
            }
            return X;
        }
    }
}

/// Return true if (P, Q) is a basis of E[r]: both points lie on E and have
/// order dividing r, and e_r(P, Q) has multiplicative order exactly r.
pub fn validate_torsion_basis<Fq: FqTrait>(
    E: &Curve<Fq>,
    P: &Point<Fq>,
    Q: &Point<Fq>,
    r: &PrimeProduct,
) -> bool {
    if !E.is_on_curve(P) || !E.is_on_curve(Q) {
        return false;
    }
    if !E.xmul(&P.to_point_x(), r.value()).is_zero() || !E.xmul(&Q.to_point_x(), r.value()).is_zero()
    {
        return false;
    }
    let e = E.weil_pairing(P, Q, r.value());
    &order_from_multiple(&e, r.value(), &r.primes()) == r.value()
}

/// Sample a basis of E[r] on a supersingular curve E with r | p + 1,
/// satisfying the requested orientation when r is even.
///
/// Each attempt succeeds with probability bounded below by a constant
/// depending only on the smallest primes of r, so the expected number of
/// attempts is small and independent of the size of p.
pub fn sample_torsion_basis<Fq: FqTrait, R: CryptoRng + RngCore>(
    E: &Curve<Fq>,
    r: &PrimeProduct,
    orientation: Orientation,
    rng: &mut R,
) -> Result<TorsionBasis<Fq>> {
    let p_plus_one = E.A.characteristic() + 1u32;
    let (cofactor, rem) = p_plus_one.div_rem(r.value());
    if !rem.is_zero() {
        return Err(IsogenyError::InvalidParameter(format!(
            "basis order {} does not divide p + 1",
            r.value()
        )));
    }
    E.check_supersingular(rng)?;

    let even = r.is_even();
    let avoid_origin = orientation == Orientation::Neither;
    let P = E.sample_full_order_point(r, &cofactor, avoid_origin, rng);
    let P_above = even && E.lies_above_origin(&P, r.value());

    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let Q = E.sample_full_order_point(r, &cofactor, avoid_origin, rng);

        // r may be composite, so a pairing of order a proper divisor of r
        // means (P, Q) is not a basis
        let e = E.weil_pairing(&P, &Q, r.value());
        if e.is_one() || &order_from_multiple(&e, r.value(), &r.primes()) != r.value() {
            continue;
        }

        if even {
            let Q_above = E.lies_above_origin(&Q, r.value());
            let basis = match orientation {
                Orientation::P if P_above => TorsionBasis::new(&P, &Q, r),
                Orientation::P if Q_above => TorsionBasis::new(&Q, &P, r),
                Orientation::Q if Q_above => TorsionBasis::new(&P, &Q, r),
                Orientation::Q if P_above => TorsionBasis::new(&Q, &P, r),
                // Neither point can lie above (0, 0) by construction
                Orientation::Neither | Orientation::Unconstrained => TorsionBasis::new(&P, &Q, r),
                // Neither point lies above (0, 0): resample Q
                _ => continue,
            };
            trace!("sampled torsion basis of order {} after {attempts} attempts", r);
            return Ok(basis);
        }

        trace!("sampled torsion basis of order {} after {attempts} attempts", r);
        return Ok(TorsionBasis::new(&P, &Q, r));
    }
}
