use log::trace;
use num_bigint::BigUint;

use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;
use crate::utilities::prime_product::PrimeProduct;

use super::{curve::Curve, point::PointX, velu::IsogenyStep};

/// A composite isogeny between Montgomery curves, stored as its sequence of
/// prime degree steps so that points can be pushed through it after it has
/// been computed.
#[derive(Clone, Debug)]
pub struct MontgomeryIsogeny<Fq: FqTrait> {
    domain: Curve<Fq>,
    codomain: Curve<Fq>,
    steps: Vec<IsogenyStep<Fq>>,
}

impl<Fq: FqTrait> MontgomeryIsogeny<Fq> {
    pub fn domain(&self) -> &Curve<Fq> {
        &self.domain
    }

    pub fn codomain(&self) -> &Curve<Fq> {
        &self.codomain
    }

    /// The degree of each prime step, in the order they are applied.
    pub fn step_degrees(&self) -> Vec<u64> {
        self.steps.iter().map(|s| s.degree()).collect()
    }

    /// The degree of the isogeny, the product of its step degrees.
    pub fn degree(&self) -> BigUint {
        self.steps
            .iter()
            .fold(BigUint::from(1u32), |acc, s| acc * s.degree())
    }

    /// Push an x-only point through the isogeny.
    pub fn eval(&self, P: &PointX<Fq>) -> PointX<Fq> {
        self.steps.iter().fold(P.clone(), |Q, step| step.eval(&Q))
    }

    /// Push a collection of x-only points through the isogeny in place.
    pub fn eval_many(&self, points: &mut [PointX<Fq>]) {
        for step in self.steps.iter() {
            for P in points.iter_mut() {
                *P = step.eval(P);
            }
        }
    }
}

impl<Fq: FqTrait> Curve<Fq> {
    /// Compute the isogeny E -> E / <K> for a kernel point K whose order
    /// divides `degree`, as a chain of prime degree steps taken in ascending
    /// order. A kernel at infinity gives the identity isogeny. The chain fails
    /// with `InvalidKernel` when the order of K is not exactly `degree`.
    pub fn isogeny(
        &self,
        kernel: &PointX<Fq>,
        degree: &PrimeProduct,
    ) -> Result<MontgomeryIsogeny<Fq>> {
        let mut isogeny = MontgomeryIsogeny {
            domain: self.clone(),
            codomain: self.clone(),
            steps: Vec::new(),
        };
        if kernel.is_zero() {
            return Ok(isogeny);
        }

        let mut K = kernel.clone();
        let mut remaining = degree.value().clone();
        for q in degree.prime_factors() {
            remaining /= q;
            // T = [n / q]K has order q when K has order n
            let T = isogeny.codomain.xmul(&K, &remaining);
            let (codomain, step) = match q {
                2 => isogeny.codomain.two_isogeny(&T)?,
                _ => isogeny.codomain.odd_isogeny(&T, q)?,
            };
            trace!("{q}-isogeny step to curve with A = {}", codomain.A);

            K = step.eval(&K);
            isogeny.codomain = codomain;
            isogeny.steps.push(step);
        }

        if !K.is_zero() {
            return Err(IsogenyError::InvalidKernel(format!(
                "kernel order is larger than {}",
                degree.value()
            )));
        }
        Ok(isogeny)
    }

    /// Compute E -> E / <K>, pushing `images` through in place, and return
    /// the codomain.
    pub fn isogeny_chain(
        &self,
        kernel: &PointX<Fq>,
        degree: &PrimeProduct,
        images: &mut [PointX<Fq>],
    ) -> Result<Curve<Fq>> {
        let isogeny = self.isogeny(kernel, degree)?;
        isogeny.eval_many(images);
        Ok(isogeny.codomain)
    }

    /// Montgomery coefficient of E / <K> for K of order `degree`.
    pub fn montgomery_coefficient(&self, kernel: &PointX<Fq>, degree: &PrimeProduct) -> Result<Fq> {
        Ok(self.isogeny(kernel, degree)?.codomain.A)
    }
}
