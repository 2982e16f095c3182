use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;

use super::{curve::Curve, point::PointX};

/// A structure which allows iterating over [i]P = (X : Z) for i = 1, 2, ...
struct PointXMultiples<'a, Fq: FqTrait> {
    E: &'a Curve<Fq>,
    P: PointX<Fq>,
    Q: PointX<Fq>,
    R: PointX<Fq>,
    i: usize,
}

impl<'a, Fq: FqTrait> PointXMultiples<'a, Fq> {
    fn new(E: &'a Curve<Fq>, P: &PointX<Fq>) -> Self {
        Self {
            E,
            P: P.clone(),
            Q: P.clone(),
            R: P.clone(),
            i: 0,
        }
    }
}

impl<Fq: FqTrait> Iterator for PointXMultiples<'_, Fq> {
    type Item = PointX<Fq>;

    fn next(&mut self) -> Option<Self::Item> {
        self.i += 1;
        match self.i {
            // [1]P
            1 => {}
            // [2]P
            2 => self.R = self.E.xdbl(&self.P),
            // [i]P = [i-1]P + P with difference [i-2]P
            _ => {
                let S = Curve::xadd(&self.R, &self.P, &self.Q);
                self.Q = std::mem::replace(&mut self.R, S);
            }
        }
        Some(self.R.clone())
    }
}

/// A single prime degree step of an isogeny chain, holding what is needed to
/// push points through it.
#[derive(Clone, Debug)]
pub enum IsogenyStep<Fq: FqTrait> {
    /// Kernel <T> of order two, stored as (X_T + Z_T, X_T - Z_T)
    Two { kernel: (Fq, Fq) },
    /// Kernel <T> of odd prime order, stored as (X + Z, X - Z) for [i]T with
    /// 0 < i <= (degree - 1) / 2
    Odd {
        degree: u64,
        multiples: Vec<(Fq, Fq)>,
    },
}

impl<Fq: FqTrait> IsogenyStep<Fq> {
    pub fn degree(&self) -> u64 {
        match self {
            IsogenyStep::Two { .. } => 2,
            IsogenyStep::Odd { degree, .. } => *degree,
        }
    }

    /// Evaluate the isogeny on an x-only point.
    pub fn eval(&self, P: &PointX<Fq>) -> PointX<Fq> {
        let P_sum = P.X.clone() + P.Z.clone();
        let P_diff = P.X.clone() - P.Z.clone();
        match self {
            IsogenyStep::Two { kernel: (t0, t1) } => {
                let a = t0.clone() * P_diff;
                let b = t1.clone() * P_sum;
                PointX {
                    X: P.X.clone() * (a.clone() + b.clone()),
                    Z: P.Z.clone() * (a - b),
                }
            }
            IsogenyStep::Odd { multiples, .. } => {
                // Costello-Hisil: https://eprint.iacr.org/2017/504
                let mut X_new = P.X.one();
                let mut Z_new = P.X.one();
                for (K_sum, K_diff) in multiples.iter() {
                    let a = K_sum.clone() * P_diff.clone();
                    let b = K_diff.clone() * P_sum.clone();
                    X_new *= a.clone() + b.clone();
                    Z_new *= a - b;
                }
                PointX {
                    X: P.X.clone() * X_new.square(),
                    Z: P.Z.clone() * Z_new.square(),
                }
            }
        }
    }
}

impl<Fq: FqTrait> Curve<Fq> {
    /// Return the multiples [1]T, ..., [count]T
    pub fn kernel_multiples(&self, T: &PointX<Fq>, count: usize) -> Vec<PointX<Fq>> {
        PointXMultiples::new(self, T).take(count).collect()
    }

    fn check_two_torsion_kernel(&self, T: &PointX<Fq>) -> Result<Fq> {
        if T.is_zero() || !self.xdbl(T).is_zero() {
            return Err(IsogenyError::InvalidKernel(
                "kernel of a 2-isogeny must have order two".to_string(),
            ));
        }
        match T.x() {
            Some(x) if !x.is_zero() => Ok(x),
            _ => Err(IsogenyError::InvalidKernel(
                "2-isogeny with kernel (0, 0) has a singular codomain".to_string(),
            )),
        }
    }

    fn check_odd_kernel(&self, T: &PointX<Fq>, degree: u64) -> Result<()> {
        if degree < 3 || degree % 2 == 0 {
            return Err(IsogenyError::InvalidKernel(format!(
                "odd isogeny degree must be at least 3, got {degree}"
            )));
        }
        if T.is_zero() || !self.xmul_u64(T, degree).is_zero() {
            return Err(IsogenyError::InvalidKernel(format!(
                "kernel point does not have order {degree}"
            )));
        }
        Ok(())
    }

    /// Montgomery coefficient of E / <T> for T of order two, T != (0, 0):
    /// A' = 2 * (1 - 2 * x_T^2)
    pub fn codomain_coefficient_2(&self, T: &PointX<Fq>) -> Result<Fq> {
        let x = self.check_two_torsion_kernel(T)?;
        let one = x.one();
        Ok((one - x.square().mul2()).mul2())
    }

    /// Montgomery coefficient of E / <T> for T of odd prime order `degree`:
    /// A' = (6 * (s' - s) + A) * p^2, where over x_j = x([j]T), 0 < j <= (d - 1) / 2,
    /// s = sum(x_j), s' = sum(1 / x_j) and p = prod(x_j).
    pub fn codomain_coefficient_odd(&self, T: &PointX<Fq>, degree: u64) -> Result<Fq> {
        let (A, _) = self.odd_codomain_with_multiples(T, degree)?;
        Ok(A)
    }

    fn odd_codomain_with_multiples(
        &self,
        T: &PointX<Fq>,
        degree: u64,
    ) -> Result<(Fq, Vec<PointX<Fq>>)> {
        self.check_odd_kernel(T, degree)?;
        let half = ((degree - 1) / 2) as usize;
        let multiples = self.kernel_multiples(T, half);

        let mut sigma = self.A.zero();
        let mut sigma_inv = self.A.zero();
        let mut pi = self.A.one();
        for K in multiples.iter() {
            let x = K.x().ok_or_else(|| {
                IsogenyError::InvalidKernel("kernel multiple at infinity".to_string())
            })?;
            let x_inv = x.invert().ok_or_else(|| {
                IsogenyError::InvalidKernel("kernel contains (0, 0)".to_string())
            })?;
            sigma += x.clone();
            sigma_inv += x_inv;
            pi *= x;
        }
        let A = ((sigma_inv - sigma).mul_small(6) + self.A.clone()) * pi.square();
        Ok((A, multiples))
    }

    /// Compute the 2-isogeny E -> E / <T> with T != (0, 0), returning the
    /// codomain and the data needed to evaluate it.
    pub fn two_isogeny(&self, T: &PointX<Fq>) -> Result<(Curve<Fq>, IsogenyStep<Fq>)> {
        let A = self.codomain_coefficient_2(T)?;
        let step = IsogenyStep::Two {
            kernel: (T.X.clone() + T.Z.clone(), T.X.clone() - T.Z.clone()),
        };
        Ok((Curve::new(&A)?, step))
    }

    /// Compute the isogeny E -> E / <T> of odd prime degree, returning the
    /// codomain and the data needed to evaluate it.
    pub fn odd_isogeny(&self, T: &PointX<Fq>, degree: u64) -> Result<(Curve<Fq>, IsogenyStep<Fq>)> {
        let (A, multiples) = self.odd_codomain_with_multiples(T, degree)?;
        let multiples = multiples
            .into_iter()
            .map(|K| (K.X.clone() + K.Z.clone(), K.X - K.Z))
            .collect();
        let step = IsogenyStep::Odd { degree, multiples };
        Ok((Curve::new(&A)?, step))
    }
}
