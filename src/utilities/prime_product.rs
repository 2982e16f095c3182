use num_bigint::BigUint;
use num_traits::One;

use crate::error::{IsogenyError, Result};

use super::bn::{factorisation_to_bn, is_prime_u64, prime_power_to_bn, trial_factorisation};

/// A prime power p^e.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimePower {
    pub prime: u64,
    pub exponent: u32,
}

/// A smooth integer n stored alongside its factorisation into pairwise coprime
/// prime powers, e.g. 4 * 5 * 11. Isogeny degrees and torsion orders are always
/// carried around in this form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeProduct {
    factors: Vec<PrimePower>,
    value: BigUint,
}

impl PrimePower {
    pub fn value(&self) -> BigUint {
        prime_power_to_bn(self.prime, self.exponent)
    }
}

impl PrimeProduct {
    /// The empty product, n = 1.
    pub fn one() -> Self {
        Self {
            factors: Vec::new(),
            value: BigUint::one(),
        }
    }

    /// Build n from a factorisation [(p_i, e_i)]. The primes must be distinct.
    pub fn from_factorisation(factorisation: &[(u64, u32)]) -> Result<Self> {
        let mut factors: Vec<PrimePower> = Vec::with_capacity(factorisation.len());
        for &(prime, exponent) in factorisation {
            if !is_prime_u64(prime) {
                return Err(IsogenyError::InvalidParameter(format!(
                    "{prime} is not prime"
                )));
            }
            if factors.iter().any(|f| f.prime == prime) {
                return Err(IsogenyError::InvalidParameter(format!(
                    "repeated prime {prime} in factorisation"
                )));
            }
            if exponent > 0 {
                factors.push(PrimePower { prime, exponent });
            }
        }
        let value = factorisation_to_bn(factorisation);
        Ok(Self { factors, value })
    }

    /// Build n from a list of prime powers such as [4, 5, 11].
    pub fn from_prime_powers(powers: &[u64]) -> Result<Self> {
        let mut factorisation = Vec::with_capacity(powers.len());
        for &q in powers {
            let f = trial_factorisation(&BigUint::from(q), q)
                .filter(|f| f.len() == 1)
                .ok_or_else(|| {
                    IsogenyError::InvalidParameter(format!("{q} is not a prime power"))
                })?;
            factorisation.push(f[0]);
        }
        Self::from_factorisation(&factorisation)
    }

    /// Factor n by trial division, failing if n has a prime factor larger than `bound`.
    pub fn from_smooth(n: &BigUint, bound: u64) -> Result<Self> {
        let factorisation = trial_factorisation(n, bound).ok_or_else(|| {
            IsogenyError::InvalidParameter(format!("{n} is not {bound}-smooth"))
        })?;
        Self::from_factorisation(&factorisation)
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// The prime power factors, in the order given at construction.
    pub fn factors(&self) -> &[PrimePower] {
        &self.factors
    }

    /// The prime power factors as integers, e.g. [4, 5, 11].
    pub fn prime_powers(&self) -> Vec<BigUint> {
        self.factors.iter().map(|f| f.value()).collect()
    }

    /// The distinct primes dividing n.
    pub fn primes(&self) -> Vec<u64> {
        self.factors.iter().map(|f| f.prime).collect()
    }

    /// All prime factors of n counted with multiplicity, ascending. This is
    /// the sequence of step degrees for an isogeny of degree n.
    pub fn prime_factors(&self) -> Vec<u64> {
        let mut primes: Vec<u64> = self
            .factors
            .iter()
            .flat_map(|f| std::iter::repeat_n(f.prime, f.exponent as usize))
            .collect();
        primes.sort_unstable();
        primes
    }

    pub fn is_even(&self) -> bool {
        self.factors.iter().any(|f| f.prime == 2)
    }

    pub fn is_one(&self) -> bool {
        self.factors.is_empty()
    }
}

impl ::std::fmt::Display for PrimeProduct {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .factors
            .iter()
            .map(|pp| match pp.exponent {
                1 => format!("{}", pp.prime),
                e => format!("{}^{}", pp.prime, e),
            })
            .collect();
        write!(f, "{}", parts.join(" * "))
    }
}
