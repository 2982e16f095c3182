use log::debug;
use num_bigint::BigUint;

use crate::elliptic::curve::Curve;
use crate::error::{IsogenyError, Result};
use crate::fields::fp2::{Fp2, Fp2Field};
use crate::utilities::bn::{first_primes, is_probable_prime};
use crate::utilities::prime_product::PrimeProduct;

pub const MSIDH_TMIN: usize = 4;
pub const MSIDH_TMAX: usize = 600;
pub const TERSIDH_TMIN: usize = 2;
pub const TERSIDH_TMAX: usize = 200;

/// The cofactor f of p = f * A * B - 1 is searched in [1, MAX_COFACTOR).
pub const MAX_COFACTOR: u64 = 1000;

/// Montgomery coefficient of the starting curve E0 : y^2 = x^3 + 6x^2 + x,
/// supersingular for every p = 3 mod 4.
pub const STARTING_CURVE_A: i64 = 6;

/// Interleave the first primes between the two parties: Alice takes those at
/// even positions (2, 5, 11, ...) with 2 replaced by 4 so that p = 3 mod 4,
/// Bob those at odd positions (3, 7, 13, ...).
pub fn prime_tables(alice_count: usize, bob_count: usize) -> (Vec<u64>, Vec<u64>) {
    let primes = first_primes(2 * alice_count.max(bob_count));
    let mut alice: Vec<u64> = primes.iter().step_by(2).take(alice_count).copied().collect();
    let bob: Vec<u64> = primes.iter().skip(1).step_by(2).take(bob_count).copied().collect();
    if let Some(first) = alice.first_mut() {
        *first = 4;
    }
    (alice, bob)
}

/// Shared fields of both protocols' public parameters: p = f * A * B - 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParameters {
    /// Security parameter the tables were built from.
    pub t: usize,
    pub p: BigUint,
    /// Alice's isogeny degree, the product of her prime powers.
    pub A: PrimeProduct,
    /// Bob's isogeny degree.
    pub B: PrimeProduct,
    /// Cofactor f.
    pub f: u64,
}

impl PublicParameters {
    fn with_cofactor(t: usize, alice: &[u64], bob: &[u64], f: u64) -> Result<Self> {
        let A = PrimeProduct::from_prime_powers(alice)?;
        let B = PrimeProduct::from_prime_powers(bob)?;
        let AB = A.value() * B.value();
        let p = AB * f - 1u32;
        if !is_probable_prime(&p) {
            return Err(IsogenyError::InvalidParameter(format!(
                "f * A * B - 1 = {p} is not prime for f = {f}"
            )));
        }
        Ok(Self { t, p, A, B, f })
    }

    fn search(t: usize, alice: &[u64], bob: &[u64]) -> Result<Self> {
        for f in 1..MAX_COFACTOR {
            match Self::with_cofactor(t, alice, bob, f) {
                Ok(params) => {
                    debug!("found p = {} with cofactor f = {f} for t = {t}", params.p);
                    return Ok(params);
                }
                Err(IsogenyError::InvalidParameter(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(IsogenyError::ParameterSearchExhausted {
            t,
            max_cofactor: MAX_COFACTOR,
        })
    }

    /// The field GF(p^2).
    pub fn field(&self) -> Result<Fp2Field> {
        Fp2Field::new(&self.p)
    }

    /// The curve E0 : y^2 = x^3 + 6x^2 + x over GF(p^2).
    pub fn starting_curve(&self) -> Result<Curve<Fp2>> {
        let field = self.field()?;
        Curve::new(&field.from_i64(STARTING_CURVE_A))
    }

    /// The full order p + 1 = f * A * B as a prime product.
    pub fn full_order(&self) -> Result<PrimeProduct> {
        let bound = self
            .A
            .primes()
            .into_iter()
            .chain(self.B.primes())
            .max()
            .unwrap_or(2)
            .max(self.f);
        PrimeProduct::from_smooth(&(&self.p + 1u32), bound)
    }
}

fn check_range(t: usize, min: usize, max: usize) -> Result<()> {
    if !(min..=max).contains(&t) {
        return Err(IsogenyError::InvalidParameter(format!(
            "security parameter t = {t} outside [{min}, {max}]"
        )));
    }
    Ok(())
}

/// MSIDH public parameters: t primes in total, ceil(t/2) for Alice and
/// floor(t/2) for Bob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsidhParameters(pub PublicParameters);

impl MsidhParameters {
    fn tables(t: usize) -> Result<(Vec<u64>, Vec<u64>)> {
        check_range(t, MSIDH_TMIN, MSIDH_TMAX)?;
        Ok(prime_tables(t.div_ceil(2), t / 2))
    }

    /// Search for the smallest cofactor f making f * A * B - 1 prime.
    pub fn generate(t: usize) -> Result<Self> {
        let (alice, bob) = Self::tables(t)?;
        PublicParameters::search(t, &alice, &bob).map(Self)
    }

    /// Build the parameters for a known cofactor f.
    pub fn from_cofactor(t: usize, f: u64) -> Result<Self> {
        let (alice, bob) = Self::tables(t)?;
        PublicParameters::with_cofactor(t, &alice, &bob, f).map(Self)
    }
}

/// TerSIDH public parameters: t primes per side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TersidhParameters(pub PublicParameters);

impl TersidhParameters {
    fn tables(t: usize) -> Result<(Vec<u64>, Vec<u64>)> {
        check_range(t, TERSIDH_TMIN, TERSIDH_TMAX)?;
        Ok(prime_tables(t, t))
    }

    pub fn generate(t: usize) -> Result<Self> {
        let (alice, bob) = Self::tables(t)?;
        PublicParameters::search(t, &alice, &bob).map(Self)
    }

    pub fn from_cofactor(t: usize, f: u64) -> Result<Self> {
        let (alice, bob) = Self::tables(t)?;
        PublicParameters::with_cofactor(t, &alice, &bob, f).map(Self)
    }

    /// Alice's prime powers [4, 5, 11, ...], one per ternary secret digit.
    pub fn alice_primes(&self) -> Vec<u64> {
        prime_powers_u64(&self.0.A)
    }

    /// Bob's primes [3, 7, 13, ...].
    pub fn bob_primes(&self) -> Vec<u64> {
        prime_powers_u64(&self.0.B)
    }
}

fn prime_powers_u64(n: &PrimeProduct) -> Vec<u64> {
    n.factors()
        .iter()
        .map(|f| f.prime.pow(f.exponent))
        .collect()
}

impl std::ops::Deref for MsidhParameters {
    type Target = PublicParameters;

    fn deref(&self) -> &PublicParameters {
        &self.0
    }
}

impl std::ops::Deref for TersidhParameters {
    type Target = PublicParameters;

    fn deref(&self) -> &PublicParameters {
        &self.0
    }
}

/// Generate the MSIDH public parameters (p, A, B, f) for security parameter t.
pub fn generate_public_parameters(t: usize) -> Result<MsidhParameters> {
    MsidhParameters::generate(t)
}
