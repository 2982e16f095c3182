use log::{debug, warn};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::elliptic::{
    basis::BasisX,
    curve::Curve,
    point::PointX,
    projective_point::Point,
    torsion_basis::{Orientation, TorsionBasis, sample_torsion_basis, validate_torsion_basis},
};
use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;
use crate::utilities::{bn::random_below, prime_product::PrimeProduct};

use super::{Role, SessionStatus, parameters::TersidhParameters, public_key::PublicKey};

/// Largest value of a ternary secret digit.
pub const MAX_DIGIT: u8 = 2;

/// Read base 3 digits, most significant first, as an integer.
pub fn ternary_to_int(digits: &[u8]) -> Result<BigUint> {
    if digits.is_empty() {
        return Err(IsogenyError::MalformedSecret(
            "empty ternary secret".to_string(),
        ));
    }
    let mut n = BigUint::zero();
    for &d in digits {
        if d > MAX_DIGIT {
            return Err(IsogenyError::MalformedSecret(format!(
                "invalid ternary digit {d}"
            )));
        }
        n = n * 3u32 + d;
    }
    Ok(n)
}

/// Write s as exactly t base 3 digits, most significant first. Fails when
/// s >= 3^t.
pub fn int_to_ternary(s: &BigUint, t: usize) -> Result<Vec<u8>> {
    let three = BigUint::from(3u32);
    let mut digits = vec![0u8; t];
    let mut s = s.clone();
    for d in digits.iter_mut().rev() {
        let (quo, rem) = s.div_rem(&three);
        *d = rem.to_u8().unwrap_or(0);
        s = quo;
    }
    if !s.is_zero() {
        return Err(IsogenyError::MalformedSecret(format!(
            "secret does not fit in {t} ternary digits"
        )));
    }
    Ok(digits)
}

/// A TerSIDH secret, given either as an integer below 3^t or as its digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TernarySecret {
    Integer(BigUint),
    Digits(Vec<u8>),
}

impl TernarySecret {
    /// The t digits of the secret, most significant first.
    pub fn to_digits(&self, t: usize) -> Result<Vec<u8>> {
        match self {
            TernarySecret::Integer(s) => int_to_ternary(s, t),
            TernarySecret::Digits(digits) => {
                if digits.len() != t {
                    return Err(IsogenyError::MalformedSecret(format!(
                        "expected {t} ternary digits, got {}",
                        digits.len()
                    )));
                }
                ternary_to_int(digits)?;
                Ok(digits.clone())
            }
        }
    }
}

/// Split of the secret isogeny into two kernels: K_P = [cP]P of order nP
/// and K_Q = [cQ]Q of order nQ. For every prime power q of the degree,
/// nP * cP = nQ * cQ = degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelCoefficients {
    pub cP: BigUint,
    pub nP: PrimeProduct,
    pub cQ: BigUint,
    pub nQ: PrimeProduct,
}

/// Map the ternary secret onto the prime powers of the degree. The last
/// digit pairs with the first prime power: digit 0 puts q in the order of
/// K_P, digit 1 in the order of K_Q and digit 2 in neither.
pub fn generate_kernel_coeffs(digits: &[u8], primes: &[u64]) -> Result<KernelCoefficients> {
    if digits.len() != primes.len() {
        return Err(IsogenyError::MalformedSecret(format!(
            "secret has {} digits for {} primes",
            digits.len(),
            primes.len()
        )));
    }

    let mut cP = BigUint::one();
    let mut cQ = BigUint::one();
    let mut nP = Vec::new();
    let mut nQ = Vec::new();
    for (&digit, &q) in digits.iter().rev().zip(primes) {
        match digit {
            0 => {
                nP.push(q);
                cQ *= q;
            }
            1 => {
                nQ.push(q);
                cP *= q;
            }
            2 => {
                cP *= q;
                cQ *= q;
            }
            _ => {
                return Err(IsogenyError::MalformedSecret(format!(
                    "invalid ternary digit {digit}"
                )));
            }
        }
    }

    Ok(KernelCoefficients {
        cP,
        nP: PrimeProduct::from_prime_powers(&nP)?,
        cQ,
        nQ: PrimeProduct::from_prime_powers(&nQ)?,
    })
}

/// One party of a TerSIDH key exchange. Both parties share a basis <P, Q>
/// of the full (p + 1)-torsion of E0 and extract their own A- and
/// B-torsion from it. Fields are named from the party's point of view.
pub struct Tersidh<Fq: FqTrait> {
    role: Role,
    A: PrimeProduct,
    E0: Curve<Fq>,
    basis: TorsionBasis<Fq>,
    PA: Point<Fq>,
    QA: Point<Fq>,
    PB: Point<Fq>,
    QB: Point<Fq>,
    secret: BigUint,
    digits: Vec<u8>,
    coeffs: KernelCoefficients,
    status: SessionStatus,
    public_key: Option<PublicKey<Fq>>,
    shared_secret: Option<Fq>,
}

impl<Fq: FqTrait> Tersidh<Fq> {
    /// Start a session on E0. When no basis of E0[p + 1] is supplied one is
    /// sampled with neither point above (0, 0); the peer must reuse it.
    pub fn new<R: CryptoRng + RngCore>(
        params: &TersidhParameters,
        E0: &Curve<Fq>,
        basis: Option<TorsionBasis<Fq>>,
        secret: Option<TernarySecret>,
        role: Role,
        rng: &mut R,
    ) -> Result<Self> {
        let p = E0.A.characteristic();
        if p != &params.p {
            return Err(IsogenyError::CharacteristicMismatch {
                expected: params.p.clone(),
                found: p.clone(),
            });
        }
        E0.check_supersingular(rng)?;
        let (A, B, primes) = match role {
            Role::Alice => (params.A.clone(), params.B.clone(), params.alice_primes()),
            Role::Bob => (params.B.clone(), params.A.clone(), params.bob_primes()),
        };
        let n = params.full_order()?;

        let basis = match basis {
            Some(basis) => {
                if basis.order != n || !validate_torsion_basis(E0, &basis.P, &basis.Q, &n) {
                    return Err(IsogenyError::InvalidBasis(
                        "supplied points are not a basis of E0[p + 1]".to_string(),
                    ));
                }
                basis
            }
            None => sample_torsion_basis(E0, &n, Orientation::Neither, rng)?,
        };
        debug!("{role:?}: full torsion basis ready");

        let PA = E0.mul(&basis.P, &(n.value() / A.value()));
        let QA = E0.mul(&basis.Q, &(n.value() / A.value()));
        let PB = E0.mul(&basis.P, &(n.value() / B.value()));
        let QB = E0.mul(&basis.Q, &(n.value() / B.value()));

        // Even degree chains cannot start from a kernel above (0, 0)
        if A.is_even() {
            let half = A.value() >> 1u32;
            let above = |X: &Point<Fq>| E0.xmul(&X.to_point_x(), &half).is_origin();
            if above(&PA) || above(&QA) {
                return Err(IsogenyError::InvalidBasis(
                    "basis point lies above (0, 0)".to_string(),
                ));
            }
        }

        let t = primes.len();
        let digits = match secret {
            Some(secret) => secret.to_digits(t)?,
            None => {
                let bound = BigUint::from(3u32).pow(t as u32);
                int_to_ternary(&random_below(rng, &bound), t)?
            }
        };
        let secret = ternary_to_int(&digits)?;
        let coeffs = generate_kernel_coeffs(&digits, &primes)?;
        debug!(
            "{role:?}: kernel orders nP = {}, nQ = {}",
            coeffs.nP, coeffs.nQ
        );

        Ok(Self {
            role,
            A,
            E0: E0.clone(),
            basis,
            PA,
            QA,
            PB,
            QB,
            secret,
            digits,
            coeffs,
            status: SessionStatus::KernelComputed,
            public_key: None,
            shared_secret: None,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The shared basis of E0[p + 1].
    pub fn basis(&self) -> &TorsionBasis<Fq> {
        &self.basis
    }

    pub fn degree(&self) -> &PrimeProduct {
        &self.A
    }

    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    /// Secret digits, most significant first.
    pub fn secret_digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn kernel_coefficients(&self) -> &KernelCoefficients {
        &self.coeffs
    }

    /// The kernel points [cP]P_A and [cQ]Q_A on E0.
    pub fn kernel_points(&self) -> (Point<Fq>, Point<Fq>) {
        (
            self.E0.mul(&self.PA, &self.coeffs.cP),
            self.E0.mul(&self.QA, &self.coeffs.cQ),
        )
    }

    pub fn public_key(&self) -> Option<&PublicKey<Fq>> {
        self.public_key.as_ref()
    }

    pub fn shared_secret(&self) -> Option<&Fq> {
        self.shared_secret.as_ref()
    }

    pub fn reset(&mut self) {
        self.public_key = None;
        self.shared_secret = None;
        self.status = SessionStatus::KernelComputed;
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status == SessionStatus::KeyExchanged {
            return Err(IsogenyError::InvalidParameter(
                "key exchange already completed, reset() the session first".to_string(),
            ));
        }
        Ok(())
    }

    /// Walk phi_Q o phi_P on E, where phi_P has kernel [cP]P and phi_Q the
    /// image of [cQ]Q, pushing `images` through both. Returns the codomain.
    fn secret_isogeny(
        &self,
        E: &Curve<Fq>,
        P: &Point<Fq>,
        Q: &Point<Fq>,
        images: &mut [PointX<Fq>],
    ) -> Result<Curve<Fq>> {
        let KP = E.xmul(&P.to_point_x(), &self.coeffs.cP);
        let KQ = E.xmul(&Q.to_point_x(), &self.coeffs.cQ);

        let phi_P = E.isogeny(&KP, &self.coeffs.nP)?;
        let KQ = phi_P.eval(&KQ);
        phi_P.eval_many(images);

        phi_P.codomain().isogeny_chain(&KQ, &self.coeffs.nQ, images)
    }

    /// Compute the secret isogeny on E0 and push the peer's torsion basis
    /// through it. TerSIDH public points are not masked.
    pub fn prepare_public_key(&mut self) -> Result<PublicKey<Fq>> {
        self.check_not_finished()?;
        let PQB = self.E0.sub(&self.PB, &self.QB);
        let mut images = [self.PB.to_point_x(), self.QB.to_point_x(), PQB.to_point_x()];
        let codomain = self.secret_isogeny(&self.E0, &self.PA, &self.QA, &mut images)?;
        let public_key = PublicKey::from_basis_x(&codomain, &BasisX::from_array(images))?;

        debug!("{:?}: public key ready", self.role);
        self.public_key = Some(public_key.clone());
        self.status = SessionStatus::PublicKeyReady;
        Ok(public_key)
    }

    /// Derive the shared j-invariant from the peer's public key, which must
    /// carry a basis of the A-torsion of the peer's curve.
    pub fn key_exchange(&mut self, public_key: &PublicKey<Fq>) -> Result<Fq> {
        self.check_not_finished()?;
        if public_key.curve.A.characteristic() != self.E0.A.characteristic() {
            return Err(IsogenyError::CharacteristicMismatch {
                expected: self.E0.A.characteristic().clone(),
                found: public_key.curve.A.characteristic().clone(),
            });
        }
        public_key.validate()?;
        let E = &public_key.curve;
        if !validate_torsion_basis(E, &public_key.P, &public_key.Q, &self.A) {
            warn!("{:?}: peer public key is not a torsion basis", self.role);
            return Err(IsogenyError::InvalidPublicKey(format!(
                "public points are not a basis of E[{}]",
                self.A.value()
            )));
        }

        let codomain = self.secret_isogeny(E, &public_key.P, &public_key.Q, &mut [])?;
        let j = codomain.j_invariant();

        debug!("{:?}: key exchange complete", self.role);
        self.shared_secret = Some(j.clone());
        self.status = SessionStatus::KeyExchanged;
        Ok(j)
    }
}
