use log::{debug, warn};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::elliptic::{
    basis::BasisX,
    curve::Curve,
    isogeny_chain::MontgomeryIsogeny,
    torsion_basis::{Orientation, TorsionBasis, sample_torsion_basis, validate_torsion_basis},
};
use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;
use crate::utilities::{bn::random_below, prime_product::PrimeProduct};

use super::{
    Role, SessionStatus,
    masking::{is_quadratic_root_of_unity, sample_quadratic_root_of_unity},
    parameters::MsidhParameters,
    public_key::PublicKey,
};

/// One party of an MSIDH key exchange. All fields are named from the point
/// of view of the party itself: `A` is its own isogeny degree, `B` the
/// peer's.
pub struct Msidh<Fq: FqTrait> {
    role: Role,
    A: PrimeProduct,
    B: PrimeProduct,
    E0: Curve<Fq>,
    basis: TorsionBasis<Fq>,
    secret: BigUint,
    mask: BigUint,
    isogeny: MontgomeryIsogeny<Fq>,
    status: SessionStatus,
    public_key: Option<PublicKey<Fq>>,
    shared_secret: Option<Fq>,
}

impl<Fq: FqTrait> Msidh<Fq> {
    /// Start a session on E0. A basis of E0[A], the secret s in [0, A) and
    /// the mask (a square root of unity modulo B) are sampled when not given.
    /// The secret isogeny with kernel <P + [s]Q> is computed immediately.
    pub fn new<R: CryptoRng + RngCore>(
        params: &MsidhParameters,
        E0: &Curve<Fq>,
        basis: Option<TorsionBasis<Fq>>,
        secret: Option<BigUint>,
        mask: Option<BigUint>,
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
        let (A, B) = match role {
            Role::Alice => (params.A.clone(), params.B.clone()),
            Role::Bob => (params.B.clone(), params.A.clone()),
        };
        debug!("{role:?}: session init with degree {A}");

        // The kernel P + [s]Q never lies above (0, 0) when Q does
        let basis = match basis {
            Some(basis) => {
                if basis.order != A || !validate_torsion_basis(E0, &basis.P, &basis.Q, &A) {
                    return Err(IsogenyError::InvalidBasis(format!(
                        "supplied points are not a basis of E0[{}]",
                        A.value()
                    )));
                }
                basis
            }
            None => {
                let orientation = if A.is_even() {
                    Orientation::Q
                } else {
                    Orientation::Unconstrained
                };
                sample_torsion_basis(E0, &A, orientation, rng)?
            }
        };
        debug!("{role:?}: torsion basis ready");

        let mask = match mask {
            Some(m) if is_quadratic_root_of_unity(&m, &B) => m,
            Some(m) => {
                return Err(IsogenyError::InvalidParameter(format!(
                    "mask {m} is not a square root of unity modulo {}",
                    B.value()
                )));
            }
            None => sample_quadratic_root_of_unity(&B, rng)?,
        };

        let secret = match secret {
            Some(s) if &s < A.value() => s,
            Some(s) => {
                return Err(IsogenyError::MalformedSecret(format!(
                    "secret {s} is not below {}",
                    A.value()
                )));
            }
            None => random_below(rng, A.value()),
        };

        let kernel = E0.three_point_ladder(&basis.to_basis_x(E0), &secret);
        let isogeny = E0.isogeny(&kernel, &A)?;
        debug!("{role:?}: secret isogeny computed");

        Ok(Self {
            role,
            A,
            B,
            E0: E0.clone(),
            basis,
            secret,
            mask,
            isogeny,
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

    /// The basis <P, Q> of E0[A] the secret kernel is drawn from. The peer
    /// needs it to compute its public key.
    pub fn basis(&self) -> &TorsionBasis<Fq> {
        &self.basis
    }

    pub fn degree(&self) -> &PrimeProduct {
        &self.A
    }

    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    pub fn mask(&self) -> &BigUint {
        &self.mask
    }

    /// The codomain of the secret isogeny.
    pub fn codomain(&self) -> &Curve<Fq> {
        self.isogeny.codomain()
    }

    pub fn public_key(&self) -> Option<&PublicKey<Fq>> {
        self.public_key.as_ref()
    }

    pub fn shared_secret(&self) -> Option<&Fq> {
        self.shared_secret.as_ref()
    }

    /// Forget the public key and shared secret, keeping the secret isogeny.
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

    /// Push the peer's basis of E0[B] through the secret isogeny and mask
    /// the images: the public key is (E, [m]phi(P_B), [m]phi(Q_B)).
    pub fn generate_public_key(&mut self, peer_basis: &TorsionBasis<Fq>) -> Result<PublicKey<Fq>> {
        self.check_not_finished()?;
        if peer_basis.order != self.B
            || !validate_torsion_basis(&self.E0, &peer_basis.P, &peer_basis.Q, &self.B)
        {
            warn!("{:?}: rejected peer basis", self.role);
            return Err(IsogenyError::InvalidBasis(format!(
                "peer points are not a basis of E0[{}]",
                self.B.value()
            )));
        }

        let mut images = peer_basis.to_basis_x(&self.E0).to_array();
        self.isogeny.eval_many(&mut images);

        let E = self.isogeny.codomain();
        let masked = images.map(|X| E.xmul(&X, &self.mask));
        let public_key = PublicKey::from_basis_x(E, &BasisX::from_array(masked))?;

        debug!("{:?}: public key ready", self.role);
        self.public_key = Some(public_key.clone());
        self.status = SessionStatus::PublicKeyReady;
        Ok(public_key)
    }

    /// Derive the shared secret from the peer's public key (E_B, P', Q').
    /// The key is rejected unless e_A(P', Q') = e_A(P, Q)^B, which holds
    /// for honestly generated keys as the mask squares to one modulo B.
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
        let lhs = E.weil_pairing(&public_key.P, &public_key.Q, self.A.value());
        let rhs = self
            .E0
            .weil_pairing(&self.basis.P, &self.basis.Q, self.A.value())
            .pow(self.B.value());
        if lhs != rhs {
            warn!("{:?}: peer public key failed the pairing check", self.role);
            return Err(IsogenyError::InvalidPublicKey(
                "pairing of the public points does not match".to_string(),
            ));
        }

        let kernel = E.three_point_ladder(&public_key.to_basis_x(), &self.secret);
        let codomain = E.isogeny(&kernel, &self.A)?.codomain().clone();
        let j = codomain.j_invariant();

        debug!("{:?}: key exchange complete", self.role);
        self.shared_secret = Some(j.clone());
        self.status = SessionStatus::KeyExchanged;
        Ok(j)
    }
}
