use crate::elliptic::{basis::BasisX, curve::Curve, point::PointX, projective_point::Point};
use crate::error::{IsogenyError, Result};
use crate::fields::fq::Fq as FqTrait;

/// A public key: the codomain curve E together with the image basis (P, Q).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey<Fq: FqTrait> {
    pub curve: Curve<Fq>,
    pub P: Point<Fq>,
    pub Q: Point<Fq>,
}

/// Compressed public key: the Montgomery coefficient of E and the affine
/// x-coordinates x(P), x(Q) and x(P - Q).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKeyX<Fq: FqTrait> {
    pub a: Fq,
    pub xP: Fq,
    pub xQ: Fq,
    pub xPQ: Fq,
}

impl<Fq: FqTrait> PublicKey<Fq> {
    /// Build a public key by lifting an x-only image basis on E. The points
    /// are recovered up to a common sign, which changes neither the
    /// subgroups they generate nor their Weil pairing.
    pub fn from_basis_x(curve: &Curve<Fq>, basis: &BasisX<Fq>) -> Result<Self> {
        let affine = |P: &PointX<Fq>| {
            P.x().ok_or_else(|| {
                IsogenyError::InvalidPublicKey("image point at infinity".to_string())
            })
        };
        let (xP, xQ, xPQ) = (affine(&basis.P)?, affine(&basis.Q)?, affine(&basis.PQ)?);
        let (P, Q) = curve.lift_basis(&xP, &xQ, &xPQ).ok_or_else(|| {
            IsogenyError::InvalidPublicKey("x-coordinates do not lift to the curve".to_string())
        })?;
        Ok(Self {
            curve: curve.clone(),
            P,
            Q,
        })
    }

    /// Return an error unless both points lie on the curve.
    pub fn validate(&self) -> Result<()> {
        if !self.curve.is_on_curve(&self.P) || !self.curve.is_on_curve(&self.Q) {
            return Err(IsogenyError::InvalidPublicKey(
                "public points are not on the public curve".to_string(),
            ));
        }
        Ok(())
    }

    /// The x-only basis x(P), x(Q), x(P - Q).
    pub fn to_basis_x(&self) -> BasisX<Fq> {
        let PQ = self.curve.sub(&self.P, &self.Q);
        BasisX::from_array([self.P.to_point_x(), self.Q.to_point_x(), PQ.to_point_x()])
    }

    pub fn compress(&self) -> Result<PublicKeyX<Fq>> {
        let basis = self.to_basis_x();
        let affine = |x: Option<Fq>| {
            x.ok_or_else(|| IsogenyError::InvalidPublicKey("point at infinity".to_string()))
        };
        Ok(PublicKeyX {
            a: self.curve.A.clone(),
            xP: affine(basis.P.x())?,
            xQ: affine(basis.Q.x())?,
            xPQ: affine(basis.PQ.x())?,
        })
    }
}

impl<Fq: FqTrait> PublicKeyX<Fq> {
    pub fn decompress(&self) -> Result<PublicKey<Fq>> {
        let curve = Curve::new(&self.a)?;
        let basis = BasisX::from_x_coords(&self.xP, &self.xQ, &self.xPQ);
        PublicKey::from_basis_x(&curve, &basis)
    }
}
