use crate::fields::fq::Fq as FqTrait;

/// Special x-only representation of a point (or a pair of points,
/// since two Y coordinates may match a given X).
#[derive(Clone, Debug)]
pub struct PointX<Fq: FqTrait> {
    pub X: Fq,
    pub Z: Fq,
}

impl<Fq: FqTrait> PointX<Fq> {
    /// Create a point from coordinates. WARNING: no check is made on the point.
    pub fn new(X: &Fq, Z: &Fq) -> Self {
        Self {
            X: X.clone(),
            Z: Z.clone(),
        }
    }

    pub fn from_x_coord(X: &Fq) -> Self {
        Self {
            X: X.clone(),
            Z: X.one(),
        }
    }

    /// The point at infinity (1 : 0) in the same field as `a`.
    pub fn infinity(a: &Fq) -> Self {
        Self {
            X: a.one(),
            Z: a.zero(),
        }
    }

    /// Point at infinity is of the form (X : 0)
    pub fn is_zero(&self) -> bool {
        self.Z.is_zero()
    }

    /// Returns the affine `x` coordinate of a point, or `None` at infinity.
    pub fn x(&self) -> Option<Fq> {
        self.Z.invert().map(|z| self.X.clone() * z)
    }

    /// Return true if self and rhs represent the same point.
    pub fn equals(&self, rhs: &PointX<Fq>) -> bool {
        match (self.is_zero(), rhs.is_zero()) {
            (true, true) => true,
            (false, false) => self.X.clone() * rhs.Z.clone() == rhs.X.clone() * self.Z.clone(),
            _ => false,
        }
    }

    /// Return true for the 2-torsion point (0 : 1).
    pub fn is_origin(&self) -> bool {
        self.X.is_zero() && !self.Z.is_zero()
    }
}

impl<Fq: FqTrait> ::std::fmt::Display for PointX<Fq> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "PointX: ({} : {})", self.X, self.Z)
    }
}
