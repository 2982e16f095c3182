use crate::fields::fq::Fq as FqTrait;

use super::point::PointX;

/// Projective representation of a point (X : Y : Z)
#[derive(Clone, Debug)]
pub struct Point<Fq: FqTrait> {
    pub X: Fq,
    pub Y: Fq,
    pub Z: Fq,
}

impl<Fq: FqTrait> Point<Fq> {
    /// Create a new point.
    /// WARNING no check is made on the validity of the point.
    pub fn new(X: &Fq, Y: &Fq, Z: &Fq) -> Self {
        Self {
            X: X.clone(),
            Y: Y.clone(),
            Z: Z.clone(),
        }
    }

    /// Create a new point from affine coordinates (x, y).
    /// WARNING no check is made on the validity of the point.
    pub fn new_xy(X: &Fq, Y: &Fq) -> Self {
        Self {
            X: X.clone(),
            Y: Y.clone(),
            Z: X.one(),
        }
    }

    /// The point-at-infinity (0 : 1 : 0), in the same field as `a`.
    pub fn infinity(a: &Fq) -> Self {
        Self {
            X: a.zero(),
            Y: a.one(),
            Z: a.zero(),
        }
    }

    /// Get the (x,y) affine coordinates, or `None` for the point-at-infinity.
    pub fn to_xy(&self) -> Option<(Fq, Fq)> {
        let t = self.Z.invert()?;
        Some((self.X.clone() * t.clone(), self.Y.clone() * t))
    }

    pub fn to_point_x(&self) -> PointX<Fq> {
        PointX::new(&self.X, &self.Z)
    }

    /// Negate the point in place.
    pub fn set_neg(&mut self) {
        self.Y = -self.Y.clone();
    }

    /// Return true if self is the point-at-infinity.
    pub fn is_zero(&self) -> bool {
        self.Z.is_zero()
    }

    /// Return true if self and rhs represent the same point.
    pub fn equals(&self, rhs: &Self) -> bool {
        // P1 == P2 if and only if:
        //    P1 == inf AND P2 == inf
        //  OR:
        //    P1 != inf AND P2 != inf AND X1*Z2 = X2*Z1 AND Y1*Z2 = Y2*Z1
        match (self.is_zero(), rhs.is_zero()) {
            (true, true) => true,
            (false, false) => {
                self.X.clone() * rhs.Z.clone() == rhs.X.clone() * self.Z.clone()
                    && self.Y.clone() * rhs.Z.clone() == rhs.Y.clone() * self.Z.clone()
            }
            _ => false,
        }
    }
}

impl<Fq: FqTrait> PartialEq for Point<Fq> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<Fq: FqTrait> Eq for Point<Fq> {}

impl<Fq: FqTrait> core::ops::Neg for Point<Fq> {
    type Output = Point<Fq>;

    #[inline(always)]
    fn neg(self) -> Point<Fq> {
        let mut r = self;
        r.set_neg();
        r
    }
}

impl<Fq: FqTrait> core::ops::Neg for &Point<Fq> {
    type Output = Point<Fq>;

    #[inline(always)]
    fn neg(self) -> Point<Fq> {
        let mut r = self.clone();
        r.set_neg();
        r
    }
}

impl<Fq: FqTrait> ::std::fmt::Display for Point<Fq> {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        match self.to_xy() {
            Some((x, y)) => write!(f, "({x}, {y})"),
            None => write!(f, "(0 : 1 : 0)"),
        }
    }
}
