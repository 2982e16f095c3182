use super::point::PointX;
use crate::fields::fq::Fq as FqTrait;

/// A x-only basis of x(P), x(Q) and x(P - Q)
#[derive(Clone, Debug)]
pub struct BasisX<Fq: FqTrait> {
    pub P: PointX<Fq>,
    pub Q: PointX<Fq>,
    pub PQ: PointX<Fq>,
}

impl<Fq: FqTrait> BasisX<Fq> {
    /// Create a basis given the x-coordinates of x(P), x(Q) and x(P - Q)
    pub fn from_x_coords(xP: &Fq, xQ: &Fq, xPQ: &Fq) -> Self {
        Self {
            P: PointX::from_x_coord(xP),
            Q: PointX::from_x_coord(xQ),
            PQ: PointX::from_x_coord(xPQ),
        }
    }

    pub fn from_array(basis: [PointX<Fq>; 3]) -> Self {
        let [P, Q, PQ] = basis;
        Self { P, Q, PQ }
    }

    /// Return the array of points [P, Q, PQ]
    pub fn to_array(&self) -> [PointX<Fq>; 3] {
        [self.P.clone(), self.Q.clone(), self.PQ.clone()]
    }
}
