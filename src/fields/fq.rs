use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

/// Arithmetic over a quadratic extension field GF(p^2) whose characteristic is
/// only known at runtime. Elements carry a handle to their field, so constants
/// are created relative to an existing element, e.g. `a.one()`.
///
/// Division by zero returns zero, which is what the projective formulas
/// expect. Use `invert` when the zero case must be observed.
pub trait Fq:
    Sized
    + Clone
    + Debug
    + Display
    + PartialEq
    + Eq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    /// The characteristic p of the field.
    fn characteristic(&self) -> &BigUint;

    fn zero(&self) -> Self;
    fn one(&self) -> Self;
    fn from_i64(&self, n: i64) -> Self;

    fn is_zero(&self) -> bool;
    fn is_one(&self) -> bool;

    fn square(&self) -> Self;
    fn mul2(&self) -> Self;
    fn mul_small(&self, n: i64) -> Self;

    /// Return 1 / self, or `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// Return self^e.
    fn pow(&self, e: &BigUint) -> Self;

    /// Return true if self is a square in GF(p^2). Zero is a square.
    fn is_square(&self) -> bool;

    /// Return a square root of self, or `None` if self is not a square.
    fn sqrt(&self) -> Option<Self>;

    /// Return a uniformly random element of the same field.
    fn rand<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Self;
}

/// Given a multiple `m` of the multiplicative order of `x`, with `primes` the
/// distinct primes dividing m, return the exact order of x.
pub fn order_from_multiple<F: Fq>(x: &F, m: &BigUint, primes: &[u64]) -> BigUint {
    let mut order = m.clone();
    for &q in primes {
        let q = BigUint::from(q);
        loop {
            let (quo, rem) = order.div_rem(&q);
            if !rem.is_zero() || !x.pow(&quo).is_one() {
                break;
            }
            order = quo;
        }
    }
    order
}
