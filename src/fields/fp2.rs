use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::error::{IsogenyError, Result};
use crate::utilities::bn::{is_probable_prime, random_below};

use super::fq::Fq;

/// Constants of GF(p) used by the extension field arithmetic.
#[derive(Debug)]
struct FieldConstants {
    p: BigUint,
    // (p - 3) / 4, used for square roots
    sqrt_exp: BigUint,
    // (p - 1) / 2, the Euler criterion exponent
    legendre_exp: BigUint,
    // p - 2, for inversion in GF(p)
    inv_exp: BigUint,
}

impl FieldConstants {
    #[inline]
    fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        let r = a + b;
        if r >= self.p { r - &self.p } else { r }
    }

    #[inline]
    fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b { a - b } else { a + &self.p - b }
    }

    #[inline]
    fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    #[inline]
    fn neg(&self, a: &BigUint) -> BigUint {
        if a.is_zero() { BigUint::zero() } else { &self.p - a }
    }

    fn is_square(&self, a: &BigUint) -> bool {
        a.is_zero() || a.modpow(&self.legendre_exp, &self.p).is_one()
    }
}

/// The field GF(p^2) = GF(p)[i] / (i^2 + 1) for a prime p = 3 mod 4. Cloning
/// the handle is cheap, every element holds one.
#[derive(Clone, Debug)]
pub struct Fp2Field {
    consts: Arc<FieldConstants>,
}

/// An element re + i*im of GF(p^2).
#[derive(Clone, Debug)]
pub struct Fp2 {
    re: BigUint,
    im: BigUint,
    field: Fp2Field,
}

impl Fp2Field {
    /// Create the field GF(p^2). Fails unless p is a prime with p = 3 mod 4.
    pub fn new(p: &BigUint) -> Result<Self> {
        let four = BigUint::from(4u32);
        if p % &four != BigUint::from(3u32) || !is_probable_prime(p) {
            return Err(IsogenyError::InvalidParameter(format!(
                "characteristic {p} must be a prime equal to 3 mod 4"
            )));
        }
        let consts = FieldConstants {
            p: p.clone(),
            sqrt_exp: (p - 3u32) >> 2,
            legendre_exp: (p - 1u32) >> 1,
            inv_exp: p - 2u32,
        };
        Ok(Self {
            consts: Arc::new(consts),
        })
    }

    pub fn characteristic(&self) -> &BigUint {
        &self.consts.p
    }

    /// Create re + i*im, reducing both coordinates modulo p.
    pub fn element(&self, re: &BigUint, im: &BigUint) -> Fp2 {
        Fp2 {
            re: re % &self.consts.p,
            im: im % &self.consts.p,
            field: self.clone(),
        }
    }

    pub fn from_u64(&self, re: u64, im: u64) -> Fp2 {
        self.element(&BigUint::from(re), &BigUint::from(im))
    }

    pub fn from_i64(&self, n: i64) -> Fp2 {
        let a = self.from_u64(n.unsigned_abs(), 0);
        if n < 0 { -a } else { a }
    }

    pub fn zero(&self) -> Fp2 {
        self.from_u64(0, 0)
    }

    pub fn one(&self) -> Fp2 {
        self.from_u64(1, 0)
    }

    /// The square root of -1 generating GF(p^2) over GF(p).
    pub fn i(&self) -> Fp2 {
        self.from_u64(0, 1)
    }

    pub fn random<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Fp2 {
        let re = random_below(rng, &self.consts.p);
        let im = random_below(rng, &self.consts.p);
        Fp2 {
            re,
            im,
            field: self.clone(),
        }
    }

    /// Parse an element written as "b*i + a", "a + b*i", "b*i", "i" or "a".
    pub fn parse(&self, s: &str) -> Result<Fp2> {
        let parse_err = |reason: &str| IsogenyError::Parse {
            input: s.to_string(),
            reason: reason.to_string(),
        };
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(parse_err("empty input"));
        }

        let mut re: Option<BigUint> = None;
        let mut im: Option<BigUint> = None;
        for term in compact.split('+') {
            let (slot, digits) = match term.strip_suffix('i') {
                Some(coeff) => {
                    let coeff = match coeff.strip_suffix('*') {
                        Some(c) => c,
                        None if coeff.is_empty() => "1",
                        None => return Err(parse_err("expected '*' before 'i'")),
                    };
                    (&mut im, coeff)
                }
                None => (&mut re, term),
            };
            if slot.is_some() {
                return Err(parse_err("repeated term"));
            }
            let value = BigUint::parse_bytes(digits.as_bytes(), 10)
                .ok_or_else(|| parse_err("invalid integer"))?;
            *slot = Some(value);
        }

        let re = re.unwrap_or_default();
        let im = im.unwrap_or_default();
        if re >= self.consts.p || im >= self.consts.p {
            return Err(parse_err("coefficient not reduced modulo p"));
        }
        Ok(self.element(&re, &im))
    }
}

impl PartialEq for Fp2Field {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.consts, &other.consts) || self.consts.p == other.consts.p
    }
}

impl Eq for Fp2Field {}

impl Fp2 {
    pub fn re(&self) -> &BigUint {
        &self.re
    }

    pub fn im(&self) -> &BigUint {
        &self.im
    }

    pub fn field(&self) -> &Fp2Field {
        &self.field
    }

    fn with(&self, re: BigUint, im: BigUint) -> Self {
        Self {
            re,
            im,
            field: self.field.clone(),
        }
    }

    /// The norm re^2 + im^2 in GF(p).
    fn norm(&self) -> BigUint {
        let c = &self.field.consts;
        c.add(&c.mul(&self.re, &self.re), &c.mul(&self.im, &self.im))
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        debug_assert!(self.field == rhs.field);
        let c = &self.field.consts;
        self.with(c.add(&self.re, &rhs.re), c.add(&self.im, &rhs.im))
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        debug_assert!(self.field == rhs.field);
        let c = &self.field.consts;
        self.with(c.sub(&self.re, &rhs.re), c.sub(&self.im, &rhs.im))
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        debug_assert!(self.field == rhs.field);
        let c = &self.field.consts;
        // (a + bi)(c + di) = (ac - bd) + (ad + bc)i
        let ac = &self.re * &rhs.re;
        let bd = &self.im * &rhs.im;
        let ad_bc = (&self.re * &rhs.im + &self.im * &rhs.re) % &c.p;
        let re = c.sub(&(ac % &c.p), &(bd % &c.p));
        self.with(re, ad_bc)
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        match rhs.invert() {
            Some(inv) => self.mul_ref(&inv),
            None => self.zero(),
        }
    }

    fn neg_ref(&self) -> Self {
        let c = &self.field.consts;
        self.with(c.neg(&self.re), c.neg(&self.im))
    }
}

impl Fq for Fp2 {
    fn characteristic(&self) -> &BigUint {
        &self.field.consts.p
    }

    fn zero(&self) -> Self {
        self.with(BigUint::zero(), BigUint::zero())
    }

    fn one(&self) -> Self {
        self.with(BigUint::one(), BigUint::zero())
    }

    fn from_i64(&self, n: i64) -> Self {
        self.field.from_i64(n)
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }

    fn is_one(&self) -> bool {
        self.re.is_one() && self.im.is_zero()
    }

    fn square(&self) -> Self {
        let c = &self.field.consts;
        // (a + bi)^2 = (a + b)(a - b) + 2abi
        let re = c.mul(&c.add(&self.re, &self.im), &c.sub(&self.re, &self.im));
        let ab = c.mul(&self.re, &self.im);
        let im = c.add(&ab, &ab);
        self.with(re, im)
    }

    fn mul2(&self) -> Self {
        self.add_ref(self)
    }

    fn mul_small(&self, n: i64) -> Self {
        self.mul_ref(&self.field.from_i64(n))
    }

    fn invert(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        // 1 / (a + bi) = (a - bi) / (a^2 + b^2)
        let c = &self.field.consts;
        let n_inv = self.norm().modpow(&c.inv_exp, &c.p);
        Some(self.with(c.mul(&self.re, &n_inv), c.neg(&c.mul(&self.im, &n_inv))))
    }

    fn pow(&self, e: &BigUint) -> Self {
        let mut r = self.one();
        for i in (0..e.bits()).rev() {
            r = r.square();
            if e.bit(i) {
                r = r.mul_ref(self);
            }
        }
        r
    }

    fn is_square(&self) -> bool {
        // x is a square in GF(p^2) iff its norm is a square in GF(p)
        self.field.consts.is_square(&self.norm())
    }

    fn sqrt(&self) -> Option<Self> {
        if self.is_zero() {
            return Some(self.zero());
        }
        // Algorithm 9 of https://eprint.iacr.org/2012/685
        let c = &self.field.consts;
        let a1 = self.pow(&c.sqrt_exp);
        let x0 = a1.mul_ref(self);
        let alpha = a1.mul_ref(&x0);
        let x = if (alpha.clone() + self.one()).is_zero() {
            self.field.i() * x0
        } else {
            let b = (alpha + self.one()).pow(&c.legendre_exp);
            b * x0
        };
        if x.square() == *self { Some(x) } else { None }
    }

    fn rand<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Self {
        self.field.random(rng)
    }
}

impl PartialEq for Fp2 {
    fn eq(&self, other: &Self) -> bool {
        self.re == other.re && self.im == other.im && self.field == other.field
    }
}

impl Eq for Fp2 {}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $inner:ident) => {
        impl $trait for Fp2 {
            type Output = Fp2;
            #[inline]
            fn $method(self, rhs: Fp2) -> Fp2 {
                self.$inner(&rhs)
            }
        }

        impl<'a> $trait<&'a Fp2> for &'a Fp2 {
            type Output = Fp2;
            #[inline]
            fn $method(self, rhs: &'a Fp2) -> Fp2 {
                self.$inner(rhs)
            }
        }

        impl $assign_trait for Fp2 {
            #[inline]
            fn $assign_method(&mut self, rhs: Fp2) {
                *self = self.$inner(&rhs);
            }
        }
    };
}

impl_binop!(Add, add, AddAssign, add_assign, add_ref);
impl_binop!(Sub, sub, SubAssign, sub_assign, sub_ref);
impl_binop!(Mul, mul, MulAssign, mul_assign, mul_ref);

impl Div for Fp2 {
    type Output = Fp2;
    #[inline]
    fn div(self, rhs: Fp2) -> Fp2 {
        self.div_ref(&rhs)
    }
}

impl Neg for Fp2 {
    type Output = Fp2;
    #[inline]
    fn neg(self) -> Fp2 {
        self.neg_ref()
    }
}

impl ::std::fmt::Display for Fp2 {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        let im = match (self.im.is_zero(), self.im.is_one()) {
            (true, _) => return write!(f, "{}", self.re),
            (false, true) => "i".to_string(),
            (false, false) => format!("{}*i", self.im),
        };
        if self.re.is_zero() {
            write!(f, "{im}")
        } else {
            write!(f, "{im} + {}", self.re)
        }
    }
}
