#![allow(non_snake_case)]

#[cfg(test)]
mod test_fields {
    use msidh::error::IsogenyError;
    use msidh::fields::fp2::{Fp2, Fp2Field};
    use msidh::fields::fq::{Fq, order_from_multiple};
    use msidh::utilities::drng::DRNG;
    use num_bigint::BigUint;
    use num_traits::Zero;

    fn field_419() -> Fp2Field {
        Fp2Field::new(&BigUint::from(419u32)).unwrap()
    }

    #[test]
    fn test_rejects_bad_characteristic() {
        // 421 is prime but 1 mod 4, 423 = 3 mod 4 is composite
        assert!(Fp2Field::new(&BigUint::from(421u32)).is_err());
        assert!(Fp2Field::new(&BigUint::from(423u32)).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let F = field_419();
        let a = F.from_u64(3, 4);
        let b = F.from_u64(418, 2);

        // (3 + 4i)(-1 + 2i) = -3 - 8 + (6 - 4)i = -11 + 2i
        assert_eq!(a.clone() * b.clone(), F.from_u64(408, 2));
        assert_eq!(a.clone() + b.clone(), F.from_u64(2, 6));
        assert_eq!(a.clone() - a.clone(), F.zero());
        assert_eq!(F.i().square(), F.from_i64(-1));
        assert_eq!(a.mul2(), a.clone() + a.clone());
        assert_eq!(a.mul_small(-3), -(a.clone() + a.clone() + a.clone()));
    }

    #[test]
    fn test_inversion() {
        let F = field_419();
        let mut rng = DRNG::from_seed("test_inversion".as_bytes());

        assert!(F.zero().invert().is_none());
        // Division by zero gives zero
        assert_eq!(F.one() / F.zero(), F.zero());

        for _ in 0..50 {
            let x = F.random(&mut rng);
            if x.is_zero() {
                continue;
            }
            let x_inv = x.invert().unwrap();
            assert!((x.clone() * x_inv.clone()).is_one());
            assert_eq!(F.one() / x.clone(), x_inv);
        }
    }

    #[test]
    fn test_square_roots() {
        let F = field_419();
        let mut rng = DRNG::from_seed("test_square_roots".as_bytes());

        let mut non_squares = 0;
        for _ in 0..100 {
            let x = F.random(&mut rng);
            let x2 = x.square();
            assert!(x2.is_square());
            let r = x2.sqrt().unwrap();
            assert_eq!(r.square(), x2);

            match x.sqrt() {
                Some(r) => assert_eq!(r.square(), x),
                None => {
                    assert!(!x.is_square());
                    non_squares += 1;
                }
            }
        }
        // Half of GF(p^2)* are non-squares
        assert!(non_squares > 20);
    }

    #[test]
    fn test_frobenius_order() {
        let F = field_419();
        let mut rng = DRNG::from_seed("test_frobenius_order".as_bytes());
        let p = BigUint::from(419u32);
        let order = &p * &p - 1u32;

        for _ in 0..10 {
            let x = F.random(&mut rng);
            if x.is_zero() {
                continue;
            }
            assert!(x.pow(&order).is_one());
            // x^p is the conjugate of x
            let x_p = x.pow(&p);
            assert_eq!(x_p.re(), x.re());
            assert!(((x_p.im() + x.im()) % &p).is_zero());
        }
    }

    #[test]
    fn test_multiplicative_order() {
        let F = field_419();
        let p2_minus_one = BigUint::from(419u32 * 419 - 1);
        // 419^2 - 1 = 2^3 * 3 * 5 * 7 * 11 * 19
        let primes = [2, 3, 5, 7, 11, 19];

        assert_eq!(
            order_from_multiple(&F.one(), &p2_minus_one, &primes),
            BigUint::from(1u32)
        );
        assert_eq!(
            order_from_multiple(&F.from_i64(-1), &p2_minus_one, &primes),
            BigUint::from(2u32)
        );
        assert_eq!(
            order_from_multiple(&F.i(), &p2_minus_one, &primes),
            BigUint::from(4u32)
        );
    }

    #[test]
    fn test_text_format() {
        let F = field_419();
        let cases = [
            (F.from_u64(332, 209), "209*i + 332"),
            (F.from_u64(7, 0), "7"),
            (F.from_u64(0, 5), "5*i"),
            (F.from_u64(0, 1), "i"),
            (F.from_u64(3, 1), "i + 3"),
            (F.zero(), "0"),
        ];
        for (x, s) in cases.iter() {
            assert_eq!(x.to_string(), *s);
            assert_eq!(&F.parse(s).unwrap(), x);
        }

        let x: Fp2 = F.parse("332 + 209*i").unwrap();
        assert_eq!(x, F.from_u64(332, 209));
        let x = F.parse(" 209 * i  +  332 ").unwrap();
        assert_eq!(x, F.from_u64(332, 209));

        for bad in ["", "419", "12*i + 3*i", "abc", "5i", "1 + "] {
            assert!(
                matches!(F.parse(bad), Err(IsogenyError::Parse { .. })),
                "accepted {bad:?}"
            );
        }
    }
}
