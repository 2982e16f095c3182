#![allow(non_snake_case)]

#[cfg(test)]
mod test_torsion_basis {
    use msidh::elliptic::curve::Curve;
    use msidh::elliptic::projective_point::Point;
    use msidh::elliptic::torsion_basis::{
        Orientation, TorsionBasis, sample_torsion_basis, validate_torsion_basis,
    };
    use msidh::error::IsogenyError;
    use msidh::fields::fp2::{Fp2, Fp2Field};
    use msidh::fields::fq::{Fq, order_from_multiple};
    use msidh::utilities::drng::DRNG;
    use msidh::utilities::prime_product::PrimeProduct;
    use num_bigint::BigUint;

    fn starting_curve() -> Curve<Fp2> {
        let F = Fp2Field::new(&BigUint::from(419u32)).unwrap();
        Curve::new(&F.from_i64(6)).unwrap()
    }

    fn lies_above_origin(E: &Curve<Fp2>, basis: &TorsionBasis<Fp2>, P: &Point<Fp2>) -> bool {
        let half = basis.order.value() >> 1u32;
        E.xmul(&P.to_point_x(), &half).is_origin()
    }

    #[test]
    fn test_point_order_from_multiple() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_point_order".as_bytes());
        let full = PrimeProduct::from_prime_powers(&[4, 3, 5, 7]).unwrap();

        for _ in 0..20 {
            let P = E.random_point(&mut rng).to_point_x();
            let order = E.point_order_from_multiple(&P, &full);
            assert!(E.xmul(&P, &order).is_zero());
            for q in full.primes() {
                if (&order % q) == BigUint::from(0u32) {
                    assert!(!E.xmul(&P, &(&order / q)).is_zero());
                }
            }
        }
    }

    #[test]
    fn test_sample_odd_basis() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_sample_odd_basis".as_bytes());
        let r = PrimeProduct::from_prime_powers(&[3, 7]).unwrap();

        for _ in 0..5 {
            let basis = sample_torsion_basis(&E, &r, Orientation::Unconstrained, &mut rng).unwrap();
            assert_eq!(basis.order, r);
            assert!(E.has_exact_order(&basis.P, &r));
            assert!(E.has_exact_order(&basis.Q, &r));
            assert!(validate_torsion_basis(&E, &basis.P, &basis.Q, &r));

            // Q lies in <P> so (P, [2]P) is never a basis
            let P2 = E.mul_u64(&basis.P, 2);
            assert!(!validate_torsion_basis(&E, &basis.P, &P2, &r));
        }
    }

    #[test]
    fn test_sample_even_basis_orientation() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_sample_even_basis".as_bytes());
        let r = PrimeProduct::from_prime_powers(&[4, 5]).unwrap();

        for _ in 0..5 {
            let basis = sample_torsion_basis(&E, &r, Orientation::Q, &mut rng).unwrap();
            assert!(validate_torsion_basis(&E, &basis.P, &basis.Q, &r));
            assert!(!lies_above_origin(&E, &basis, &basis.P));
            assert!(lies_above_origin(&E, &basis, &basis.Q));

            let basis = sample_torsion_basis(&E, &r, Orientation::P, &mut rng).unwrap();
            assert!(validate_torsion_basis(&E, &basis.P, &basis.Q, &r));
            assert!(lies_above_origin(&E, &basis, &basis.P));
            assert!(!lies_above_origin(&E, &basis, &basis.Q));

            let basis = sample_torsion_basis(&E, &r, Orientation::Neither, &mut rng).unwrap();
            assert!(validate_torsion_basis(&E, &basis.P, &basis.Q, &r));
            assert!(!lies_above_origin(&E, &basis, &basis.P));
            assert!(!lies_above_origin(&E, &basis, &basis.Q));
        }
    }

    #[test]
    fn test_full_basis_and_subgroups() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_full_basis".as_bytes());
        let full = PrimeProduct::from_prime_powers(&[4, 3, 5, 7]).unwrap();
        let basis = sample_torsion_basis(&E, &full, Orientation::Neither, &mut rng).unwrap();
        assert!(validate_torsion_basis(&E, &basis.P, &basis.Q, &full));

        let A = PrimeProduct::from_prime_powers(&[4, 5]).unwrap();
        let B = PrimeProduct::from_prime_powers(&[3, 7]).unwrap();
        for n in [&A, &B] {
            let sub = basis.subgroup(&E, n).unwrap();
            assert_eq!(&sub.order, n);
            assert!(validate_torsion_basis(&E, &sub.P, &sub.Q, n));
        }

        let eleven = PrimeProduct::from_prime_powers(&[11]).unwrap();
        assert!(matches!(
            basis.subgroup(&E, &eleven),
            Err(IsogenyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_order_not_dividing_p_plus_one() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_rejects_order".as_bytes());
        let r = PrimeProduct::from_prime_powers(&[11]).unwrap();
        assert!(matches!(
            sample_torsion_basis(&E, &r, Orientation::Unconstrained, &mut rng),
            Err(IsogenyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rejects_curve_of_wrong_order() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_rejects_curve_of_wrong_order".as_bytes());
        assert!(E.check_supersingular(&mut rng).is_ok());

        // y^2 = x^3 + 3x^2 + x over GF(419^2) does not have order 420^2
        let F = E.A.field().clone();
        let E3 = Curve::new(&F.from_i64(3)).unwrap();
        assert!(matches!(
            E3.check_supersingular(&mut rng),
            Err(IsogenyError::InvalidParameter(_))
        ));
        let r = PrimeProduct::from_prime_powers(&[4, 5]).unwrap();
        assert!(matches!(
            sample_torsion_basis(&E3, &r, Orientation::Q, &mut rng),
            Err(IsogenyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_weil_pairing() {
        let E = starting_curve();
        let mut rng = DRNG::from_seed("test_weil_pairing".as_bytes());
        let r = PrimeProduct::from_prime_powers(&[4, 3, 5, 7]).unwrap();
        let n = r.value();
        let basis = sample_torsion_basis(&E, &r, Orientation::Unconstrained, &mut rng).unwrap();
        let (P, Q) = (&basis.P, &basis.Q);

        let e = E.weil_pairing(P, Q, n);
        assert!(e.pow(n).is_one());
        assert_eq!(&order_from_multiple(&e, n, &r.primes()), n);

        // Alternating and trivial on multiples of a single point
        assert!((e.clone() * E.weil_pairing(Q, P, n)).is_one());
        assert!(E.weil_pairing(P, P, n).is_one());
        assert!(E.weil_pairing(P, &E.mul_u64(P, 3), n).is_one());
        assert!(E.weil_pairing(P, &E.infinity(), n).is_one());

        // Bilinear
        for k in [2u64, 3, 11] {
            let kP = E.mul_u64(P, k);
            let kQ = E.mul_u64(Q, k);
            let ek = e.pow(&BigUint::from(k));
            assert_eq!(E.weil_pairing(&kP, Q, n), ek);
            assert_eq!(E.weil_pairing(P, &kQ, n), ek);
        }
        let PQ = E.add(P, Q);
        assert_eq!(E.weil_pairing(&PQ, Q, n), e);
    }
}
