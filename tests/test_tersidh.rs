#![allow(non_snake_case)]

#[cfg(test)]
mod test_tersidh {
    use msidh::elliptic::curve::Curve;
    use msidh::error::IsogenyError;
    use msidh::fields::fp2::Fp2;
    use msidh::protocols::parameters::TersidhParameters;
    use msidh::protocols::public_key::PublicKey;
    use msidh::protocols::tersidh::{
        TernarySecret, Tersidh, generate_kernel_coeffs, int_to_ternary, ternary_to_int,
    };
    use msidh::protocols::{Role, SessionStatus};
    use msidh::utilities::drng::DRNG;
    use num_bigint::BigUint;

    fn exchange(
        params: &TersidhParameters,
        alice_secret: Option<TernarySecret>,
        bob_secret: Option<TernarySecret>,
        rng: &mut DRNG,
    ) -> (Fp2, Fp2) {
        let E0 = params.starting_curve().unwrap();
        let mut alice = Tersidh::new(params, &E0, None, alice_secret, Role::Alice, rng).unwrap();
        let mut bob = Tersidh::new(
            params,
            &E0,
            Some(alice.basis().clone()),
            bob_secret,
            Role::Bob,
            rng,
        )
        .unwrap();

        let pk_alice = alice.prepare_public_key().unwrap();
        let pk_bob = bob.prepare_public_key().unwrap();

        let ss_alice = alice.key_exchange(&pk_bob).unwrap();
        let ss_bob = bob.key_exchange(&pk_alice).unwrap();
        (ss_alice, ss_bob)
    }

    #[test]
    fn test_parameters() {
        let params = TersidhParameters::generate(2).unwrap();
        assert_eq!(params.p, BigUint::from(419u32));
        assert_eq!(params.A.value(), &BigUint::from(20u32));
        assert_eq!(params.B.value(), &BigUint::from(21u32));
        assert_eq!(params.f, 1);
        assert_eq!(params.alice_primes(), vec![4, 5]);
        assert_eq!(params.bob_primes(), vec![3, 7]);

        let params = TersidhParameters::generate(3).unwrap();
        assert_eq!(params.p, BigUint::from(180179u32));
        assert_eq!(params.f, 3);
        assert_eq!(params.alice_primes(), vec![4, 5, 11]);
        assert_eq!(params.bob_primes(), vec![3, 7, 13]);
        assert_eq!(
            params.full_order().unwrap().value(),
            &BigUint::from(180180u32)
        );
    }

    #[test]
    fn test_ternary_round_trip() {
        for s in 0u32..81 {
            let s = BigUint::from(s);
            let digits = int_to_ternary(&s, 4).unwrap();
            assert_eq!(digits.len(), 4);
            assert_eq!(ternary_to_int(&digits).unwrap(), s);
        }
        assert_eq!(int_to_ternary(&BigUint::from(5u32), 3).unwrap(), vec![0, 1, 2]);

        assert!(matches!(
            ternary_to_int(&[]),
            Err(IsogenyError::MalformedSecret(_))
        ));
        assert!(matches!(
            int_to_ternary(&BigUint::from(27u32), 3),
            Err(IsogenyError::MalformedSecret(_))
        ));
    }

    #[test]
    fn test_kernel_coefficients() {
        let primes = [4u64, 5, 11];
        let degree = BigUint::from(220u32);
        for s in 0u32..27 {
            let digits = int_to_ternary(&BigUint::from(s), 3).unwrap();
            let coeffs = generate_kernel_coeffs(&digits, &primes).unwrap();
            assert_eq!(&coeffs.cP * coeffs.nP.value(), degree);
            assert_eq!(&coeffs.cQ * coeffs.nQ.value(), degree);
        }

        // All digits 2 gives trivial kernels
        let coeffs = generate_kernel_coeffs(&[2, 2, 2], &primes).unwrap();
        assert!(coeffs.nP.is_one());
        assert!(coeffs.nQ.is_one());

        assert!(matches!(
            generate_kernel_coeffs(&[0, 1], &primes),
            Err(IsogenyError::MalformedSecret(_))
        ));
        assert!(matches!(
            generate_kernel_coeffs(&[0, 1, 3], &primes),
            Err(IsogenyError::MalformedSecret(_))
        ));
    }

    #[test]
    fn test_key_exchange_t2() {
        let params = TersidhParameters::generate(2).unwrap();
        let mut rng = DRNG::from_seed("test_key_exchange_t2".as_bytes());
        for _ in 0..10 {
            let (ss_alice, ss_bob) = exchange(&params, None, None, &mut rng);
            assert_eq!(ss_alice, ss_bob);
        }
    }

    #[test]
    fn test_key_exchange_t3() {
        let params = TersidhParameters::generate(3).unwrap();
        let mut rng = DRNG::from_seed("test_key_exchange_t3".as_bytes());
        for _ in 0..3 {
            let (ss_alice, ss_bob) = exchange(&params, None, None, &mut rng);
            assert_eq!(ss_alice, ss_bob);
        }
    }

    #[test]
    fn test_every_secret_pair_t2() {
        let params = TersidhParameters::generate(2).unwrap();
        let mut rng = DRNG::from_seed("test_every_secret_pair_t2".as_bytes());
        for a in 0u32..9 {
            for b in [0u32, 4, 8] {
                let (ss_alice, ss_bob) = exchange(
                    &params,
                    Some(TernarySecret::Integer(BigUint::from(a))),
                    Some(TernarySecret::Digits(
                        int_to_ternary(&BigUint::from(b), 2).unwrap(),
                    )),
                    &mut rng,
                );
                assert_eq!(ss_alice, ss_bob);
            }
        }
    }

    #[test]
    fn test_supplied_secret() {
        let params = TersidhParameters::generate(2).unwrap();
        let E0 = params.starting_curve().unwrap();
        let mut rng = DRNG::from_seed("test_supplied_secret".as_bytes());

        // Digit 1 pairs 4 with K_Q, digit 0 pairs 5 with K_P
        let alice = Tersidh::new(
            &params,
            &E0,
            None,
            Some(TernarySecret::Digits(vec![0, 1])),
            Role::Alice,
            &mut rng,
        )
        .unwrap();
        assert_eq!(alice.secret(), &BigUint::from(1u32));
        assert_eq!(alice.secret_digits(), &[0, 1]);
        assert_eq!(alice.status(), SessionStatus::KernelComputed);

        let coeffs = alice.kernel_coefficients();
        assert_eq!(coeffs.nP.value(), &BigUint::from(5u32));
        assert_eq!(coeffs.cP, BigUint::from(4u32));
        assert_eq!(coeffs.nQ.value(), &BigUint::from(4u32));
        assert_eq!(coeffs.cQ, BigUint::from(5u32));

        let (KP, KQ) = alice.kernel_points();
        assert!(E0.has_exact_order(&KP, &coeffs.nP));
        assert!(E0.has_exact_order(&KQ, &coeffs.nQ));

        // The same secret as an integer
        let again = Tersidh::new(
            &params,
            &E0,
            Some(alice.basis().clone()),
            Some(TernarySecret::Integer(BigUint::from(1u32))),
            Role::Alice,
            &mut rng,
        )
        .unwrap();
        assert_eq!(again.kernel_coefficients(), coeffs);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let params = TersidhParameters::generate(2).unwrap();
        let E0 = params.starting_curve().unwrap();
        let mut rng = DRNG::from_seed("test_tersidh_rejects".as_bytes());

        for secret in [
            TernarySecret::Digits(vec![0, 1, 2]),
            TernarySecret::Digits(vec![0, 3]),
            TernarySecret::Integer(BigUint::from(9u32)),
        ] {
            let result = Tersidh::new(&params, &E0, None, Some(secret), Role::Alice, &mut rng);
            assert!(matches!(result, Err(IsogenyError::MalformedSecret(_))));
        }

        // Right field, but not a supersingular curve
        let E3 = Curve::new(&E0.A.field().from_i64(3)).unwrap();
        let result = Tersidh::new(&params, &E3, None, None, Role::Alice, &mut rng);
        assert!(matches!(result, Err(IsogenyError::InvalidParameter(_))));

        // A basis of E0[20] is not a basis of the full torsion
        let alice = Tersidh::new(&params, &E0, None, None, Role::Alice, &mut rng).unwrap();
        let sub = alice.basis().subgroup(&E0, &params.A).unwrap();
        let result = Tersidh::new(&params, &E0, Some(sub), None, Role::Bob, &mut rng);
        assert!(matches!(result, Err(IsogenyError::InvalidBasis(_))));
    }

    #[test]
    fn test_rejects_dependent_public_key() {
        let params = TersidhParameters::generate(2).unwrap();
        let E0 = params.starting_curve().unwrap();
        let mut rng = DRNG::from_seed("test_rejects_dependent_public_key".as_bytes());

        let mut alice = Tersidh::new(&params, &E0, None, None, Role::Alice, &mut rng).unwrap();
        let mut bob = Tersidh::new(
            &params,
            &E0,
            Some(alice.basis().clone()),
            None,
            Role::Bob,
            &mut rng,
        )
        .unwrap();
        let pk_bob = bob.prepare_public_key().unwrap();
        assert_eq!(bob.status(), SessionStatus::PublicKeyReady);

        let E = pk_bob.curve.clone();
        let dependent = PublicKey {
            curve: E.clone(),
            P: pk_bob.P.clone(),
            Q: E.mul_u64(&pk_bob.P, 3),
        };
        assert!(matches!(
            alice.key_exchange(&dependent),
            Err(IsogenyError::InvalidPublicKey(_))
        ));
        assert_eq!(alice.status(), SessionStatus::KernelComputed);

        let ss = alice.key_exchange(&pk_bob).unwrap();
        assert_eq!(alice.status(), SessionStatus::KeyExchanged);
        assert!(matches!(
            alice.prepare_public_key(),
            Err(IsogenyError::InvalidParameter(_))
        ));
        alice.reset();
        assert_eq!(alice.key_exchange(&pk_bob).unwrap(), ss);
    }
}
