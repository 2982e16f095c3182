#![allow(non_snake_case)]

mod benchmark_msidh {
    use criterion::{Criterion, black_box, criterion_group};
    use msidh::protocols::Role;
    use msidh::protocols::msidh::Msidh;
    use msidh::protocols::parameters::{MsidhParameters, TersidhParameters};
    use msidh::protocols::tersidh::Tersidh;
    use msidh::utilities::drng::DRNG;
    use std::time::Duration;

    fn bench_msidh_keygen(c: &mut Criterion) {
        for t in [4, 6] {
            let params = MsidhParameters::generate(t).unwrap();
            let E0 = params.starting_curve().unwrap();
            let mut rng = DRNG::from_seed("bench_msidh_keygen".as_bytes());
            let bob = Msidh::new(&params, &E0, None, None, None, Role::Bob, &mut rng).unwrap();

            let bench_id = format!("Benchmarking MSIDH keygen with t = {t}");
            c.bench_function(&bench_id, |b| {
                b.iter(|| {
                    let mut alice =
                        Msidh::new(&params, &E0, None, None, None, Role::Alice, &mut rng).unwrap();
                    alice.generate_public_key(black_box(bob.basis())).unwrap()
                })
            });
        }
    }

    fn bench_msidh_exchange(c: &mut Criterion) {
        for t in [4, 6] {
            let params = MsidhParameters::generate(t).unwrap();
            let E0 = params.starting_curve().unwrap();
            let mut rng = DRNG::from_seed("bench_msidh_exchange".as_bytes());
            let mut alice =
                Msidh::new(&params, &E0, None, None, None, Role::Alice, &mut rng).unwrap();
            let mut bob = Msidh::new(&params, &E0, None, None, None, Role::Bob, &mut rng).unwrap();
            alice.generate_public_key(bob.basis()).unwrap();
            let pk_bob = bob.generate_public_key(alice.basis()).unwrap();

            let bench_id = format!("Benchmarking MSIDH shared secret with t = {t}");
            c.bench_function(&bench_id, |b| {
                b.iter(|| {
                    alice.reset();
                    alice.key_exchange(black_box(&pk_bob)).unwrap()
                })
            });
        }
    }

    fn bench_tersidh_exchange(c: &mut Criterion) {
        let params = TersidhParameters::generate(3).unwrap();
        let E0 = params.starting_curve().unwrap();
        let mut rng = DRNG::from_seed("bench_tersidh_exchange".as_bytes());
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
        alice.prepare_public_key().unwrap();
        let pk_bob = bob.prepare_public_key().unwrap();

        let bench_id = "Benchmarking TerSIDH shared secret with t = 3".to_string();
        c.bench_function(&bench_id, |b| {
            b.iter(|| {
                alice.reset();
                alice.key_exchange(black_box(&pk_bob)).unwrap()
            })
        });
    }

    criterion_group! {
        name = benchmark_msidh;
        config = Criterion::default().measurement_time(Duration::from_secs(10));
        targets = bench_msidh_keygen, bench_msidh_exchange, bench_tersidh_exchange
    }
}

fn main() {
    benchmark_msidh::benchmark_msidh();
}
