use num_bigint::BigUint;
use num_traits::One;
use rand_core::{CryptoRng, RngCore};

use crate::error::{IsogenyError, Result};
use crate::utilities::{bn::crt, prime_product::PrimeProduct};

/// Sample m with m^2 = 1 mod B, by choosing m = +1 or -1 independently and
/// uniformly modulo each prime power factor of B and recombining with the CRT.
///
/// For squarefree B this is uniform over all 2^k square roots of unity. For
/// non-squarefree B only the roots that are +-1 modulo every prime power are
/// reachable; modulo 8 for instance 3 and 5 are never returned.
pub fn sample_quadratic_root_of_unity<R: CryptoRng + RngCore>(
    modulus: &PrimeProduct,
    rng: &mut R,
) -> Result<BigUint> {
    let moduli = modulus.prime_powers();
    let residues: Vec<BigUint> = moduli
        .iter()
        .map(|n| {
            if rng.next_u32() & 1 == 1 {
                n - 1u32
            } else {
                BigUint::one()
            }
        })
        .collect();

    crt(&residues, &moduli).ok_or_else(|| {
        IsogenyError::InvalidParameter(format!(
            "prime power factors of {} are not pairwise coprime",
            modulus.value()
        ))
    })
}

/// Return true if m^2 = 1 mod B and 0 < m < B.
pub fn is_quadratic_root_of_unity(m: &BigUint, modulus: &PrimeProduct) -> bool {
    let B = modulus.value();
    m < B && (m * m % B).is_one()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utilities::drng::DRNG;

    #[test]
    fn test_root_of_unity_for_prime_four() {
        let four = PrimeProduct::from_prime_powers(&[4]).unwrap();
        let mut rng = DRNG::from_seed(b"mask_four");
        for _ in 0..10 {
            let m = sample_quadratic_root_of_unity(&four, &mut rng).unwrap();
            assert!(m == BigUint::from(1u32) || m == BigUint::from(3u32));
        }
    }
}
