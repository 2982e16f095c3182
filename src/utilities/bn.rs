use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

/// Small primes used both for trial division and as Miller-Rabin witnesses.
const SMALL_PRIMES: [u64; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Number of Miller-Rabin rounds taken from `SMALL_PRIMES`. The first twelve
/// primes give a deterministic answer for all n < 3.3 * 10^24.
const MILLER_RABIN_ROUNDS: usize = 20;

/// Return `x^e` as a big integer.
pub fn prime_power_to_bn(x: u64, e: u32) -> BigUint {
    num_traits::pow(BigUint::from(x), e as usize)
}

/// Return the integer with factorisation `factorisation` = [(p_i, e_i)].
pub fn factorisation_to_bn(factorisation: &[(u64, u32)]) -> BigUint {
    factorisation
        .iter()
        .fold(BigUint::one(), |acc, &(p, e)| acc * prime_power_to_bn(p, e))
}

/// Variable time primality test for small integers.
pub fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Return the first `count` primes, in ascending order.
pub fn first_primes(count: usize) -> Vec<u64> {
    let mut primes = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&q| q * q <= candidate)
            .all(|&q| candidate % q != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Miller-Rabin probable prime test, with the first `MILLER_RABIN_ROUNDS`
/// primes as witnesses.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    if n < &two {
        return false;
    }
    for &q in SMALL_PRIMES.iter() {
        let q = BigUint::from(q);
        if n == &q {
            return true;
        }
        if (n % &q).is_zero() {
            return false;
        }
    }

    // Write n - 1 = d * 2^s with d odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for &a in SMALL_PRIMES.iter().take(MILLER_RABIN_ROUNDS) {
        let mut x = BigUint::from(a).modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Return the factorisation of `n` as [(p_i, e_i)] with ascending p_i when all
/// prime factors are at most `bound`, and `None` otherwise.
pub fn trial_factorisation(n: &BigUint, bound: u64) -> Option<Vec<(u64, u32)>> {
    if n.is_zero() {
        return None;
    }
    let mut rem = n.clone();
    let mut factors = Vec::new();
    let mut q = 2u64;
    while q <= bound && !rem.is_one() {
        let mut e = 0u32;
        loop {
            let (quo, r) = rem.div_rem(&BigUint::from(q));
            if !r.is_zero() {
                break;
            }
            rem = quo;
            e += 1;
        }
        if e > 0 {
            factors.push((q, e));
        }
        q += if q == 2 { 1 } else { 2 };
    }
    if rem.is_one() { Some(factors) } else { None }
}

/// Return a^-1 mod m, or `None` when gcd(a, m) != 1.
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    let a = BigInt::from_biguint(Sign::Plus, a % m);
    let m = BigInt::from_biguint(Sign::Plus, m.clone());
    let egcd = a.extended_gcd(&m);
    if !egcd.gcd.is_one() {
        return None;
    }
    egcd.x.mod_floor(&m).to_biguint()
}

/// Chinese remainder theorem: return the unique x mod prod(moduli) with
/// x = residues[i] mod moduli[i]. Moduli must be pairwise coprime.
pub fn crt(residues: &[BigUint], moduli: &[BigUint]) -> Option<BigUint> {
    if residues.len() != moduli.len() {
        return None;
    }
    let mut x = BigUint::zero();
    let mut m = BigUint::one();
    for (r, n) in residues.iter().zip(moduli.iter()) {
        // x + m * k = r mod n  =>  k = (r - x) * m^-1 mod n
        let m_inv = mod_inverse(&m, n)?;
        let x_mod = &x % n;
        let r_mod = r % n;
        let diff = (r_mod + n - x_mod) % n;
        let k = (diff * m_inv) % n;
        x += &m * k;
        m *= n;
    }
    Some(x % m)
}

/// Sample an integer uniformly from [0, bound) by rejection sampling.
/// Returns zero for `bound` = 0.
pub fn random_below<R: CryptoRng + RngCore>(rng: &mut R, bound: &BigUint) -> BigUint {
    if bound.is_zero() {
        return BigUint::zero();
    }
    let bits = bound.bits();
    let nbytes = bits.div_ceil(8) as usize;
    let excess = (nbytes as u64) * 8 - bits;
    let mut buf = vec![0u8; nbytes];
    loop {
        rng.fill_bytes(&mut buf);
        // Big endian, so the excess bits live in the first byte
        buf[0] &= 0xffu8 >> excess;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}
