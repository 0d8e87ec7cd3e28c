/// Primality by trial division, for the machine-sized parameters of a search (never the anchor).
pub struct TrialDivision;

impl TrialDivision {
    #[must_use]
    pub fn is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        if n % 2 == 0 {
            return n == 2;
        }

        let mut divisor = 3u64;
        while divisor.saturating_mul(divisor) <= n {
            if n % divisor == 0 {
                return false;
            }
            divisor += 2;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{SieveOfEratosthenes, TrialDivision};

    #[test]
    fn is_prime() {
        assert!(!TrialDivision::is_prime(0));
        assert!(!TrialDivision::is_prime(1));
        assert!(TrialDivision::is_prime(2));
        assert!(TrialDivision::is_prime(3));
        assert!(!TrialDivision::is_prime(4));
        assert!(TrialDivision::is_prime(5));
        assert!(!TrialDivision::is_prime(6));
        assert!(TrialDivision::is_prime(7));
        assert!(!TrialDivision::is_prime(8));
        assert!(!TrialDivision::is_prime(9));
        assert!(TrialDivision::is_prime(10709));
        assert!(!TrialDivision::is_prime(10707));
        assert!(TrialDivision::is_prime(4_294_967_291));
    }

    #[test]
    fn agrees_with_eratosthenes() {
        let primes = SieveOfEratosthenes::generate(5000);
        let by_trial: Vec<usize> = (0..5000).filter(|&n| TrialDivision::is_prime(n as u64)).collect();
        assert_eq!(by_trial, primes);
    }
}
