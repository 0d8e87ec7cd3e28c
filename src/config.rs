use core::fmt::{Display, Formatter};
use core::str::FromStr;

use serde::Deserialize;

use crate::error::SieveError;
use crate::traits::PrimeSource;
use crate::{EratosthenesPrimes, SegmentedPrimes};

/// Largest window length accepted by default.
pub const DEFAULT_MAX_GAP: u64 = 1 << 32;

/// Default ceiling on the size of one marking array. Flags for [`DEFAULT_MAX_GAP`] fit in 512 MiB;
/// the factor variant, at 8 bytes per entry, is held to `2^29` entries.
pub const DEFAULT_MAX_MARKS_BYTES: u64 = 1 << 32;

/// Largest sieve limit accepted by default.
pub const DEFAULT_MAX_LIMIT: u64 = 50_000_000_000;

/// Hard ceiling on any configured limit; `3 * limit` must fit in a `u64` for residue arithmetic.
pub const ABSOLUTE_MAX_LIMIT: u64 = u64::MAX / 4;

/// Selects the [`PrimeSource`] implementation the interval sieve consumes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimeSourceKind {
    /// [`SegmentedPrimes`], a cache-blocked segmented sieve.
    #[default]
    Segmented,
    /// [`EratosthenesPrimes`], a plain sieve regenerated with a doubling bound.
    Eratosthenes,
}

impl PrimeSourceKind {
    /// Construct a fresh cursor positioned before 2.
    #[must_use]
    pub fn build(self) -> Box<dyn PrimeSource> {
        match self {
            PrimeSourceKind::Segmented => Box::new(SegmentedPrimes::new()),
            PrimeSourceKind::Eratosthenes => Box::new(EratosthenesPrimes::new()),
        }
    }
}

impl FromStr for PrimeSourceKind {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "segmented" => Ok(PrimeSourceKind::Segmented),
            "eratosthenes" => Ok(PrimeSourceKind::Eratosthenes),
            other => Err(SieveError::InvalidConfig(format!(
                "unknown prime source {:?}, expected \"segmented\" or \"eratosthenes\"",
                other
            ))),
        }
    }
}

impl Display for PrimeSourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PrimeSourceKind::Segmented => write!(f, "segmented"),
            PrimeSourceKind::Eratosthenes => write!(f, "eratosthenes"),
        }
    }
}

/// Resource ceilings and generator choice for [`IntervalSieve`](crate::IntervalSieve).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SieveConfig {
    /// Largest accepted `gap`; the marking array has `gap + 1` entries.
    pub max_gap: u64,
    /// Largest accepted sieve limit.
    pub max_limit: u64,
    /// Largest marking array, in bytes, a single sieve call may allocate.
    pub max_marks_bytes: u64,
    pub prime_source: PrimeSourceKind,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            max_gap: DEFAULT_MAX_GAP,
            max_limit: DEFAULT_MAX_LIMIT,
            max_marks_bytes: DEFAULT_MAX_MARKS_BYTES,
            prime_source: PrimeSourceKind::default(),
        }
    }
}

impl SieveConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, SieveError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SieveError> {
        if self.max_limit == 0 || self.max_limit > ABSOLUTE_MAX_LIMIT {
            return Err(SieveError::InvalidConfig(format!(
                "max_limit must lie in [1, {}], got {}",
                ABSOLUTE_MAX_LIMIT, self.max_limit
            )));
        }
        if usize::try_from(self.max_gap).map_or(true, |gap| gap == usize::MAX) {
            return Err(SieveError::InvalidConfig(format!(
                "max_gap {} does not fit the address space",
                self.max_gap
            )));
        }
        if self.max_marks_bytes == 0 {
            return Err(SieveError::InvalidConfig(
                "max_marks_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
