use thiserror::Error;

#[derive(Error, Debug)]
pub enum SieveError {
    #[error("bad gap({gap}): {reason}")]
    InvalidGap { gap: u64, reason: &'static str },
    #[error("bad limit({limit}): must be positive")]
    InvalidLimit { limit: u64 },
    #[error("bad bit length({bits}): must lie in (0, 100000]")]
    InvalidBitLength { bits: f64 },
    #[error("estimated sieve limit {limit:e} is not usable")]
    UnusableLimit { limit: f64 },
    #[error("gap({gap}) exceeds the maximum of {max}")]
    GapTooLarge { gap: u64, max: u64 },
    #[error("window of {len} entries needs {bytes} bytes, above the maximum of {max}")]
    MarksTooLarge { len: u64, bytes: u64, max: u64 },
    #[error("limit({limit}) exceeds the maximum of {max}")]
    LimitTooLarge { limit: u64, max: u64 },
    #[error("bad start({0:?}): expected a non-negative decimal integer")]
    MalformedAnchor(String),
    #[error("start is negative: {0}")]
    NegativeAnchor(String),
    #[error("P({0}) not prime")]
    NotPrime(u64),
    #[error("d({d}) does not divide {p}#")]
    NonDividingDivisor { d: u64, p: u64 },
    #[error("invalid {field}={value}: expected {expected}")]
    OutOfRange {
        field: &'static str,
        value: i128,
        expected: String,
    },
    #[error("cannot parse {0:?} as m * P# / d + a")]
    MalformedForm(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}
