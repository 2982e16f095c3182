use num_bigint::BigUint;
use thiserror::Error;

/// Errors raised by curve arithmetic, isogeny evaluation and the key
/// exchange protocols.
#[derive(Error, Debug)]
pub enum IsogenyError {
    #[error("invalid isogeny kernel: {0}")]
    InvalidKernel(String),

    #[error("invalid torsion basis: {0}")]
    InvalidBasis(String),

    #[error("no prime of the form f*A*B - 1 with 1 <= f < {max_cofactor} for t = {t}")]
    ParameterSearchExhausted { t: usize, max_cofactor: u64 },

    #[error("malformed secret: {0}")]
    MalformedSecret(String),

    #[error("singular Montgomery curve with A = {0}")]
    SingularCurve(String),

    #[error("field characteristic {found} does not match the protocol prime {expected}")]
    CharacteristicMismatch { expected: BigUint, found: BigUint },

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("cannot parse field element '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("malformed bench task file: {0}")]
    BenchFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IsogenyError>;
