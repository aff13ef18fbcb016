use thiserror::Error;

/// Contract violations raised by unit construction and the pure stat helpers.
///
/// Numeric degeneracy inside the simulation loop (zero rates, zero
/// denominators) is never an error; it is guarded inline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("morale must be in the range 0 to 100, got {0}")]
    OutOfRange(f64),

    #[error("unknown Lanchester law: '{0}'")]
    UnknownLaw(String),
}

pub type Result<T> = std::result::Result<T, BattleError>;
