use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the dose simulation core.
///
/// Numeric inputs are deliberately not validated here: bad radii, zero
/// resolution and the like flow through as degenerate numbers instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Beam type token did not start with `c` or `g`.
    #[error("Beam type must be c/g")]
    UnknownBeamType(String),

    /// Failure while writing the dose dump.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
