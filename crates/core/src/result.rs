//! Result type definition and extension traits.
//!
//! Provides combinators for Result types so callers can observe failures
//! without unwrap/expect/panic.

use crate::error::Error;

/// The standard Result type for Strata operations.
///
/// # Examples
///
/// ```ignore
/// fn master_address() -> Result<SocketAddr> {
///     let config = Configuration::load("strata.toml")?;
///     config.master_socket_addr()
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait providing combinators for Results.
pub trait ResultExt<T> {
    /// Inspect the error without consuming the Result.
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self;
}

impl<T> ResultExt<T> for Result<T> {
    fn inspect_error<F: FnOnce(&Error)>(self, f: F) -> Self {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}
