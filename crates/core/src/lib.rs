//! # Strata Core
//!
//! Errors, configuration and the small value objects shared by the master
//! tooling and workers.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod clock;
pub mod config;
pub mod error;
pub mod mount_options;
pub mod read_type;
pub mod result;

pub use config::{Configuration, RetryConfig};
pub use error::Error;
pub use mount_options::{MountOptions, MountWireOptions};
pub use read_type::{ReadType, StorageType};
pub use result::{Result, ResultExt};
