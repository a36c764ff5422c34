//! # spelunk-error
//!
//! One error type shared by every spelunk crate. An [`Error`] carries:
//!
//! - an [`ErrorKind`] saying what went wrong,
//! - the operation that failed (`"snapshot::from_path"`, `"render::exit"`),
//! - key/value context such as the offending path or exit code,
//! - optionally the underlying error it wraps.
//!
//! ```rust
//! use spelunk_error::{Error, ErrorKind};
//!
//! fn load() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::InvalidFormat, "expected an object")
//!         .with_operation("snapshot::load")
//!         .with_context("path", "registry.json"))
//! }
//! assert_eq!(load().unwrap_err().kind(), ErrorKind::InvalidFormat);
//! ```
//!
//! Foreign errors are attached with [`Error::set_source`]; only
//! `std::io::Error` converts implicitly.

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

pub type Result<T> = std::result::Result<T, Error>;
