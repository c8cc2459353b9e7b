//! # docwatch-core
//!
//! Core crate for DocWatch. Contains the ports the scan pipeline consumes
//! (expiry repository, mail sender, clock), configuration schemas, and the
//! unified error system.
//!
//! The only internal dependency is `docwatch-entity`, whose models appear in
//! the port signatures.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
