//! # docwatch-database
//!
//! PostgreSQL connection management and the expiry repositories for the
//! client, employee, and company document tables, plus an in-memory
//! repository used as a test fixture.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{
    ClientExpiryRepository, CompanyExpiryRepository, EmployeeExpiryRepository,
    MemoryExpiryRepository,
};
