//! Expiry repository implementations, one per document category.

pub mod client;
pub mod company;
pub mod document;
pub mod employee;
pub mod memory;

pub use client::ClientExpiryRepository;
pub use company::CompanyExpiryRepository;
pub use employee::EmployeeExpiryRepository;
pub use memory::MemoryExpiryRepository;
