//! Mail capability implementations.

pub mod graph;

pub use graph::GraphMailSender;
