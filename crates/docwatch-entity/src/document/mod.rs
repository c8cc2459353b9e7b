//! Expiring documents and the entities that own them.

pub mod candidate;
pub mod parent;

pub use candidate::ExpiryCandidate;
pub use parent::ParentEntity;
