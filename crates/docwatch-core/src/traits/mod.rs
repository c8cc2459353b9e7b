//! Ports consumed by the scan pipeline and implemented by other crates.

pub mod clock;
pub mod health;
pub mod mail;
pub mod repository;

pub use clock::{Clock, SystemClock};
pub use health::StoreHealth;
pub use mail::{MailMessage, MailSender};
pub use repository::ExpiryRepository;

#[cfg(any(test, feature = "mock"))]
pub use clock::FixedClock;
#[cfg(any(test, feature = "mock"))]
pub use health::MockStoreHealth;
#[cfg(any(test, feature = "mock"))]
pub use mail::MockMailSender;
#[cfg(any(test, feature = "mock"))]
pub use repository::MockExpiryRepository;
