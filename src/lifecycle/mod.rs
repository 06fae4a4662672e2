//! Start-up, wiring and shutdown of the storefront's actors.

pub mod storefront;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use storefront::Storefront;
