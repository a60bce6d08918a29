// === PUBLIC CONTRACT ===
// Other modules consume birthdays through `contract` only.
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::{Birthdays, MODULE_NAME};

// === INTERNAL MODULES ===
// Exposed for tests and the server binary; not a stable API.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;

pub use config::BirthdaysConfig;
