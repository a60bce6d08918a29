pub mod clock;
pub mod notifier;

pub use clock::{Clock, SystemClock};
pub use notifier::{Notification, Notifier};
