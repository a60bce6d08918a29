pub mod client;
pub mod error;
pub mod model;

pub use client::BirthdaysApi;
pub use error::BirthdaysError;
pub use model::{Birthday, BirthdayDetail, BirthdayForm, Congratulation, NewCongratulation};
