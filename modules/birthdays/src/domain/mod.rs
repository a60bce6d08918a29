pub mod countdown;
pub mod error;
pub mod form;
pub mod guards;
pub mod ports;
pub mod repo;
pub mod service;
