pub mod shutdown;

pub use shutdown::wait_for_shutdown;
