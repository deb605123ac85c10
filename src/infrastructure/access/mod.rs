//! Access checker implementations

mod factory;
mod fixed;
mod http;

pub use factory::AccessCheckerFactory;
pub use fixed::FixedAccessChecker;
pub use http::{HttpAccessChecker, DEFAULT_SERVICE_NAME};
