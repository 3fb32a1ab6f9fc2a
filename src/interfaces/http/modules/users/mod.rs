//! Users module: demo user lookup

pub mod handlers;

pub use handlers::*;
