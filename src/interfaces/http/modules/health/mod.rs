//! Health module: liveness endpoint

pub mod handlers;

pub use handlers::*;
