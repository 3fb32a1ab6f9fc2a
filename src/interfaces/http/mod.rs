//! HTTP interfaces
//!
//! - `modules`: handlers grouped by resource, plus the request metrics middleware
//! - `common`: shared response types
//! - `router`: application router

pub mod common;
pub mod modules;
pub mod router;

pub use router::create_api_router;
