//! Type definitions for paddock

mod error;
mod models;

pub use error::*;
pub use models::*;
