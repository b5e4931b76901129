//! Domain layer for naming-guard
//!
//! Pure data model for violations, reports and errors. Nothing in here touches
//! the file system.

pub mod violations;

pub use violations::*;
