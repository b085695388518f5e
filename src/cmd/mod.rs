//! Command handlers for the reprokit binary.

pub mod new;
pub mod organize;
pub mod ui;
pub mod util;
pub mod validate;
