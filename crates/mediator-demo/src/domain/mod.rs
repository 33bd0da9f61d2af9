pub mod commands;
pub mod notifications;
pub mod queries;
pub mod validation;

pub use validation::{Validate, ValidationError};
