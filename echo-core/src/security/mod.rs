/// Security module for scan input validation

pub mod validation;

pub use validation::{validate_input, ValidationError};
