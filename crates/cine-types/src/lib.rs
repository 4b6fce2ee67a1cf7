pub mod general;
pub mod validator;

pub use validator::{ValidationErrors, Validator};
