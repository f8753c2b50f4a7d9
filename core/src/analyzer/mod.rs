//! Static analysis of parsed expressions: safety validation and
//! dependency extraction. Neither pass evaluates anything.

pub mod dependencies;
pub mod validator;


pub use dependencies::free_identifiers;
pub use validator::{ValidationError, validate};
