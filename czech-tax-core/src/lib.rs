pub mod calculations;
pub mod error;
pub mod models;
pub mod rules;

pub use error::TaxError;
pub use models::*;
