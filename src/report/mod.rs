pub mod error;
pub mod plot;
pub mod regression;
pub mod reporter;
