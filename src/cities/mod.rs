pub mod error;
pub mod locate_city;
pub mod resolve;
