pub mod collector;
pub mod error;
pub mod open_weather;
