pub mod coordinate_sampler;
pub mod error;
