// Domain layer - Core data models
pub mod analysis;
pub mod benchmark;
pub mod error;
pub mod observation;
