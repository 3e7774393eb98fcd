pub mod price_models;

pub use price_models::*;
