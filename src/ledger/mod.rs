//! The balance engine that owns the global transaction order.

pub mod forecast;

pub use forecast::Forecast;
