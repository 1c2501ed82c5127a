pub mod aggregations;
pub mod error;
pub mod horizon;
