pub mod error;
pub mod observation;
pub mod observation_table;
