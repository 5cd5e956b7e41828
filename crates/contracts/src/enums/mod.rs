pub mod metric;
pub mod region;
