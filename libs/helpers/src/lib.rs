pub mod dataset;
pub mod ranking;
