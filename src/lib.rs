//! Top-k queries over multi-attribute datasets, with three strategies
//! (sequential scan, Fagin's algorithm and the threshold algorithm) whose
//! costs can be compared.

pub mod base;
pub mod config;
pub mod cost;
pub mod data;
pub mod error;
pub mod generate;
pub mod normalize;
pub mod score;
pub mod search;
pub mod session;
pub mod sorted;

pub use error::{Error, Result};
