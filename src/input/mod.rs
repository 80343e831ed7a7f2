//! Input module for reading the source dataset
//!
//! The input is a CSV file whose first record is the header. Rows keep their
//! file order; a row's 0-based position is its identity for checkpointing.

mod dataset;

pub use dataset::{split_cell, InputDataset, InputRecord};
