//! Output module for batch results
//!
//! This module handles:
//! - Recording the outcome of every place in a batch
//! - Printing the batch summary

mod report;

pub use report::{print_report, BatchReport, PlaceReport, PlaceStatus};
