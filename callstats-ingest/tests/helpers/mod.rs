//! Test helper utilities
//!
//! Shared fixtures for callstats-ingest integration tests

#![allow(dead_code)]

pub mod env;
pub mod xlsx;

pub use env::{stored_row_counts, test_env, TestEnv};
pub use xlsx::{
    months_ending, report_sheets, report_workbook, summary_values, voc_values, write_xlsx,
    write_xlsx_with, Cell, DateStyle, Grid,
};
