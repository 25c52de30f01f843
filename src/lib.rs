//! Payroll-first employee records and payroll run ledger.
//!
//! This crate keeps employee records, computes monthly payroll with a flat
//! deduction rate, and records each approved month exactly once. Everything
//! is exposed over a JSON HTTP API.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;
