//! Test helpers module
//!
//! This module provides utilities and helpers for testing the UserEvents API.
//! It includes in-memory service fakes, a router harness, database helpers and
//! test data.

#![allow(dead_code)]

pub mod database_helper;
pub mod fakes;
pub mod test_context;
pub mod test_data;

pub use database_helper::*;
pub use fakes::*;
pub use test_context::*;
pub use test_data::*;
