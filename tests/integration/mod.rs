//! Integration tests for the product catalog
//!
//! These tests drive the full router against a real SQLite database.

mod api_tests;
mod store_tests;
