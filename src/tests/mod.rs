//! tests/mod.rs
mod config_tests;
mod operation_tests;
mod similarity_tests;
