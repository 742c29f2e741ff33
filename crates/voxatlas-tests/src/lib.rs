//! voxatlas End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the full compilation
//! pipeline:
//!
//! - Compilation: material tree + mapping -> atlases and palette
//! - Validation: palette entries, flags, layer assignment, error markers
//! - **Determinism**: byte-identical artifacts across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p voxatlas-tests
//! ```

pub mod fixtures;
