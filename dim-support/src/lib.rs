//! # Dim Support
//!
//! Shared utilities for the Dim crates.
//!
//! This crate provides:
//! - Type-name shortening for error messages
//! - "Did you mean?" suggestions for unknown type and service names

pub mod rendering;
