//! Common utilities for the flowbox layout engine.
//!
//! This crate provides shared infrastructure used by the engine and its drivers:
//! - **Warning System** - de-duplicated warnings for degraded layout behavior
//! - **Image Dimensions** - intrinsic sizes consumed by replaced boxes

pub mod image;
pub mod warning;
