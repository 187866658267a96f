//! Integration fixtures for the canreg workspace
//!
//! Provides one complete device: a dictionary exercising every storage
//! mode and handler the engine supports, the matching metadata table, and
//! mock implementations of the hardware-facing traits.

pub mod device;
pub mod mocks;
