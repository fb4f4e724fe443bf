//! # RockBLOCK Payload Module
//!
//! Decoding of the binary balloon frame carried in the `Data` field of a
//! RockBLOCK relay email.
//!
//! This module handles:
//! - Hex text to byte conversion
//! - Fixed-offset frame decoding (header, serial, UTC time, GPS, altitude)
//! - Analog channel calibration
//! - Modem status descriptions

pub mod protocol;
pub mod hex;
pub mod calibration;
pub mod status;
pub mod decoder;
