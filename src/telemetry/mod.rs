//! # Telemetry Output Module
//!
//! Renders decoded records for the logging and export collaborators.
//!
//! This module handles:
//! - Multi-line text reports (`Display` for frames and envelope records)
//! - Formatting as JSONL (JSON Lines)

pub mod jsonl;
pub mod report;
