//! # Envelope Module
//!
//! Parsing of RockBLOCK relay email bodies.
//!
//! This module handles:
//! - Extracting `Name: value` fields from free text
//! - Converting numeric envelope fields
//! - Describing the Iridium session status
//! - Combining the envelope with the decoded frame into one record

pub mod extractor;
pub mod record;
pub mod session;
