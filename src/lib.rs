//! # RockBLOCK Telemetry Library
//!
//! Decode RockBLOCK relay emails into calibrated balloon telemetry records.
//!
//! The pipeline is pure and synchronous: an email body goes in, an
//! [`envelope::record::EnvelopeRecord`] with its decoded
//! [`rockblock::protocol::TelemetryFrame`] and validity flags comes out.
//! Mail retrieval, polling and export are left to the caller.
//!
//! ```
//! use rockblock_telemetry::envelope::record::EnvelopeParser;
//!
//! let body = format!("IMEI: 300434063929450\nMOMSN: 12\nData: 5242{}\n", "00".repeat(48));
//! let record = EnvelopeParser::default().parse(&body);
//! assert!(record.is_valid);
//! assert_eq!(record.payload.header, "RB");
//! ```

pub mod config;
pub mod error;
pub mod envelope;
pub mod rockblock;
pub mod telemetry;
