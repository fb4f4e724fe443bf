//! # Envelope Record Parsing
//!
//! Builds an [`EnvelopeRecord`] from a relay email body: envelope metadata
//! plus the decoded frame from the `Data` field.

use serde::Serialize;
use std::str::FromStr;
use tracing::{error, info, warn};

use super::extractor::extract_field;
use super::session::describe_session_status;
use crate::error::{Result, TelemetryError};
use crate::rockblock::decoder::FrameDecoder;
use crate::rockblock::protocol::TelemetryFrame;

pub const FIELD_IMEI: &str = "IMEI";
pub const FIELD_MOMSN: &str = "MOMSN";
pub const FIELD_TRANSMIT_TIME: &str = "Transmit Time";
pub const FIELD_IRIDIUM_LATITUDE: &str = "Iridium Latitude";
pub const FIELD_IRIDIUM_LONGITUDE: &str = "Iridium Longitude";
pub const FIELD_IRIDIUM_CEP: &str = "Iridium CEP";
pub const FIELD_SESSION_STATUS: &str = "Iridium Session Status";
pub const FIELD_DATA: &str = "Data";

/// Email envelope metadata with the embedded frame
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnvelopeRecord {
    pub imei: String,

    /// Mobile-originated message sequence number
    pub momsn: i32,

    /// Relay timestamp as sent, without the `UTC` suffix
    pub transmit_time: String,

    /// Relay-estimated position in decimal degrees
    pub iridium_latitude: f64,
    pub iridium_longitude: f64,

    /// Circular error probable of the relay position, in km
    pub iridium_cep: f64,

    pub session_status: i32,
    pub session_status_description: String,

    /// Raw hex payload from the `Data` field
    pub hex_data: String,

    pub payload: TelemetryFrame,

    /// IMEI and payload are both present
    pub is_valid: bool,
}

impl EnvelopeRecord {
    /// Both the envelope and its frame are usable
    pub fn is_usable(&self) -> bool {
        self.is_valid && self.payload.is_valid
    }
}

/// Parses relay email bodies into records
#[derive(Debug, Clone, Default)]
pub struct EnvelopeParser {
    decoder: FrameDecoder,
}

impl EnvelopeParser {
    #[must_use]
    pub fn new(decoder: FrameDecoder) -> Self {
        Self { decoder }
    }

    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Parse an email body
    ///
    /// A malformed numeric field yields a default record with
    /// `is_valid == false`; nothing is partially applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockblock_telemetry::envelope::record::EnvelopeParser;
    ///
    /// let parser = EnvelopeParser::default();
    /// let record = parser.parse("IMEI: 300434063929450\nMOMSN: 7\nData: 5242\n");
    /// assert!(record.is_valid);
    /// assert_eq!(record.momsn, 7);
    /// assert!(!record.payload.is_valid); // 2 bytes is not a full frame
    ///
    /// let broken = parser.parse("IMEI: 300434063929450\nMOMSN: seven\nData: 5242\n");
    /// assert!(!broken.is_valid);
    /// ```
    pub fn parse(&self, body: &str) -> EnvelopeRecord {
        match self.try_parse(body) {
            Ok(record) => record,
            Err(e) => {
                error!("Error parsing email: {}", e);
                EnvelopeRecord::default()
            }
        }
    }

    /// Parse an email body
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidInteger`] or
    /// [`TelemetryError::InvalidFloat`] when a numeric field is present but
    /// malformed. Absent fields default to zero or empty.
    pub fn try_parse(&self, body: &str) -> Result<EnvelopeRecord> {
        let imei = extract_field(body, FIELD_IMEI);
        let momsn = parse_int(body, FIELD_MOMSN)?;
        let transmit_time = extract_field(body, FIELD_TRANSMIT_TIME);
        let iridium_latitude = parse_float(body, FIELD_IRIDIUM_LATITUDE)?;
        let iridium_longitude = parse_float(body, FIELD_IRIDIUM_LONGITUDE)?;
        let iridium_cep = parse_float(body, FIELD_IRIDIUM_CEP)?;
        let session_status = parse_int(body, FIELD_SESSION_STATUS)?;
        let hex_data = extract_field(body, FIELD_DATA);

        let payload = if hex_data.is_empty() {
            TelemetryFrame::default()
        } else {
            self.decoder.decode_hex(&hex_data)
        };

        let is_valid = !imei.is_empty() && !hex_data.is_empty();
        if is_valid {
            info!("Parsed telemetry - IMEI: {}, MOMSN: {}", imei, momsn);
        } else {
            warn!("Parsed telemetry missing essential fields (IMEI or Data)");
        }

        Ok(EnvelopeRecord {
            imei,
            momsn,
            transmit_time,
            iridium_latitude,
            iridium_longitude,
            iridium_cep,
            session_status,
            session_status_description: describe_session_status(session_status),
            hex_data,
            payload,
            is_valid,
        })
    }
}

/// Extract an integer field, 0 when absent
fn parse_int(body: &str, field: &'static str) -> Result<i32> {
    parse_number(body, field, |value, source| TelemetryError::InvalidInteger {
        field,
        value,
        source,
    })
}

/// Extract a floating-point field, 0.0 when absent
fn parse_float(body: &str, field: &'static str) -> Result<f64> {
    parse_number(body, field, |value, source| TelemetryError::InvalidFloat {
        field,
        value,
        source,
    })
}

fn parse_number<T, F>(body: &str, field: &str, to_error: F) -> Result<T>
where
    T: FromStr + Default,
    F: FnOnce(String, T::Err) -> TelemetryError,
{
    let value = extract_field(body, field);
    if value.is_empty() {
        return Ok(T::default());
    }

    value.parse::<T>().map_err(|source| to_error(value, source))
}
