//! # RockBLOCK Frame Decoder
//!
//! Decodes the fixed 50-byte balloon frame into a [`TelemetryFrame`].
//! All multi-byte fields are big-endian.

use bytes::Buf;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::calibration::CalibrationTable;
use super::hex::hex_to_bytes;
use super::protocol::*;
use super::status::StatusCodeTable;
use crate::error::{Result, TelemetryError};

/// Optional range checks that can clear the frame validity flag
///
/// Both checks are off by default, so validity depends on the header alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ValidationPolicy {
    /// Require hours <= 23 and minutes/seconds <= 59
    #[serde(default)]
    pub check_utc_time: bool,

    /// Require the altitude units byte to be 0 (meters) or 1 (feet)
    #[serde(default)]
    pub check_altitude_units: bool,
}

/// Frame decoder holding the immutable calibration and status tables
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    calibration: CalibrationTable,
    status_codes: StatusCodeTable,
    policy: ValidationPolicy,
}

impl FrameDecoder {
    /// Create a decoder with the given calibration and validation policy
    #[must_use]
    pub fn new(calibration: CalibrationTable, policy: ValidationPolicy) -> Self {
        Self {
            calibration,
            status_codes: StatusCodeTable::default(),
            policy,
        }
    }

    /// Create a decoder after checking the calibration constants
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidCalibration`] if the table would
    /// produce non-finite readings.
    pub fn try_new(calibration: CalibrationTable, policy: ValidationPolicy) -> Result<Self> {
        calibration.validate()?;
        Ok(Self::new(calibration, policy))
    }

    /// Replace the modem status table
    #[must_use]
    pub fn with_status_codes(mut self, status_codes: StatusCodeTable) -> Self {
        self.status_codes = status_codes;
        self
    }

    pub fn calibration(&self) -> &CalibrationTable {
        &self.calibration
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    /// Convert a hex payload to bytes and decode it
    ///
    /// # Examples
    ///
    /// ```
    /// use rockblock_telemetry::rockblock::decoder::FrameDecoder;
    ///
    /// let decoder = FrameDecoder::default();
    /// let hex = format!("5242{}", "00".repeat(48));
    /// let frame = decoder.decode_hex(&hex);
    /// assert_eq!(frame.header, "RB");
    /// assert!(frame.is_valid);
    /// ```
    pub fn decode_hex(&self, hex: &str) -> TelemetryFrame {
        let bytes = hex_to_bytes(hex);
        let preview: String = hex.chars().take(EXPECTED_PAYLOAD_SIZE).collect();
        debug!("Decoding hex payload: {}... ({} bytes)", preview, bytes.len());
        self.decode(&bytes)
    }

    /// Decode a frame, degrading a short payload to an invalid default frame
    pub fn decode(&self, bytes: &[u8]) -> TelemetryFrame {
        match self.try_decode(bytes) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Payload rejected: {}", e);
                TelemetryFrame::default()
            }
        }
    }

    /// Decode a frame
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::FrameTooShort`] if fewer than
    /// [`EXPECTED_PAYLOAD_SIZE`] bytes are given. A wrong header is not an
    /// error: the frame is decoded with `is_valid == false`.
    pub fn try_decode(&self, bytes: &[u8]) -> Result<TelemetryFrame> {
        if bytes.len() < EXPECTED_PAYLOAD_SIZE {
            return Err(TelemetryError::FrameTooShort {
                expected: EXPECTED_PAYLOAD_SIZE,
                actual: bytes.len(),
            });
        }

        let mut frame = TelemetryFrame::default();

        frame.header = [bytes[HEADER_BYTE_0], bytes[HEADER_BYTE_1]]
            .iter()
            .map(|&b| char::from(b))
            .collect();
        frame.header_valid = frame.header == FRAME_HEADER;

        frame.serial_number = read_u24(bytes, SERIAL_OFFSET);

        frame.utc_hours = bytes[UTC_HOURS];
        frame.utc_minutes = bytes[UTC_MINUTES];
        frame.utc_seconds = bytes[UTC_SECONDS];

        frame.latitude_dms = Dms {
            degrees: bytes[LAT_DEGREES],
            minutes: bytes[LAT_MINUTES],
            seconds: bytes[LAT_SECONDS],
            hemisphere: Hemisphere::latitude(bytes[LAT_HEMISPHERE]),
        };
        frame.latitude = frame.latitude_dms.to_decimal();

        frame.longitude_dms = Dms {
            degrees: bytes[LON_DEGREES],
            minutes: bytes[LON_MINUTES],
            seconds: bytes[LON_SECONDS],
            hemisphere: Hemisphere::longitude(bytes[LON_HEMISPHERE]),
        };
        frame.longitude = frame.longitude_dms.to_decimal();

        frame.altitude = read_i32(bytes, ALTITUDE_OFFSET);
        frame.altitude_units = AltitudeUnits::from_byte(bytes[ALTITUDE_UNITS]);

        for channel in AnalogChannel::WIRED {
            let raw = read_u16(bytes, channel.byte_offset());
            let reading = self.calibration.calibrate(channel, raw);
            debug!(
                "{}: {:.2} {} (raw {}, {:.3} V)",
                reading.name, reading.measurement, reading.unit, raw, reading.voltage
            );
            *frame.channel_mut(channel) = reading;
        }

        frame.modem_status = read_u16(bytes, MODEM_STATUS_MSB);
        frame.modem_status_description = self.status_codes.describe(frame.modem_status);

        frame.is_valid = frame.header_valid;
        if !frame.header_valid {
            warn!("Invalid frame header {:?} (expected {:?})", frame.header, FRAME_HEADER);
        }

        if self.policy.check_utc_time && frame.utc_time().is_none() {
            warn!(
                "UTC time out of range: {}:{}:{}",
                frame.utc_hours, frame.utc_minutes, frame.utc_seconds
            );
            frame.is_valid = false;
        }

        if self.policy.check_altitude_units && bytes[ALTITUDE_UNITS] > 1 {
            warn!("Unknown altitude units byte: {}", bytes[ALTITUDE_UNITS]);
            frame.is_valid = false;
        }

        info!(
            serial = frame.serial_number,
            lat = frame.latitude,
            lon = frame.longitude,
            alt = frame.altitude,
            status = frame.modem_status,
            valid = frame.is_valid,
            "Decoded frame {}",
            frame.header
        );

        Ok(frame)
    }
}

/// Read a big-endian u16 at `offset`
#[inline]
fn read_u16(frame: &[u8], offset: usize) -> u16 {
    let mut cursor = &frame[offset..];
    cursor.get_u16()
}

/// Read a big-endian 24-bit unsigned value at `offset`
#[inline]
fn read_u24(frame: &[u8], offset: usize) -> u32 {
    let mut cursor = &frame[offset..];
    cursor.get_uint(SERIAL_LEN) as u32
}

/// Read a big-endian i32 at `offset`
#[inline]
fn read_i32(frame: &[u8], offset: usize) -> i32 {
    let mut cursor = &frame[offset..];
    cursor.get_i32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rockblock::calibration::LinearCalibration;

    const SCENARIO_HEX: &str =
        "524200333f5133207202f2e006f1633010000022700000000000000000000000000000000000000000000000000000";

    /// Valid frame: serial 123456, 14:30:15, 33°25'48"N 111°56'24"W, 10000 m
    fn build_frame() -> Vec<u8> {
        let mut frame = vec![0u8; EXPECTED_PAYLOAD_SIZE];
        frame[0] = b'R';
        frame[1] = b'B';
        frame[2..5].copy_from_slice(&[0x01, 0xE2, 0x40]);
        frame[5..8].copy_from_slice(&[14, 30, 15]);
        frame[8..12].copy_from_slice(&[33, 25, 48, 0]);
        frame[12..16].copy_from_slice(&[111, 56, 24, 1]);
        frame[16..20].copy_from_slice(&10_000i32.to_be_bytes());
        frame[20] = 0;
        set_port(&mut frame, AnalogChannel::Pressure, 400);
        set_port(&mut frame, AnalogChannel::ExternalTemp, 100);
        set_port(&mut frame, AnalogChannel::InternalTemp, 150);
        set_port(&mut frame, AnalogChannel::AccelX, 338);
        set_port(&mut frame, AnalogChannel::AccelY, 384);
        set_port(&mut frame, AnalogChannel::Battery, 1000);
        frame[48..50].copy_from_slice(&402u16.to_be_bytes());
        frame
    }

    fn set_port(frame: &mut [u8], channel: AnalogChannel, raw: u16) {
        let offset = channel.byte_offset();
        frame[offset..offset + 2].copy_from_slice(&raw.to_be_bytes());
    }

    #[test]
    fn test_decode_valid_frame() {
        let frame = FrameDecoder::default().try_decode(&build_frame()).unwrap();

        assert_eq!(frame.header, "RB");
        assert!(frame.header_valid);
        assert!(frame.is_valid);
        assert_eq!(frame.serial_number, 123_456);
        assert_eq!((frame.utc_hours, frame.utc_minutes, frame.utc_seconds), (14, 30, 15));
        assert!((frame.latitude - 33.43).abs() < 1e-9);
        assert!((frame.longitude + 111.94).abs() < 1e-9);
        assert_eq!(frame.latitude_dms.hemisphere, Hemisphere::North);
        assert_eq!(frame.longitude_dms.hemisphere, Hemisphere::West);
        assert_eq!(frame.altitude, 10_000);
        assert_eq!(frame.altitude_units, AltitudeUnits::Meters);
        assert_eq!(frame.modem_status, 402);
        assert_eq!(frame.modem_status_description, "Transmit Successful And No Receive");
    }

    #[test]
    fn test_decode_analog_channels() {
        let frame = FrameDecoder::default().decode(&build_frame());

        assert_eq!(frame.pressure.raw, 400);
        assert!((frame.pressure.measurement - 3.4277).abs() < 0.001);
        assert_eq!(frame.internal_temp.raw, 150);
        assert_eq!(frame.internal_temp.unit, "°C (69°F)");
        assert_eq!(frame.external_temp.raw, 100);
        assert_eq!(frame.accel_x.raw, 338);
        assert_eq!(frame.accel_y.raw, 384);
        assert!((frame.battery.measurement - 5.034).abs() < 0.001);

        for channel in AnalogChannel::WIRED {
            let reading = frame.channel(channel);
            assert!(reading.is_valid);
            assert_eq!(reading.name, channel.name());
        }
    }

    #[test]
    fn test_frame_too_short() {
        let bytes = build_frame();
        let result = FrameDecoder::default().try_decode(&bytes[..49]);
        assert!(matches!(
            result,
            Err(TelemetryError::FrameTooShort { expected: 50, actual: 49 })
        ));
    }

    #[test]
    fn test_short_frame_degrades_to_default() {
        let bytes = build_frame();
        for len in [0, 1, 20, 49] {
            let frame = FrameDecoder::default().decode(&bytes[..len]);
            assert_eq!(frame, TelemetryFrame::default(), "length {}", len);
            assert!(!frame.is_valid);
        }
    }

    #[test]
    fn test_longer_frame_accepted() {
        let mut bytes = build_frame();
        bytes.extend_from_slice(&[0xFF; 10]);
        let frame = FrameDecoder::default().decode(&bytes);
        assert!(frame.is_valid);
        assert_eq!(frame.modem_status, 402);
    }

    #[test]
    fn test_wrong_header_still_decodes_fields() {
        let mut bytes = build_frame();
        bytes[0] = b'X';
        bytes[1] = b'Y';

        let frame = FrameDecoder::default().decode(&bytes);
        assert_eq!(frame.header, "XY");
        assert!(!frame.header_valid);
        assert!(!frame.is_valid);
        assert_eq!(frame.serial_number, 123_456);
        assert_eq!(frame.utc_hours, 14);
        assert!((frame.latitude - 33.43).abs() < 1e-9);
        assert_eq!(frame.altitude, 10_000);
        assert_eq!(frame.battery.raw, 1000);
        assert_eq!(frame.modem_status, 402);
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let mut bytes = build_frame();
        bytes[1] = b'b';
        assert!(!FrameDecoder::default().decode(&bytes).header_valid);
    }

    #[test]
    fn test_southern_and_western_hemispheres() {
        let mut bytes = build_frame();
        bytes[8..12].copy_from_slice(&[10, 30, 0, 1]);
        bytes[12..16].copy_from_slice(&[20, 15, 0, 1]);

        let frame = FrameDecoder::default().decode(&bytes);
        assert!((frame.latitude + 10.5).abs() < 1e-9);
        assert!((frame.longitude + 20.25).abs() < 1e-9);
        assert_eq!(frame.latitude_dms.hemisphere, Hemisphere::South);
        assert_eq!(frame.longitude_dms.degrees, 20);
    }

    #[test]
    fn test_any_nonzero_hemisphere_byte_is_negative() {
        let mut bytes = build_frame();
        bytes[11] = 0x7F;
        bytes[15] = 0;
        let frame = FrameDecoder::default().decode(&bytes);
        assert!(frame.latitude < 0.0);
        assert!(frame.longitude > 0.0);
    }

    #[test]
    fn test_negative_altitude_in_feet() {
        let mut bytes = build_frame();
        bytes[16..20].copy_from_slice(&(-120i32).to_be_bytes());
        bytes[20] = 1;

        let frame = FrameDecoder::default().decode(&bytes);
        assert_eq!(frame.altitude, -120);
        assert_eq!(frame.altitude_units, AltitudeUnits::Feet);
    }

    #[test]
    fn test_serial_number_max() {
        let mut bytes = build_frame();
        bytes[2..5].copy_from_slice(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(FrameDecoder::default().decode(&bytes).serial_number, 0xFF_FFFF);
    }

    #[test]
    fn test_unwired_and_reserved_bytes_ignored() {
        let reference = FrameDecoder::default().decode(&build_frame());

        let mut bytes = build_frame();
        // Ports 0 and 1
        bytes[21..25].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        for byte in &mut bytes[RESERVED_START..=RESERVED_END] {
            *byte = 0xAA;
        }

        assert_eq!(FrameDecoder::default().decode(&bytes), reference);
    }

    #[test]
    fn test_unknown_modem_status() {
        let mut bytes = build_frame();
        bytes[48..50].copy_from_slice(&250u16.to_be_bytes());
        let frame = FrameDecoder::default().decode(&bytes);
        assert_eq!(frame.modem_status, 250);
        assert_eq!(frame.modem_status_description, "Error Code: 250");
    }

    #[test]
    fn test_out_of_range_time_accepted_by_default() {
        let mut bytes = build_frame();
        bytes[5] = 81;
        bytes[20] = 39;

        let frame = FrameDecoder::default().decode(&bytes);
        assert_eq!(frame.utc_hours, 81);
        assert!(frame.utc_time().is_none());
        assert!(frame.is_valid);
    }

    #[test]
    fn test_utc_time_policy() {
        let policy = ValidationPolicy { check_utc_time: true, check_altitude_units: false };
        let decoder = FrameDecoder::new(CalibrationTable::default(), policy);

        assert!(decoder.decode(&build_frame()).is_valid);

        let mut bytes = build_frame();
        bytes[6] = 60;
        let frame = decoder.decode(&bytes);
        assert!(frame.header_valid);
        assert!(!frame.is_valid);
        assert_eq!(frame.utc_minutes, 60);
    }

    #[test]
    fn test_altitude_units_policy() {
        let policy = ValidationPolicy { check_utc_time: false, check_altitude_units: true };
        let decoder = FrameDecoder::new(CalibrationTable::default(), policy);

        let mut bytes = build_frame();
        bytes[20] = 1;
        assert!(decoder.decode(&bytes).is_valid);

        bytes[20] = 2;
        let frame = decoder.decode(&bytes);
        assert!(!frame.is_valid);
        assert_eq!(frame.altitude_units, AltitudeUnits::Feet);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let decoder = FrameDecoder::default();
        let bytes = build_frame();
        assert_eq!(decoder.decode(&bytes), decoder.decode(&bytes));
    }

    #[test]
    fn test_scenario_hex_bytes() {
        let bytes = hex_to_bytes(SCENARIO_HEX);
        assert_eq!(&bytes[..2], &[0x52, 0x42]);
        assert_eq!(bytes.len(), 47);
    }

    #[test]
    fn test_scenario_hex_is_below_frame_size() {
        let decoder = FrameDecoder::default();
        let frame = decoder.decode_hex(SCENARIO_HEX);
        assert!(!frame.is_valid);
        assert_eq!(frame, decoder.decode_hex(SCENARIO_HEX));
    }

    #[test]
    fn test_scenario_hex_padded_to_frame_size() {
        let decoder = FrameDecoder::default();
        let hex = format!("{}000000", SCENARIO_HEX);
        let frame = decoder.decode_hex(&hex);

        assert_eq!(frame.header, "RB");
        assert!(frame.header_valid);
        assert!(frame.is_valid);
        assert_eq!(frame.serial_number, 0x00_333F);
        assert_eq!((frame.utc_hours, frame.utc_minutes, frame.utc_seconds), (81, 51, 32));
        assert_eq!(frame.latitude_dms.degrees, 114);
        assert_eq!(frame.latitude_dms.hemisphere, Hemisphere::South);
        assert!((frame.latitude + (114.0 + 2.0 / 60.0 + 242.0 / 3600.0)).abs() < 1e-9);
        assert_eq!(frame.longitude_dms.hemisphere, Hemisphere::West);
        assert_eq!(frame.altitude, 0x1000_0022);
        assert_eq!(hex_to_bytes(&hex)[ALTITUDE_UNITS], 0x70);
        assert_eq!(frame.altitude_units, AltitudeUnits::Feet);
        assert_eq!(frame.modem_status, 0);
        assert_eq!(frame.modem_status_description, "Unknown: 0");

        assert_eq!(frame, decoder.decode_hex(&hex));
    }

    #[test]
    fn test_try_new_rejects_zero_scale() {
        let calibration = CalibrationTable {
            pressure: LinearCalibration::new(1.04, 0.0),
            ..CalibrationTable::default()
        };
        let result = FrameDecoder::try_new(calibration, ValidationPolicy::default());
        assert!(matches!(result, Err(TelemetryError::InvalidCalibration(_))));
    }

    #[test]
    fn test_try_new_keeps_valid_table() {
        let calibration = CalibrationTable {
            pressure: LinearCalibration::new(0.0, 1.0),
            ..CalibrationTable::default()
        };
        let decoder = FrameDecoder::try_new(calibration.clone(), ValidationPolicy::default()).unwrap();
        assert_eq!(decoder.calibration(), &calibration);

        let frame = decoder.decode(&build_frame());
        assert!(frame.pressure.measurement.is_finite());
        assert!((frame.pressure.measurement - frame.pressure.voltage).abs() < f32::EPSILON);
    }

    #[test]
    fn test_custom_status_codes() {
        const CODES: &[(u16, &str)] = &[(402, "Sent")];
        let decoder = FrameDecoder::default().with_status_codes(StatusCodeTable::new(CODES));

        let frame = decoder.decode(&build_frame());
        assert_eq!(frame.modem_status_description, "Sent");

        let mut bytes = build_frame();
        bytes[48..50].copy_from_slice(&401u16.to_be_bytes());
        assert_eq!(decoder.decode(&bytes).modem_status_description, "Success Code: 401");
    }

    #[test]
    fn test_decoder_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameDecoder>();
    }
}
