//! # RockBLOCK Frame Layout and Types
//!
//! Byte offsets of the fixed 50-byte balloon frame and the decoded record types.
//!
//! ```text
//! 0-1    header "RB"
//! 2-4    modem serial number (u24, big-endian)
//! 5-7    UTC hours, minutes, seconds
//! 8-11   latitude  deg, min, sec, hemisphere (0 = N)
//! 12-15  longitude deg, min, sec, hemisphere (0 = E)
//! 16-19  altitude (i32, big-endian)
//! 20     altitude units (0 = meters)
//! 21-36  analog ports 0-7, two bytes each, MSB first
//! 37-47  reserved
//! 48-49  modem status (u16, big-endian)
//! ```

use chrono::NaiveTime;
use serde::Serialize;
use std::fmt;

/// Expected header characters
pub const FRAME_HEADER: &str = "RB";

/// Fixed frame size in bytes (100 hex characters)
pub const EXPECTED_PAYLOAD_SIZE: usize = 50;

pub const HEADER_BYTE_0: usize = 0;
pub const HEADER_BYTE_1: usize = 1;

/// Serial number, MSB first
pub const SERIAL_OFFSET: usize = 2;
pub const SERIAL_LEN: usize = 3;

pub const UTC_HOURS: usize = 5;
pub const UTC_MINUTES: usize = 6;
pub const UTC_SECONDS: usize = 7;

pub const LAT_DEGREES: usize = 8;
pub const LAT_MINUTES: usize = 9;
pub const LAT_SECONDS: usize = 10;
pub const LAT_HEMISPHERE: usize = 11;

pub const LON_DEGREES: usize = 12;
pub const LON_MINUTES: usize = 13;
pub const LON_SECONDS: usize = 14;
pub const LON_HEMISPHERE: usize = 15;

/// Altitude, signed 32-bit, MSB first
pub const ALTITUDE_OFFSET: usize = 16;
pub const ALTITUDE_UNITS: usize = 20;

/// First byte of analog port 0
pub const ANALOG_DATA_BASE: usize = 21;
pub const BYTES_PER_PORT: usize = 2;
pub const ANALOG_PORT_COUNT: usize = 8;

pub const RESERVED_START: usize = 37;
pub const RESERVED_END: usize = 47;

pub const MODEM_STATUS_MSB: usize = 48;
pub const MODEM_STATUS_LSB: usize = 49;

/// Hemisphere of a DMS coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Latitude hemisphere from its wire byte (0 = North, anything else = South)
    pub fn latitude(byte: u8) -> Self {
        if byte == 0 { Self::North } else { Self::South }
    }

    /// Longitude hemisphere from its wire byte (0 = East, anything else = West)
    pub fn longitude(byte: u8) -> Self {
        if byte == 0 { Self::East } else { Self::West }
    }

    /// True for the hemispheres that carry a negative decimal sign
    pub fn is_negative(self) -> bool {
        matches!(self, Self::South | Self::West)
    }

    pub fn as_char(self) -> char {
        match self {
            Self::North => 'N',
            Self::South => 'S',
            Self::East => 'E',
            Self::West => 'W',
        }
    }
}

/// Degrees/minutes/seconds coordinate as transmitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dms {
    pub degrees: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub hemisphere: Hemisphere,
}

impl Dms {
    /// Signed decimal degrees, negative in the southern and western hemispheres
    ///
    /// # Examples
    ///
    /// ```
    /// use rockblock_telemetry::rockblock::protocol::{Dms, Hemisphere};
    ///
    /// let lat = Dms { degrees: 10, minutes: 30, seconds: 0, hemisphere: Hemisphere::South };
    /// assert!((lat.to_decimal() + 10.5).abs() < 1e-9);
    /// ```
    pub fn to_decimal(&self) -> f64 {
        let magnitude = f64::from(self.degrees)
            + f64::from(self.minutes) / 60.0
            + f64::from(self.seconds) / 3600.0;

        if self.hemisphere.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    fn zero(hemisphere: Hemisphere) -> Self {
        Self {
            degrees: 0,
            minutes: 0,
            seconds: 0,
            hemisphere,
        }
    }
}

/// Unit named by the altitude units byte; the value is never converted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AltitudeUnits {
    #[default]
    Meters,
    Feet,
}

impl AltitudeUnits {
    pub fn from_byte(byte: u8) -> Self {
        if byte == 0 { Self::Meters } else { Self::Feet }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Feet => "feet",
        }
    }
}

impl fmt::Display for AltitudeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical sensor wired to an analog port
///
/// Ports 0 and 1 exist in the frame but have no sensor assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AnalogChannel {
    Pressure,
    ExternalTemp,
    InternalTemp,
    AccelX,
    AccelY,
    Battery,
}

impl AnalogChannel {
    /// Wired channels in port order
    pub const WIRED: [AnalogChannel; 6] = [
        AnalogChannel::Pressure,
        AnalogChannel::ExternalTemp,
        AnalogChannel::InternalTemp,
        AnalogChannel::AccelX,
        AnalogChannel::AccelY,
        AnalogChannel::Battery,
    ];

    /// Analog port number within the frame
    pub fn port(self) -> usize {
        match self {
            Self::Pressure => 2,
            Self::ExternalTemp => 3,
            Self::InternalTemp => 4,
            Self::AccelX => 5,
            Self::AccelY => 6,
            Self::Battery => 7,
        }
    }

    /// Offset of the channel's MSB within the frame
    pub fn byte_offset(self) -> usize {
        ANALOG_DATA_BASE + self.port() * BYTES_PER_PORT
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pressure => "Pressure",
            Self::ExternalTemp => "External Temperature",
            Self::InternalTemp => "Internal Temperature",
            Self::AccelX => "X-axis Accelerometer",
            Self::AccelY => "Y-axis Accelerometer",
            Self::Battery => "Battery",
        }
    }
}

/// One calibrated analog sensor value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalogChannelReading {
    /// Raw 16-bit ADC code
    pub raw: u16,

    /// Voltage derived from the raw code
    pub voltage: f32,

    /// Calibrated physical value (Celsius for temperatures)
    pub measurement: f32,

    /// Unit label; temperature labels also carry the Fahrenheit value
    pub unit: String,

    pub name: String,

    pub is_valid: bool,
}

/// Decoded balloon frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub header: String,
    pub header_valid: bool,

    /// RockBLOCK serial number (24-bit)
    pub serial_number: u32,

    pub utc_hours: u8,
    pub utc_minutes: u8,
    pub utc_seconds: u8,

    /// Decimal degrees
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_dms: Dms,
    pub longitude_dms: Dms,

    pub altitude: i32,
    pub altitude_units: AltitudeUnits,

    pub internal_temp: AnalogChannelReading,
    pub pressure: AnalogChannelReading,
    pub external_temp: AnalogChannelReading,
    pub accel_y: AnalogChannelReading,
    pub accel_x: AnalogChannelReading,
    pub battery: AnalogChannelReading,

    pub modem_status: u16,
    pub modem_status_description: String,

    /// Overall validity (header check plus any enabled policy checks)
    pub is_valid: bool,
}

impl Default for TelemetryFrame {
    fn default() -> Self {
        Self {
            header: String::new(),
            header_valid: false,
            serial_number: 0,
            utc_hours: 0,
            utc_minutes: 0,
            utc_seconds: 0,
            latitude: 0.0,
            longitude: 0.0,
            latitude_dms: Dms::zero(Hemisphere::North),
            longitude_dms: Dms::zero(Hemisphere::East),
            altitude: 0,
            altitude_units: AltitudeUnits::default(),
            internal_temp: AnalogChannelReading::default(),
            pressure: AnalogChannelReading::default(),
            external_temp: AnalogChannelReading::default(),
            accel_y: AnalogChannelReading::default(),
            accel_x: AnalogChannelReading::default(),
            battery: AnalogChannelReading::default(),
            modem_status: 0,
            modem_status_description: String::new(),
            is_valid: false,
        }
    }
}

impl TelemetryFrame {
    /// Reading for a wired channel
    pub fn channel(&self, channel: AnalogChannel) -> &AnalogChannelReading {
        match channel {
            AnalogChannel::Pressure => &self.pressure,
            AnalogChannel::ExternalTemp => &self.external_temp,
            AnalogChannel::InternalTemp => &self.internal_temp,
            AnalogChannel::AccelX => &self.accel_x,
            AnalogChannel::AccelY => &self.accel_y,
            AnalogChannel::Battery => &self.battery,
        }
    }

    pub(crate) fn channel_mut(&mut self, channel: AnalogChannel) -> &mut AnalogChannelReading {
        match channel {
            AnalogChannel::Pressure => &mut self.pressure,
            AnalogChannel::ExternalTemp => &mut self.external_temp,
            AnalogChannel::InternalTemp => &mut self.internal_temp,
            AnalogChannel::AccelX => &mut self.accel_x,
            AnalogChannel::AccelY => &mut self.accel_y,
            AnalogChannel::Battery => &mut self.battery,
        }
    }

    /// UTC time of the GPS fix, `None` when the bytes are out of range
    pub fn utc_time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            u32::from(self.utc_hours),
            u32::from(self.utc_minutes),
            u32::from(self.utc_seconds),
        )
    }
}
