//! # Analog Calibration
//!
//! Converts raw ADC codes from the analog ports into physical values.
//!
//! Every channel first converts the code to a voltage with a shared constant:
//!
//! `voltage = raw * adc_to_voltage`
//!
//! Linear channels (temperatures, pressure, accelerometers) then apply:
//!
//! `measurement = (voltage - offset) / scale`
//!
//! The battery divider is compensated with a single divisor instead:
//!
//! `measurement = voltage / battery_ideal_offset`
//!
//! ## Usage
//!
//! ```
//! use rockblock_telemetry::rockblock::calibration::CalibrationTable;
//! use rockblock_telemetry::rockblock::protocol::AnalogChannel;
//!
//! let table = CalibrationTable::default();
//! let reading = table.calibrate(AnalogChannel::Battery, 1000);
//! assert_eq!(reading.unit, "V");
//! assert!((reading.measurement - 5.034).abs() < 0.001);
//! ```

use serde::{Deserialize, Serialize};

use super::protocol::{AnalogChannel, AnalogChannelReading};
use crate::error::{Result, TelemetryError};

/// ADC code to volts (5 V reference, 10-bit converter)
pub const ADC_TO_VOLTAGE: f32 = 0.004888;

pub const INTERNAL_TEMP_OFFSET: f32 = 0.502;
pub const INTERNAL_TEMP_SCALE: f32 = 0.011;

pub const PRESSURE_OFFSET: f32 = 1.04;
pub const PRESSURE_SCALE: f32 = 0.267;

pub const EXTERNAL_TEMP_OFFSET: f32 = 0.491;
pub const EXTERNAL_TEMP_SCALE: f32 = 0.011;

pub const ACCEL_Y_OFFSET: f32 = 1.651;
pub const ACCEL_Y_SCALE: f32 = 0.224;

pub const ACCEL_X_OFFSET: f32 = 1.651;
pub const ACCEL_X_SCALE: f32 = 0.224;

/// Battery voltage divider compensation
pub const BATTERY_IDEAL_OFFSET: f32 = 0.971;

/// Offset/scale pair for a linear sensor
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LinearCalibration {
    /// Sensor output voltage at zero
    pub offset: f32,

    /// Volts per unit
    pub scale: f32,
}

impl LinearCalibration {
    #[must_use]
    pub const fn new(offset: f32, scale: f32) -> Self {
        Self { offset, scale }
    }

    #[inline]
    #[must_use]
    pub fn apply(&self, voltage: f32) -> f32 {
        (voltage - self.offset) / self.scale
    }
}

/// Calibration constants for all wired analog channels
///
/// Built once (from defaults or the `[calibration]` config section) and
/// owned by the frame decoder.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CalibrationTable {
    #[serde(default = "default_adc_to_voltage")]
    pub adc_to_voltage: f32,

    #[serde(default = "default_internal_temp")]
    pub internal_temp: LinearCalibration,

    #[serde(default = "default_pressure")]
    pub pressure: LinearCalibration,

    #[serde(default = "default_external_temp")]
    pub external_temp: LinearCalibration,

    #[serde(default = "default_accel_y")]
    pub accel_y: LinearCalibration,

    #[serde(default = "default_accel_x")]
    pub accel_x: LinearCalibration,

    #[serde(default = "default_battery_ideal_offset")]
    pub battery_ideal_offset: f32,
}

fn default_adc_to_voltage() -> f32 { ADC_TO_VOLTAGE }
fn default_internal_temp() -> LinearCalibration { LinearCalibration::new(INTERNAL_TEMP_OFFSET, INTERNAL_TEMP_SCALE) }
fn default_pressure() -> LinearCalibration { LinearCalibration::new(PRESSURE_OFFSET, PRESSURE_SCALE) }
fn default_external_temp() -> LinearCalibration { LinearCalibration::new(EXTERNAL_TEMP_OFFSET, EXTERNAL_TEMP_SCALE) }
fn default_accel_y() -> LinearCalibration { LinearCalibration::new(ACCEL_Y_OFFSET, ACCEL_Y_SCALE) }
fn default_accel_x() -> LinearCalibration { LinearCalibration::new(ACCEL_X_OFFSET, ACCEL_X_SCALE) }
fn default_battery_ideal_offset() -> f32 { BATTERY_IDEAL_OFFSET }

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            adc_to_voltage: default_adc_to_voltage(),
            internal_temp: default_internal_temp(),
            pressure: default_pressure(),
            external_temp: default_external_temp(),
            accel_y: default_accel_y(),
            accel_x: default_accel_x(),
            battery_ideal_offset: default_battery_ideal_offset(),
        }
    }
}

impl CalibrationTable {
    /// Voltage seen at the ADC for a raw code
    #[inline]
    #[must_use]
    pub fn voltage(&self, raw: u16) -> f32 {
        f32::from(raw) * self.adc_to_voltage
    }

    /// Calibrate a raw code for one channel
    ///
    /// Calibration is pure arithmetic: the reading is always marked valid,
    /// physically implausible values included.
    #[must_use]
    pub fn calibrate(&self, channel: AnalogChannel, raw: u16) -> AnalogChannelReading {
        let voltage = self.voltage(raw);

        let (voltage, measurement, unit) = match channel {
            AnalogChannel::InternalTemp => {
                let celsius = self.internal_temp.apply(voltage);
                (voltage, celsius, temperature_unit(celsius))
            }
            AnalogChannel::ExternalTemp => {
                let celsius = self.external_temp.apply(voltage);
                (voltage, celsius, temperature_unit(celsius))
            }
            AnalogChannel::Pressure => (voltage, self.pressure.apply(voltage), "PSI".to_string()),
            AnalogChannel::AccelY => (voltage, self.accel_y.apply(voltage), "G".to_string()),
            AnalogChannel::AccelX => (voltage, self.accel_x.apply(voltage), "G".to_string()),
            AnalogChannel::Battery => {
                let compensated = voltage / self.battery_ideal_offset;
                (compensated, compensated, "V".to_string())
            }
        };

        AnalogChannelReading {
            raw,
            voltage,
            measurement,
            unit,
            name: channel.name().to_string(),
            is_valid: true,
        }
    }

    /// Check that every constant yields finite results
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::InvalidCalibration`] naming the first bad
    /// constant.
    pub fn validate(&self) -> Result<()> {
        if !self.adc_to_voltage.is_finite() || self.adc_to_voltage <= 0.0 {
            return Err(invalid("adc_to_voltage must be a positive number".to_string()));
        }

        if !self.battery_ideal_offset.is_finite() || self.battery_ideal_offset <= 0.0 {
            return Err(invalid("battery_ideal_offset must be a positive number".to_string()));
        }

        for (name, cal) in [
            ("internal_temp", self.internal_temp),
            ("pressure", self.pressure),
            ("external_temp", self.external_temp),
            ("accel_y", self.accel_y),
            ("accel_x", self.accel_x),
        ] {
            if !cal.offset.is_finite() {
                return Err(invalid(format!("{} offset must be finite", name)));
            }
            if !cal.scale.is_finite() || cal.scale == 0.0 {
                return Err(invalid(format!("{} scale must be finite and non-zero", name)));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> TelemetryError {
    TelemetryError::InvalidCalibration(msg)
}

/// Celsius unit label with the truncated Fahrenheit value, e.g. `°C (69°F)`
fn temperature_unit(celsius: f32) -> String {
    let fahrenheit = celsius * 1.8 + 32.0;
    format!("°C ({}°F)", fahrenheit as i32)
}
