//! # Text Report
//!
//! Multi-line, human-readable rendering of decoded records.

use std::fmt;

use crate::envelope::record::EnvelopeRecord;
use crate::rockblock::protocol::{AnalogChannel, Dms, TelemetryFrame};

/// Order in which sensors are listed in the report
const REPORT_ORDER: [AnalogChannel; 6] = [
    AnalogChannel::InternalTemp,
    AnalogChannel::ExternalTemp,
    AnalogChannel::Pressure,
    AnalogChannel::AccelX,
    AnalogChannel::AccelY,
    AnalogChannel::Battery,
];

/// Column width of the field labels
const LABEL_WIDTH: usize = 17;

fn write_dms(f: &mut fmt::Formatter<'_>, decimal: f64, dms: &Dms) -> fmt::Result {
    writeln!(
        f,
        "{:.6}° ({}° {}' {}\" {})",
        decimal,
        dms.degrees,
        dms.minutes,
        dms.seconds,
        dms.hemisphere.as_char()
    )
}

impl fmt::Display for TelemetryFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DECODED PAYLOAD DATA")?;
        writeln!(
            f,
            "{:<w$}{} {}",
            "Header:",
            self.header,
            if self.header_valid { "Valid" } else { "Not Valid" },
            w = LABEL_WIDTH
        )?;
        writeln!(f, "{:<w$}{}", "Serial Number:", self.serial_number, w = LABEL_WIDTH)?;
        writeln!(
            f,
            "{:<w$}{:02}:{:02}:{:02}",
            "UTC Time:",
            self.utc_hours,
            self.utc_minutes,
            self.utc_seconds,
            w = LABEL_WIDTH
        )?;
        write!(f, "{:<w$}", "Latitude:", w = LABEL_WIDTH)?;
        write_dms(f, self.latitude, &self.latitude_dms)?;
        write!(f, "{:<w$}", "Longitude:", w = LABEL_WIDTH)?;
        write_dms(f, self.longitude, &self.longitude_dms)?;
        writeln!(
            f,
            "{:<w$}{} {}",
            "Altitude:",
            self.altitude,
            self.altitude_units,
            w = LABEL_WIDTH
        )?;

        writeln!(f)?;
        writeln!(f, "SENSORS:")?;
        for channel in REPORT_ORDER {
            let reading = self.channel(channel);
            writeln!(f, "  {}: {:.2} {}", channel.name(), reading.measurement, reading.unit)?;
        }

        writeln!(f)?;
        write!(
            f,
            "Modem Status: {} - {}",
            self.modem_status, self.modem_status_description
        )
    }
}

impl fmt::Display for EnvelopeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BALLOON TELEMETRY (MOMSN: {})", self.momsn)?;
        writeln!(f, "{:<w$}{}", "IMEI:", self.imei, w = LABEL_WIDTH)?;
        writeln!(f, "{:<w$}{}", "Transmit Time:", self.transmit_time, w = LABEL_WIDTH)?;
        writeln!(f, "{:<w$}{}°", "Iridium Lat:", self.iridium_latitude, w = LABEL_WIDTH)?;
        writeln!(f, "{:<w$}{}°", "Iridium Lon:", self.iridium_longitude, w = LABEL_WIDTH)?;
        writeln!(f, "{:<w$}{}", "Iridium CEP:", self.iridium_cep, w = LABEL_WIDTH)?;
        writeln!(
            f,
            "{:<w$}{} - {}",
            "Session Status:",
            self.session_status,
            self.session_status_description,
            w = LABEL_WIDTH
        )?;
        writeln!(f)?;
        write!(f, "{}", self.payload)
    }
}
