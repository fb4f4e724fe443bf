//! # JSON Lines Output
//!
//! One compact JSON object per decoded record, for collaborators that ship
//! records to storage or dashboards.

use std::io::Write;

use crate::envelope::record::EnvelopeRecord;
use crate::error::Result;

/// Serialize a record as a single JSON line (without the trailing newline)
pub fn to_json_line(record: &EnvelopeRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

/// Write a record as one newline-terminated JSON line
pub fn write_json_line<W: Write>(writer: &mut W, record: &EnvelopeRecord) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::record::EnvelopeParser;
    use serde_json::Value;

    fn sample_record() -> EnvelopeRecord {
        let mut bytes = vec![0u8; 50];
        bytes[0] = b'R';
        bytes[1] = b'B';
        bytes[8..12].copy_from_slice(&[10, 30, 0, 1]);
        bytes[48..50].copy_from_slice(&403u16.to_be_bytes());
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();

        EnvelopeParser::default().parse(&format!("IMEI: 300434063929450\nMOMSN: 9\nData: {}\n", hex))
    }

    #[test]
    fn test_json_line_fields() {
        let line = to_json_line(&sample_record()).unwrap();
        assert!(!line.contains('\n'));

        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["imei"], "300434063929450");
        assert_eq!(value["momsn"], 9);
        assert_eq!(value["is_valid"], true);
        assert_eq!(value["payload"]["header"], "RB");
        assert_eq!(value["payload"]["latitude_dms"]["hemisphere"], "South");
        assert_eq!(value["payload"]["altitude_units"], "Meters");
        assert_eq!(value["payload"]["modem_status"], 403);
        assert_eq!(value["payload"]["battery"]["name"], "Battery");
    }

    #[test]
    fn test_write_json_lines() {
        let record = sample_record();
        let mut out = Vec::new();
        write_json_line(&mut out, &record).unwrap();
        write_json_line(&mut out, &record).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], lines[1]);
        assert!(text.ends_with('\n'));
    }
}
