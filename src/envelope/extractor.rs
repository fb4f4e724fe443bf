//! # Envelope Field Extraction
//!
//! Pulls `Name: value` fields out of a relay email body.

/// Characters stripped from the end of a value; `U`, `T` and `C` remove the
/// unit suffix of `Transmit Time`
const TRAILING_TRIM: [char; 7] = [' ', '\t', '\r', '\n', 'U', 'T', 'C'];

/// Leading horizontal whitespace
const LEADING_TRIM: [char; 2] = [' ', '\t'];

/// Extract the value of a named field
///
/// Finds the first `"<field_name>:"` (case-sensitive) and returns the rest of
/// that line, trimmed. Returns an empty string when the field is absent.
///
/// Any trailing `U`, `T` or `C` characters are trimmed along with whitespace,
/// so a value that legitimately ends in one of them is shortened.
///
/// # Examples
///
/// ```
/// use rockblock_telemetry::envelope::extractor::extract_field;
///
/// let body = "IMEI: 300434063929450\nTransmit Time: 2024-06-01T14:30:15Z UTC\n";
/// assert_eq!(extract_field(body, "IMEI"), "300434063929450");
/// assert_eq!(extract_field(body, "Transmit Time"), "2024-06-01T14:30:15Z");
/// assert_eq!(extract_field(body, "MOMSN"), "");
/// ```
pub fn extract_field(text: &str, field_name: &str) -> String {
    let marker = format!("{}:", field_name);

    let Some(start) = text.find(&marker) else {
        return String::new();
    };

    let rest = text[start + marker.len()..].trim_start_matches(LEADING_TRIM);
    let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());

    rest[..line_end].trim_end_matches(TRAILING_TRIM).to_string()
}
