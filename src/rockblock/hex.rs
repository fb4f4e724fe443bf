//! # Hex Payload Conversion
//!
//! The modem relay sends the binary frame as hex text, often wrapped across
//! lines. Conversion keeps only hex digits and pairs them into bytes.

/// Convert a hex string to bytes
///
/// Non-hex characters are skipped and a trailing unpaired digit is dropped.
///
/// # Examples
///
/// ```
/// use rockblock_telemetry::rockblock::hex::hex_to_bytes;
///
/// assert_eq!(hex_to_bytes("52 42\n0A f"), vec![0x52, 0x42, 0x0A]);
/// assert!(hex_to_bytes("").is_empty());
/// ```
pub fn hex_to_bytes(hex: &str) -> Vec<u8> {
    let nibbles: Vec<u8> = hex
        .chars()
        .filter_map(|c| c.to_digit(16))
        .map(|digit| digit as u8)
        .collect();

    nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect()
}
