//! # Modem Status Codes
//!
//! Human-readable descriptions for the status word the flight computer
//! reports about its Iridium modem (bytes 48-49 of the frame).

/// Known status codes and their descriptions
pub const MODEM_STATUS_CODES: &[(u16, &str)] = &[
    // Success codes (400-499)
    (400, "Ping Through MPM And Modem Success"),
    (401, "Modem Ready For Use"),
    (402, "Transmit Successful And No Receive"),
    (403, "Transmit And Receive Successful"),
    (404, "Transmit And Receive Successful Plus Receive Pending"),
    (407, "Receive Data Placed In Receive Array"),
    // Status codes (300-399)
    (300, "Success Byte After SBDIX"),
    (304, "OK Found"),
    (311, "Idle"),
    (313, "Network Available With Acceptable Signal Strength"),
    // Error codes (200-299)
    (200, "Transmit Has Failed"),
    (290, "Write To MO Buffer Failed"),
    (291, "Wrong Modem Connected Check Serial Number"),
];

/// Immutable lookup table for modem status descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCodeTable {
    entries: &'static [(u16, &'static str)],
}

impl Default for StatusCodeTable {
    fn default() -> Self {
        Self::new(MODEM_STATUS_CODES)
    }
}

impl StatusCodeTable {
    #[must_use]
    pub const fn new(entries: &'static [(u16, &'static str)]) -> Self {
        Self { entries }
    }

    /// Describe a status code
    ///
    /// Unlisted codes fall back to their numeric range.
    ///
    /// # Examples
    ///
    /// ```
    /// use rockblock_telemetry::rockblock::status::StatusCodeTable;
    ///
    /// let table = StatusCodeTable::default();
    /// assert_eq!(table.describe(311), "Idle");
    /// assert_eq!(table.describe(250), "Error Code: 250");
    /// assert_eq!(table.describe(999), "Unknown: 999");
    /// ```
    #[must_use]
    pub fn describe(&self, status: u16) -> String {
        if let Some((_, description)) = self.entries.iter().find(|(code, _)| *code == status) {
            return (*description).to_string();
        }

        match status {
            200..=299 => format!("Error Code: {}", status),
            300..=399 => format!("Status Code: {}", status),
            400..=499 => format!("Success Code: {}", status),
            _ => format!("Unknown: {}", status),
        }
    }
}
