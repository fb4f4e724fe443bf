//! # Iridium Session Status
//!
//! Descriptions for the MO session return code the relay reports in the
//! `Iridium Session Status` field.

/// MO session return codes with a specific meaning
pub const SESSION_STATUS_CODES: &[(i32, &str)] = &[
    (0, "MO message transferred successfully"),
    (1, "MO message transferred successfully, but MT message in the queue was too big"),
    (2, "MO message transferred successfully, but Location Update was not accepted"),
    (10, "GSS reported that the call did not complete in the allowed time"),
    (11, "MO message queue at the GSS is full"),
    (12, "MO message has too many segments"),
    (13, "GSS reported that the session did not complete"),
    (14, "Invalid segment size"),
    (15, "Access is denied"),
    (16, "ISU has been locked and may not make SBD calls"),
    (17, "Gateway not responding (local session timeout)"),
    (18, "Connection lost (RF drop)"),
    (19, "Link failure (protocol error caused termination of the call)"),
    (32, "No network service, unable to initiate call"),
    (33, "Antenna fault, unable to initiate call"),
    (34, "Radio is disabled, unable to initiate call"),
    (35, "ISU is busy, unable to initiate call"),
    (36, "Try later, must wait 3 minutes since last registration"),
    (37, "SBD service is temporarily disabled"),
    (38, "Try later, traffic management period"),
    (64, "Band violation (attempt to transmit outside permitted frequency band)"),
    (65, "PLL lock failure hardware error during attempted transmit"),
];

/// Describe a session return code
///
/// Reserved codes are described by whether they signal success or failure.
///
/// # Examples
///
/// ```
/// use rockblock_telemetry::envelope::session::describe_session_status;
///
/// assert_eq!(describe_session_status(0), "MO message transferred successfully");
/// assert_eq!(describe_session_status(4), "Reserved (session success)");
/// assert_eq!(describe_session_status(99), "Unknown: 99");
/// ```
pub fn describe_session_status(code: i32) -> String {
    if let Some((_, description)) = SESSION_STATUS_CODES.iter().find(|(c, _)| *c == code) {
        return (*description).to_string();
    }

    match code {
        3..=4 => "Reserved (session success)".to_string(),
        5..=8 => "Reserved (session failure)".to_string(),
        20..=31 | 39..=63 => "Reserved (failure)".to_string(),
        _ => format!("Unknown: {}", code),
    }
}
