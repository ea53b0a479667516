/// Link status definitions
///
/// This module defines the closed set of outcomes a checked link can have.
use std::fmt;

/// Sentinel code for a reference that could not be checked or got no response
pub const INVALID_CODE: i32 = -1;

/// Sentinel code for a `mailto:` reference
pub const MAILTO_CODE: i32 = -2;

/// Sentinel code for a `tel:` reference
pub const PHONE_CODE: i32 = -3;

/// Outcome of checking a single link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    // ===== Non-network classifications =====
    /// `tel:` reference - valid but not checkable
    Phone,

    /// `mailto:` reference - valid but not checkable
    Mailto,

    /// Malformed reference, or no response was received
    Invalid,

    // ===== Network outcome =====
    /// An HTTP response with the given status code
    Http(u16),
}

impl Status {
    /// Returns true if this status should not be reported as broken
    ///
    /// Only HTTP 200 and the phone/mail sentinels are acceptable.
    pub fn is_acceptable(&self) -> bool {
        matches!(self, Self::Http(200) | Self::Phone | Self::Mailto)
    }

    /// Converts the status to its numeric code
    ///
    /// Sentinels are negative so they never collide with HTTP codes.
    pub fn code(&self) -> i32 {
        match self {
            Self::Phone => PHONE_CODE,
            Self::Mailto => MAILTO_CODE,
            Self::Invalid => INVALID_CODE,
            Self::Http(code) => i32::from(*code),
        }
    }

    /// Returns the human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Mailto => "Mailto",
            Self::Invalid => "Invalid",
            Self::Http(200) => "HTTP 200",
            Self::Http(403) => "HTTP 403",
            Self::Http(404) => "HTTP 404",
            Self::Http(_) => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
