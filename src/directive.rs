//! Cookie directive types.
//!
//! A [`CookieDirective`] describes one cookie write: name, value, and the
//! attributes that end up in the serialized string. Directives are built
//! transiently from binding state on every write; only the serialized form
//! persists in the store.
//!
//! ```rust
//! use document_cookie::{CookieDirective, Expiry};
//!
//! let mut d = CookieDirective::new("session", "abc123");
//! d.expires = Some(Expiry::Days(7.0));
//! d.secure = true;
//! ```

use serde::{Deserialize, Serialize};

/// The attributes of a single cookie write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieDirective {
    /// Cookie name (case-sensitive).
    pub name: String,

    /// Raw cookie value. Must not contain `;` or `=` unless `uri_safe`
    /// escapes them at serialization time.
    pub value: String,

    /// When the cookie expires. `None` means a session cookie.
    pub expires: Option<Expiry>,

    /// URL path the cookie is scoped to. Defaults to `"/"` and is always
    /// emitted in the serialized string.
    pub path: String,

    /// If `true`, the `secure` flag is appended so the cookie is only sent
    /// over HTTPS.
    pub secure: bool,

    /// Percent-encode the value on write (and decode on read). Allows `;`
    /// and `=` to be part of the value without corrupting the store.
    pub uri_safe: bool,
}

impl CookieDirective {
    /// Creates a directive with default attributes (session cookie,
    /// path `/`, not secure, no encoding).
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: None,
            path: "/".to_string(),
            secure: false,
            uri_safe: false,
        }
    }
}

/// Cookie lifetime, as one of the three shapes the configuration surface
/// accepts.
///
/// Serializes untagged, so the JSON forms are a bare number, a bare string,
/// or an object of date parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiry {
    /// Number of days from the moment of the write. Fractions are allowed.
    Days(f64),

    /// An absolute date/time string. Accepted formats: the cookie `expires`
    /// shape (`Wed, 21 Oct 2015 07:28:00 GMT`), RFC 2822, RFC 3339.
    Absolute(String),

    /// Date parts assembled into a concrete UTC instant.
    Parts(DateParts),
}

/// Optional date parts, e.g. `DateParts { year: Some(2018), month: Some(11),
/// day: Some(31), ..Default::default() }`.
///
/// Omitted fields default to the start of the epoch scale: year 1970,
/// month 0, day 1, zero time of day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: Option<i32>,

    /// Zero-based: 0 is January, 11 is December.
    pub month: Option<u8>,

    /// One-based day of month.
    pub day: Option<u8>,

    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub millisecond: Option<u16>,
}
