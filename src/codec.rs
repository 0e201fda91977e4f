//! Cookie string encode/decode.
//!
//! The two operations at the heart of the crate:
//! - [`read_cookie`]: scans the ambient serialized cookie string (a
//!   semicolon-separated list of `key=value` pairs, keys possibly prefixed
//!   by spaces) for a single name and returns its value.
//! - [`format_cookie`]: serializes a [`CookieDirective`] into a
//!   store-compatible mutation string
//!   (`name=value[; expires=<UTC string>]; path=<path>[; secure]`).
//!
//! Both are pure; `now` is injected so expiry math is deterministic under
//! test. Committing the result to a store is the caller's job.

use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::directive::{CookieDirective, DateParts, Expiry};
use crate::errors::CookieError;

/// The classic cookie `expires` date shape: `Wed, 21 Oct 2015 07:28:00 GMT`.
const COOKIE_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Returns the value of the first `name=` pair in `raw`, or `""` if the
/// name is absent.
///
/// Leading spaces before each pair are tolerated; matching is exact key
/// equality followed by `=`. With `uri_safe`, the value is percent-decoded;
/// decoding is best-effort and falls back to the raw value.
pub fn read_cookie(raw: &str, name: &str, uri_safe: bool) -> String {
    for pair in raw.split(';') {
        let pair = pair.trim_start_matches(' ');
        let Some(value) = pair.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')) else {
            continue;
        };

        if !uri_safe {
            return value.to_string();
        }
        return match urlencoding::decode(value) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => {
                log::warn!("cookie {name:?} holds undecodable percent-escapes, returning it raw");
                value.to_string()
            }
        };
    }

    String::new()
}

/// Serializes `directive` into a single cookie-store mutation string.
///
/// Fails with [`CookieError::UnsafeValue`] if the (possibly encoded) value
/// still contains `;` or `=`, and with [`CookieError::InvalidExpiry`] if the
/// expiry cannot be resolved to an instant.
pub fn format_cookie(
    directive: &CookieDirective,
    now: OffsetDateTime,
) -> Result<String, CookieError> {
    let expires_at = match &directive.expires {
        Some(expiry) => Some(resolve_expiry(expiry, now)?),
        None => None,
    };

    let value = if directive.uri_safe {
        urlencoding::encode(&directive.value).into_owned()
    } else {
        directive.value.clone()
    };
    if value.contains(';') || value.contains('=') {
        return Err(CookieError::UnsafeValue);
    }

    let mut cookie = format!("{}={}", directive.name, value);
    if let Some(at) = expires_at {
        cookie.push_str("; expires=");
        cookie.push_str(&format_cookie_date(at)?);
    }
    cookie.push_str("; path=");
    cookie.push_str(&directive.path);
    if directive.secure {
        cookie.push_str("; secure");
    }

    Ok(cookie)
}

/// Resolves an [`Expiry`] to the absolute UTC instant it stands for.
pub fn resolve_expiry(expiry: &Expiry, now: OffsetDateTime) -> Result<OffsetDateTime, CookieError> {
    match expiry {
        Expiry::Days(days) => Duration::checked_seconds_f64(days * 86_400.0)
            .and_then(|offset| now.checked_add(offset))
            .ok_or_else(|| CookieError::InvalidExpiry(format!("day count {days} out of range"))),
        Expiry::Absolute(text) => parse_cookie_date(text)
            .ok_or_else(|| CookieError::InvalidExpiry(format!("unparseable date string {text:?}"))),
        Expiry::Parts(parts) => assemble_parts(parts),
    }
}

/// Formats an instant in the cookie `expires` shape, always in UTC.
pub fn format_cookie_date(at: OffsetDateTime) -> Result<String, CookieError> {
    at.to_offset(UtcOffset::UTC)
        .format(&COOKIE_DATE)
        .map_err(|e| CookieError::InvalidExpiry(e.to_string()))
}

/// Parses an absolute date/time string: cookie shape first, then RFC 2822,
/// then RFC 3339.
pub(crate) fn parse_cookie_date(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(dt) = PrimitiveDateTime::parse(text, &COOKIE_DATE) {
        return Some(dt.assume_utc());
    }
    if let Ok(dt) = OffsetDateTime::parse(text, &Rfc2822) {
        return Some(dt);
    }
    OffsetDateTime::parse(text, &Rfc3339).ok()
}

fn assemble_parts(parts: &DateParts) -> Result<OffsetDateTime, CookieError> {
    let out_of_range = |what: &str| CookieError::InvalidExpiry(format!("{what} part out of range"));

    // `month` is zero-based on the surface, one-based for `time`.
    let month = parts
        .month
        .unwrap_or(0)
        .checked_add(1)
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| out_of_range("month"))?;
    let date = Date::from_calendar_date(parts.year.unwrap_or(1970), month, parts.day.unwrap_or(1))
        .map_err(|_| out_of_range("day"))?;
    let time = Time::from_hms_milli(
        parts.hour.unwrap_or(0),
        parts.minute.unwrap_or(0),
        parts.second.unwrap_or(0),
        parts.millisecond.unwrap_or(0),
    )
    .map_err(|_| out_of_range("time-of-day"))?;

    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2015-10-21 07:28:00 UTC);

    #[test]
    fn read_misses_return_empty() {
        assert_eq!(read_cookie("", "session", false), "");
        assert_eq!(read_cookie("a=1; b=2", "session", false), "");
    }

    #[test]
    fn read_tolerates_leading_spaces_and_matches_exact_keys() {
        let raw = "session2=nope; session=abc123; other=x";
        assert_eq!(read_cookie(raw, "session", false), "abc123");

        // `session` must not match inside `session2`, and the space-prefixed
        // form must still match.
        assert_eq!(read_cookie("a=1;  session=abc", "session", false), "abc");
    }

    #[test]
    fn read_returns_first_match() {
        assert_eq!(read_cookie("dup=first; dup=second", "dup", false), "first");
    }

    #[test]
    fn read_decodes_when_uri_safe() {
        assert_eq!(read_cookie("k=x%3Dy", "k", true), "x=y");
        assert_eq!(read_cookie("k=x%3Dy", "k", false), "x%3Dy");
    }

    #[test]
    fn read_falls_back_to_raw_on_undecodable_value() {
        // %FF is not valid UTF-8 after decoding.
        assert_eq!(read_cookie("k=%FF", "k", true), "%FF");
    }

    #[test]
    fn format_emits_default_path_and_no_expires_for_session_cookies() {
        let d = CookieDirective::new("session", "abc123");
        assert_eq!(format_cookie(&d, NOW).unwrap(), "session=abc123; path=/");
    }

    #[test]
    fn format_emits_secure_flag() {
        let mut d = CookieDirective::new("session", "abc123");
        d.secure = true;
        d.path = "/app".to_string();
        assert_eq!(
            format_cookie(&d, NOW).unwrap(),
            "session=abc123; path=/app; secure"
        );
    }

    #[test]
    fn format_rejects_unescaped_delimiters() {
        for value in ["x=y", "x;y", "=leading", ";leading"] {
            let d = CookieDirective::new("k", value);
            assert!(matches!(
                format_cookie(&d, NOW),
                Err(CookieError::UnsafeValue)
            ));
        }
    }

    #[test]
    fn uri_safe_escapes_delimiters() {
        let mut d = CookieDirective::new("k", "x=y;z");
        d.uri_safe = true;
        let cookie = format_cookie(&d, NOW).unwrap();
        assert_eq!(cookie, "k=x%3Dy%3Bz; path=/");

        // And the reader round-trips it.
        assert_eq!(read_cookie(&cookie, "k", true), "x=y;z");
    }

    #[test]
    fn numeric_expiry_counts_days_from_now() {
        let mut d = CookieDirective::new("k", "v");
        d.expires = Some(Expiry::Days(1.0));
        let cookie = format_cookie(&d, NOW).unwrap();
        assert_eq!(
            cookie,
            "k=v; expires=Thu, 22 Oct 2015 07:28:00 GMT; path=/"
        );
    }

    #[test]
    fn fractional_days_are_allowed() {
        let expiry = Expiry::Days(0.5);
        let at = resolve_expiry(&expiry, NOW).unwrap();
        assert_eq!(at, NOW + Duration::hours(12));
    }

    #[test]
    fn non_finite_day_counts_are_an_error() {
        for days in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                resolve_expiry(&Expiry::Days(days), NOW),
                Err(CookieError::InvalidExpiry(_))
            ));
        }
    }

    #[test]
    fn overflowing_day_counts_are_an_error() {
        for days in [1e15, -1e15] {
            assert!(matches!(
                resolve_expiry(&Expiry::Days(days), NOW),
                Err(CookieError::InvalidExpiry(_))
            ));
        }
    }

    #[test]
    fn absolute_expiry_is_used_as_is() {
        let mut d = CookieDirective::new("k", "v");
        d.expires = Some(Expiry::Absolute("Wed, 01 Jan 2020 00:00:00 GMT".to_string()));
        let cookie = format_cookie(&d, NOW).unwrap();
        assert_eq!(
            cookie,
            "k=v; expires=Wed, 01 Jan 2020 00:00:00 GMT; path=/"
        );
    }

    #[test]
    fn absolute_expiry_accepts_rfc3339() {
        let at = resolve_expiry(&Expiry::Absolute("2020-01-01T00:00:00Z".to_string()), NOW).unwrap();
        assert_eq!(at, datetime!(2020-01-01 00:00:00 UTC));
    }

    #[test]
    fn unparseable_absolute_expiry_is_an_error() {
        let err = resolve_expiry(&Expiry::Absolute("not a date".to_string()), NOW).unwrap_err();
        assert!(matches!(err, CookieError::InvalidExpiry(_)));
    }

    #[test]
    fn date_parts_assemble_with_zero_based_month() {
        let parts = DateParts {
            year: Some(2018),
            month: Some(11),
            day: Some(31),
            ..Default::default()
        };
        let at = resolve_expiry(&Expiry::Parts(parts), NOW).unwrap();
        assert_eq!(at, datetime!(2018-12-31 00:00:00 UTC));
    }

    #[test]
    fn omitted_date_parts_default_to_epoch_start() {
        let at = resolve_expiry(&Expiry::Parts(DateParts::default()), NOW).unwrap();
        assert_eq!(at, datetime!(1970-01-01 00:00:00 UTC));
    }

    #[test]
    fn out_of_range_date_parts_are_an_error() {
        let parts = DateParts {
            year: Some(2018),
            month: Some(12), // only 0..=11 is valid
            ..Default::default()
        };
        assert!(matches!(
            resolve_expiry(&Expiry::Parts(parts), NOW),
            Err(CookieError::InvalidExpiry(_))
        ));

        let parts = DateParts {
            year: Some(2018),
            month: Some(1),
            day: Some(30), // no Feb 30
            ..Default::default()
        };
        assert!(matches!(
            resolve_expiry(&Expiry::Parts(parts), NOW),
            Err(CookieError::InvalidExpiry(_))
        ));
    }

    #[test]
    fn cookie_date_round_trips_through_the_parser() {
        let formatted = format_cookie_date(NOW).unwrap();
        assert_eq!(formatted, "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_cookie_date(&formatted), Some(NOW));
    }
}
