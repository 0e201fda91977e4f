//! Ambient cookie store infrastructure.
//!
//! A **cookie store** is the `document.cookie` model: the whole store reads
//! back as one serialized string of `key=value` pairs, and a single
//! assignment of a serialized cookie is interpreted as an upsert (or a
//! delete, when the mutation carries an `expires` attribute that is already
//! in the past) of that named cookie.
//!
//! The trait exists so the binding can run against an injected capability:
//! [`InMemoryCookieStore`] in tests and simple setups, [`JsonCookieStore`]
//! when the pairs should survive the process.

mod in_memory;
mod json;

use std::sync::Arc;

use anyhow::Result;
use time::OffsetDateTime;

pub use in_memory::InMemoryCookieStore;
pub use json::JsonCookieStore;

use crate::codec;

/// Object-safe handle to an ambient cookie store.
///
/// Implementations must be `Send + Sync` and internally synchronized; the
/// trait methods take `&self`.
pub trait DocumentCookieStore: Send + Sync {
    /// Current serialized cookie string (`a=1; b=2`), live pairs only.
    fn raw(&self) -> String;

    /// Commits one serialized cookie mutation, e.g.
    /// `session=abc123; expires=Wed, 21 Oct 2015 07:28:00 GMT; path=/; secure`.
    ///
    /// Attributes other than `expires` are accepted and ignored; the store
    /// keeps only live `name=value` pairs.
    fn set_raw(&self, cookie: &str) -> Result<()>;
}

/// A reference-counted pointer to a type-erased [`DocumentCookieStore`].
pub type CookieStoreHandle = Arc<dyn DocumentCookieStore + Send + Sync>;

/// One committed mutation, reduced to what the store acts on.
struct Mutation {
    name: String,
    value: String,
    /// The mutation carried an `expires` attribute that is already past.
    expired: bool,
}

/// Parses a serialized cookie mutation. Returns `None` when the leading
/// segment is not a `name=value` pair, which stores treat as a no-op.
fn parse_mutation(cookie: &str, now: OffsetDateTime) -> Option<Mutation> {
    let mut segments = cookie.split(';');
    let (name, value) = segments.next()?.split_once('=')?;

    let mut expired = false;
    for attr in segments {
        if let Some((key, val)) = attr.trim().split_once('=') {
            if key.eq_ignore_ascii_case("expires") {
                if let Some(at) = codec::parse_cookie_date(val) {
                    expired = at <= now;
                }
            }
        }
        // path, secure and unknown attributes are scoping hints for a real
        // user agent; this store keeps pairs only.
    }

    Some(Mutation {
        name: name.trim().to_string(),
        value: value.to_string(),
        expired,
    })
}

/// Applies a mutation to an ordered pair list: upsert in place, delete on
/// past expiry.
fn apply_mutation(pairs: &mut Vec<(String, String)>, mutation: Mutation) {
    if mutation.expired {
        pairs.retain(|(name, _)| *name != mutation.name);
        return;
    }

    match pairs.iter_mut().find(|(name, _)| *name == mutation.name) {
        Some(entry) => entry.1 = mutation.value,
        None => pairs.push((mutation.name, mutation.value)),
    }
}

fn render_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2015-10-21 07:28:00 UTC);

    #[test]
    fn upsert_replaces_in_place_and_keeps_order() {
        let mut pairs = Vec::new();
        for cookie in ["a=1; path=/", "b=2; path=/", "a=ONE; path=/"] {
            apply_mutation(&mut pairs, parse_mutation(cookie, NOW).unwrap());
        }
        assert_eq!(render_pairs(&pairs), "a=ONE; b=2");
    }

    #[test]
    fn past_expiry_deletes_the_named_cookie() {
        let mut pairs = vec![("a".to_string(), "1".to_string())];
        let cookie = "a=gone; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/";
        apply_mutation(&mut pairs, parse_mutation(cookie, NOW).unwrap());
        assert!(pairs.is_empty());
    }

    #[test]
    fn future_expiry_is_a_plain_upsert() {
        let mut pairs = Vec::new();
        let cookie = "a=1; expires=Fri, 01 Jan 2100 00:00:00 GMT; path=/; secure";
        apply_mutation(&mut pairs, parse_mutation(cookie, NOW).unwrap());
        assert_eq!(render_pairs(&pairs), "a=1");
    }

    #[test]
    fn nameless_mutation_is_ignored() {
        assert!(parse_mutation("no delimiter here", NOW).is_none());
    }
}
