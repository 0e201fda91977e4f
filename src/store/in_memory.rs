use std::sync::Mutex;

use anyhow::Result;
use time::OffsetDateTime;

use crate::store::{apply_mutation, parse_mutation, render_pairs, DocumentCookieStore};

/// In-memory cookie store (no persistence). The default store and the test
/// double for anything that takes a [`CookieStoreHandle`].
///
/// [`CookieStoreHandle`]: crate::store::CookieStoreHandle
#[derive(Default)]
pub struct InMemoryCookieStore {
    pairs: Mutex<Vec<(String, String)>>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentCookieStore for InMemoryCookieStore {
    fn raw(&self) -> String {
        render_pairs(&self.pairs.lock().unwrap())
    }

    fn set_raw(&self, cookie: &str) -> Result<()> {
        let mut pairs = self.pairs.lock().unwrap();
        match parse_mutation(cookie, OffsetDateTime::now_utc()) {
            Some(mutation) => apply_mutation(&mut pairs, mutation),
            None => log::warn!("ignoring cookie mutation without a name=value head: {cookie:?}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let store = InMemoryCookieStore::new();
        assert_eq!(store.raw(), "");
    }

    #[test]
    fn set_get_overwrite() {
        let store = InMemoryCookieStore::new();
        store.set_raw("a=1; path=/").unwrap();
        store.set_raw("b=2; path=/").unwrap();
        assert_eq!(store.raw(), "a=1; b=2");

        store.set_raw("a=ONE; path=/").unwrap();
        assert_eq!(store.raw(), "a=ONE; b=2");
    }

    #[test]
    fn past_expiry_removes() {
        let store = InMemoryCookieStore::new();
        store.set_raw("a=1; path=/").unwrap();
        store
            .set_raw("a=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/")
            .unwrap();
        assert_eq!(store.raw(), "");
    }
}
