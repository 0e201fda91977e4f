//! JSON-backed cookie store.
//!
//! `JsonCookieStore` keeps the same live-pair state as the in-memory store
//! and mirrors it to a single JSON file, rewriting the whole file on each
//! mutation. Loading tolerates a missing or corrupt file by starting empty.
//!
//! File writes are not atomic; this store is meant for simple setups, not
//! for contention between processes.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::store::{apply_mutation, parse_mutation, render_pairs, DocumentCookieStore};

/// On-disk representation of the store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CookieStoreFile {
    cookies: Vec<StoredCookie>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredCookie {
    name: String,
    value: String,
}

/// A JSON-file-backed cookie store that persists cookies across sessions.
pub struct JsonCookieStore {
    /// Path to the JSON file where cookies are stored.
    path: PathBuf,

    pairs: Mutex<Vec<(String, String)>>,
}

impl JsonCookieStore {
    /// Opens (or creates on first write) a JSON cookie store at `path`.
    pub fn new(path: PathBuf) -> Self {
        let pairs = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<CookieStoreFile>(&contents) {
                Ok(file) => file
                    .cookies
                    .into_iter()
                    .map(|c| (c.name, c.value))
                    .collect(),
                Err(e) => {
                    log::warn!("cookie store file {path:?} is corrupt, starting empty: {e}");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self {
            path,
            pairs: Mutex::new(pairs),
        }
    }

    fn save(&self, pairs: &[(String, String)]) -> Result<()> {
        let file = CookieStoreFile {
            cookies: pairs
                .iter()
                .map(|(name, value)| StoredCookie {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        };
        let contents = serde_json::to_string_pretty(&file).context("serializing cookie store")?;
        fs::write(&self.path, contents)
            .with_context(|| format!("writing cookie store file {:?}", self.path))
    }
}

impl DocumentCookieStore for JsonCookieStore {
    fn raw(&self) -> String {
        render_pairs(&self.pairs.lock().unwrap())
    }

    fn set_raw(&self, cookie: &str) -> Result<()> {
        let mut pairs = self.pairs.lock().unwrap();
        match parse_mutation(cookie, OffsetDateTime::now_utc()) {
            Some(mutation) => apply_mutation(&mut pairs, mutation),
            None => {
                log::warn!("ignoring cookie mutation without a name=value head: {cookie:?}");
                return Ok(());
            }
        }
        self.save(&pairs)
    }
}
