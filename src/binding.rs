//! Declarative single-cookie binding.
//!
//! [`CookieBinding`] tracks one named cookie in an ambient store and keeps a
//! bound value in sync. Explicit setter-driven transitions replace a host
//! framework's property observers:
//!
//! - changing the tracked `name` re-reads the store into the bound value
//!   (unless `manual_get`);
//! - changing the bound `value`, the `expires` attribute, or the `secure`
//!   flag writes the cookie back (unless `manual_set`);
//! - [`get_cookie`](CookieBinding::get_cookie) and
//!   [`set_cookie`](CookieBinding::set_cookie) force the operation
//!   regardless of the manual gates.
//!
//! Every transition performs at most one read or one write, synchronously,
//! before the setter returns. A write while `name` or `value` is still
//! unset is a silent no-op.
//!
//! ```rust
//! use std::sync::Arc;
//! use document_cookie::{CookieBinding, InMemoryCookieStore};
//!
//! let store = Arc::new(InMemoryCookieStore::new());
//! let mut session = CookieBinding::builder(store).name("session").build();
//!
//! session.set_value("abc123").unwrap();
//! assert_eq!(session.value(), Some("abc123"));
//! ```

use time::OffsetDateTime;

use crate::codec::{format_cookie, read_cookie};
use crate::directive::{CookieDirective, Expiry};
use crate::errors::CookieError;
use crate::store::CookieStoreHandle;

/// Binds one named cookie in a [`DocumentCookieStore`] to a value.
///
/// [`DocumentCookieStore`]: crate::store::DocumentCookieStore
pub struct CookieBinding {
    name: Option<String>,
    value: Option<String>,
    expires: Option<Expiry>,
    path: String,
    secure: bool,
    uri_safe: bool,
    manual_get: bool,
    manual_set: bool,
    store: CookieStoreHandle,
}

impl CookieBinding {
    /// Starts building a binding over `store`.
    pub fn builder(store: CookieStoreHandle) -> CookieBindingBuilder {
        CookieBindingBuilder {
            store,
            name: None,
            value: None,
            expires: None,
            path: "/".to_string(),
            secure: false,
            uri_safe: false,
            manual_get: false,
            manual_set: false,
        }
    }

    /// A binding with all defaults: no name, no value, path `/`, automatic
    /// reads and writes.
    pub fn new(store: CookieStoreHandle) -> Self {
        Self::builder(store).build()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The bound value. `None` until a value is set or a read populates it;
    /// a read miss populates it with `""`.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn expires(&self) -> Option<&Expiry> {
        self.expires.as_ref()
    }

    pub fn secure(&self) -> bool {
        self.secure
    }

    pub fn uri_safe(&self) -> bool {
        self.uri_safe
    }

    /// Tracks a different cookie name. Re-reads the store into the bound
    /// value unless `manual_get` is set.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        if !self.manual_get {
            self.read_into_value();
        }
    }

    /// Changes the bound value. Writes the cookie back unless `manual_set`
    /// is set.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<(), CookieError> {
        self.value = Some(value.into());
        if self.manual_set {
            return Ok(());
        }
        self.write()
    }

    /// Changes the expiry attribute. Rewrites the cookie unless `manual_set`
    /// is set.
    pub fn set_expires(&mut self, expires: Option<Expiry>) -> Result<(), CookieError> {
        self.expires = expires;
        if self.manual_set {
            return Ok(());
        }
        self.write()
    }

    /// Changes the secure flag. Rewrites the cookie unless `manual_set` is
    /// set.
    pub fn set_secure(&mut self, secure: bool) -> Result<(), CookieError> {
        self.secure = secure;
        if self.manual_set {
            return Ok(());
        }
        self.write()
    }

    /// Changes the path attribute, used on the next write.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Changes the encoding mode, used on the next read or write.
    pub fn set_uri_safe(&mut self, uri_safe: bool) {
        self.uri_safe = uri_safe;
    }

    pub fn set_manual_get(&mut self, manual_get: bool) {
        self.manual_get = manual_get;
    }

    pub fn set_manual_set(&mut self, manual_set: bool) {
        self.manual_set = manual_set;
    }

    /// Forces a read of the named cookie into the bound value, regardless of
    /// `manual_get`. A miss stores `""`.
    pub fn get_cookie(&mut self) {
        self.read_into_value();
    }

    /// Forces a write of the current state to the store, regardless of
    /// `manual_set`. A silent no-op while `name` or `value` is unset.
    pub fn set_cookie(&mut self) -> Result<(), CookieError> {
        self.write()
    }

    fn read_into_value(&mut self) {
        let Some(name) = &self.name else {
            return;
        };
        let value = read_cookie(&self.store.raw(), name, self.uri_safe);
        log::debug!("read cookie {name:?} -> {value:?}");
        self.value = Some(value);
    }

    fn write(&self) -> Result<(), CookieError> {
        let (Some(name), Some(value)) = (&self.name, &self.value) else {
            return Ok(());
        };

        let directive = CookieDirective {
            name: name.clone(),
            value: value.clone(),
            expires: self.expires.clone(),
            path: self.path.clone(),
            secure: self.secure,
            uri_safe: self.uri_safe,
        };
        let cookie = format_cookie(&directive, OffsetDateTime::now_utc())?;
        log::debug!("write cookie {cookie:?}");
        self.store.set_raw(&cookie)?;
        Ok(())
    }
}

/// Builder for [`CookieBinding`]; one method per configuration attribute.
pub struct CookieBindingBuilder {
    store: CookieStoreHandle,
    name: Option<String>,
    value: Option<String>,
    expires: Option<Expiry>,
    path: String,
    secure: bool,
    uri_safe: bool,
    manual_get: bool,
    manual_set: bool,
}

impl CookieBindingBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn expires(mut self, expires: Expiry) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn uri_safe(mut self, uri_safe: bool) -> Self {
        self.uri_safe = uri_safe;
        self
    }

    pub fn manual_get(mut self, manual_get: bool) -> Self {
        self.manual_get = manual_get;
        self
    }

    pub fn manual_set(mut self, manual_set: bool) -> Self {
        self.manual_set = manual_set;
        self
    }

    /// Builds the binding. When a name is configured and `manual_get` is
    /// not, the initial value is read from the store, matching load-time
    /// behavior. Building never writes.
    pub fn build(self) -> CookieBinding {
        let mut binding = CookieBinding {
            name: self.name,
            value: self.value,
            expires: self.expires,
            path: self.path,
            secure: self.secure,
            uri_safe: self.uri_safe,
            manual_get: self.manual_get,
            manual_set: self.manual_set,
            store: self.store,
        };
        if binding.name.is_some() && !binding.manual_get {
            binding.read_into_value();
        }
        binding
    }
}
