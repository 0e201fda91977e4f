#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("value cannot contain ';' or '=' characters when uri_safe is not set")]
    UnsafeValue,

    #[error("invalid expiry: {0}")]
    InvalidExpiry(String),

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}
