use std::sync::Arc;

use document_cookie::{
    CookieBinding, DateParts, DocumentCookieStore, Expiry, InMemoryCookieStore, JsonCookieStore,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = Arc::new(InMemoryCookieStore::new());

    let mut session = CookieBinding::builder(store.clone())
        .name("session")
        .uri_safe(true)
        .build();
    session.set_value("user=alice; theme=dark")?;
    println!("store after write: {}", store.raw());

    session.get_cookie();
    println!("value read back:   {:?}", session.value());

    // A persistent store keeps the pairs in a JSON file between runs.
    let path = std::env::temp_dir().join("watch_cookie.json");
    let persistent = Arc::new(JsonCookieStore::new(path.clone()));

    let mut consent = CookieBinding::builder(persistent.clone())
        .name("consent")
        .expires(Expiry::Parts(DateParts {
            year: Some(2030),
            month: Some(0),
            day: Some(1),
            ..Default::default()
        }))
        .build();
    consent.set_value("granted")?;
    println!("persistent store:  {}", persistent.raw());
    println!("written to:        {}", path.display());

    Ok(())
}
