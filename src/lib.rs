pub mod binding;
pub mod codec;
pub mod directive;
pub mod errors;
pub mod store;

pub use binding::{CookieBinding, CookieBindingBuilder};
pub use directive::{CookieDirective, DateParts, Expiry};
pub use errors::CookieError;
pub use store::{CookieStoreHandle, DocumentCookieStore, InMemoryCookieStore, JsonCookieStore};
