pub mod api;
pub mod capability;
pub mod session;

pub use api::{AuthApi, HttpAuthApi};
pub use capability::{decode_payload, CapabilityResolver};
pub use session::SessionStore;
