pub mod manager;
pub mod store;

pub use manager::{AuthState, SessionManager};
pub use store::SessionStore;
