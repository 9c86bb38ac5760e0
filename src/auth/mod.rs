pub mod guard;
pub mod session;

pub use guard::{require, Access, Redirect};
pub use session::{AuthEvent, Session, SessionStore, ACCESS_TOKEN_COOKIE};
