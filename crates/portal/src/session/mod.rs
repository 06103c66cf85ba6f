//! Session tracking module.
//!
//! Cookie-identified sessions carrying login state and the pending CAPTCHA.

mod cookie;
mod store;

pub use cookie::{clear_cookie, session_cookie, session_id_from_headers};
pub use store::{Session, SessionStore, session_sweeper};
