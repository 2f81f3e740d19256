//! Hosted store access
//!
//! Auth and row storage are delegated to a Supabase-style backend; this
//! module holds the HTTP client for it and the session storage it needs.
//! Nothing in [`crate::aggregate`] touches this layer.

mod session;
mod supabase;

pub use session::{default_session_path, Session, SessionStore};
pub use supabase::SupabaseStore;
