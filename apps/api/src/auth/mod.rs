// Session-backed authentication: argon2 password hashes, a server-side
// sessions table, and an extractor that turns the session cookie into an
// explicit per-request capability passed to handlers.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod store;
