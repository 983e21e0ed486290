//! # Flock (Social Graph Backend)
//!
//! `flock` is a social-networking backend: user accounts, cookie-based
//! session authentication, and a bidirectional follow graph with derived
//! notifications and follow suggestions.
//!
//! ## Identity & Sessions
//!
//! Passwords are stored as salted bcrypt hashes and never serialized back
//! out; every user-facing payload is a public projection with the hash
//! stripped. Sessions are stateless `HS256` tokens carried in an `HttpOnly`,
//! `SameSite=Strict` cookie. There is no server-side revocation list; logout
//! clears the cookie and a stolen token stays valid until natural expiry.
//!
//! ## Follow Graph
//!
//! The graph is denormalized as two mirrored `UUID[]` columns per user
//! (`followers`, `following`). A follow or unfollow touches two rows with two
//! independent statements, so a crash between them leaves the edge
//! half-applied until the next transition repairs it. Array updates are
//! guarded so concurrent duplicate follows cannot double-add an id.
//!
//! ## Suggestions
//!
//! Suggested users are drawn from a fixed random pool of 10 candidates,
//! filtered against the caller's `following` set, and truncated to 4. The
//! pool is sampled before filtering, so heavy overlap with existing follows
//! can return fewer than 4 rows; that shortfall is the intended contract.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
