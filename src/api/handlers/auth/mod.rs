//! Account and session handling: signup, login, logout, token and cookie
//! plumbing, and the authenticated-principal extractor.

pub mod login;
pub mod principal;
pub mod session;
pub mod signup;
pub mod state;
pub(crate) mod storage;
pub mod token;
pub mod types;
pub(crate) mod utils;

pub use state::{AuthConfig, AuthState};
