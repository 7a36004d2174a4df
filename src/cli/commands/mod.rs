//! CLI command implementations
//!
//! Each command follows a consistent pattern with dedicated Args and Command
//! structs.

pub mod chat;
pub mod login;
pub mod logout;
pub mod market;
pub mod portfolio;
pub mod status;
pub mod watch;

use crate::api::ApiError;

/// Turn an unauthorized failure into a re-login hint; other errors pass
/// through unchanged
pub(crate) fn auth_hint(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow::anyhow!("session expired - run 'findash login' to sign in again")
    } else {
        err.into()
    }
}
