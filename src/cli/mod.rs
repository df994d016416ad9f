//! CLI commands
//!
//! Command implementations for the `shale` binary.

mod auth;
mod progress;
mod style;
mod submit;
mod track;

pub use auth::{AuthAction, run_auth};
pub use submit::{SubmitOptions, run_submit};
pub use track::{run_track, run_untrack};
