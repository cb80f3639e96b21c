//! WARP consistency checker.
//!
//! Menus of items are shown one at a time, the player picks from each, and
//! the resulting choices are checked pairwise against the Weak Axiom of
//! Revealed Preference.
//!
//! ```text
//! bundle::generate_bundles ──► session::Session ──► warp::evaluate_warp ──► render
//! ```

pub mod bundle;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod session;
pub mod sim;
pub mod warp;

pub use bundle::{generate_bundles, generate_bundles_sized, Bundle, Choice, Item, Trial};
pub use error::{ChoiceError, ConfigError, SimError};
pub use session::{is_complete, restart, start_session, submit_choice, Session, SessionState};
pub use warp::{evaluate, evaluate_warp, PairOutcome, ViolationReport, WarpVerdict};
