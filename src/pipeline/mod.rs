//! Detection pipeline and its entry points.
//!
//! - `identity`: stable listing identifiers
//! - `normalize`: listing extraction from varying response shapes
//! - `cycle`: the mark-then-notify watch cycle
//! - `run_watch`: one cycle against the configured API, state and mailbox
//! - `run_validate` / `run_info`: configuration and state reporting

pub mod cycle;
pub mod identity;
pub mod info;
pub mod normalize;
pub mod validate;
pub mod watch;

pub use cycle::{CycleMode, CycleOptions, CycleSummary, StopReason, WatchCycle};
pub use info::run_info;
pub use validate::run_validate;
pub use watch::{RunOptions, run_watch};
