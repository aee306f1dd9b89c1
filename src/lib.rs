//! Hydro Pace - On-device pacing and history engine for daily fluid intake
//!
//! Hydro Pace turns a snapshot of timestamped intake entries and a small
//! settings object into a live pacing status and historical summaries through
//! deterministic, side-effect-free computations:
//! day slicing → expected-intake curve → classification → checkpoint guidance,
//! plus seven-day and calendar-month aggregation.
//!
//! ## Modules
//!
//! - **Today**: expected intake by now, on-pace classification, next-checkpoint guidance
//! - **History**: weekly totals with a goal streak, monthly heatmap grid
//!
//! The engine performs no I/O. Callers fetch a snapshot through [`EntrySource`]
//! and re-invoke the computations whenever the view is stale (for example once
//! per minute).

pub mod error;
pub mod guidance;
pub mod monthly;
pub mod pacing;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod types;
pub mod weekly;
pub mod window;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use error::ComputeError;
pub use guidance::{next_checkpoint_guidance, round_up_to_quick};
pub use monthly::monthly_grid;
pub use pacing::{classify, expected_by_now, PACE_THRESHOLD_ML};
pub use pipeline::{monthly_summary, today_status, weekly_summary, HydrationTracker};
pub use settings::Settings;
pub use store::{EntrySource, MemoryStore};
pub use types::{DrinkType, Entry, PacingLabel};
pub use weekly::weekly_stats;

/// Library version
pub const HYDRO_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name reported by the CLI and FFI
pub const PRODUCER_NAME: &str = "hydro-pace";
