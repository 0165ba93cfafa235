//! # winch_core - Winch Drum Spooling & Drivetrain Sizing Engine
//!
//! `winch_core` is the computational heart of Winchcalc: given drum
//! geometry, cable properties, payload and a chosen drivetrain (electric or
//! hydraulic), it derives, wrap by wrap and layer by layer, the tension,
//! torque, achievable line speed and available capacity of the machine
//! across its full spooling range.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: one pure entry point, [`calculations::compute`] — same
//!   configuration in, bit-identical model out
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Never panics on bad numbers**: invalid numeric input is sanitized to
//!   neutral defaults; hard failures exist only at the request/persistence
//!   boundary
//! - **Rich Errors**: structured error types at those boundaries, not
//!   strings
//!
//! ## Quick Start
//!
//! ```rust
//! use winch_core::calculations::compute;
//! use winch_core::project::BUILTIN_PRESETS;
//!
//! let model = compute(&BUILTIN_PRESETS[0].config);
//! println!(
//!     "{} layers, {} wraps, capacity {:.0} m",
//!     model.summary.layer_count, model.summary.wrap_count, model.summary.drum_capacity_m
//! );
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - geometry engine, drivetrain passes, layer aggregator
//! - [`config`] - configuration types and input sanitizing
//! - [`units`] - physical constants and conversion formulas
//! - [`request`] - JSON request validation for the HTTP boundary
//! - [`project`] - preset/project container
//! - [`file_io`] - file operations with atomic saves and locking
//! - [`errors`] - structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod project;
pub mod request;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{compute, ComputationModel, WrapRow};
pub use config::{DrivetrainType, WinchConfig};
pub use errors::{WinchError, WinchResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{Preset, Project, ProjectMetadata};
pub use request::{parse_request, ComputeRequest, ComputeResponse};
