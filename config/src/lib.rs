//! # Config Crate
//!
//! Centralized configuration constants for the variability-aware code model.
//! Every tunable value shared between the converter, the renderer, the JSON
//! cache and the extraction harness is defined here so the crates never
//! scatter literals.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{RenderConfig, CONDITION_DISPLAY_LIMIT, UNKNOWN_LINE};
//!
//! let cfg = RenderConfig::default();
//! assert_eq!(cfg.condition_display_limit, CONDITION_DISPLAY_LIMIT);
//! assert_eq!(UNKNOWN_LINE, -1);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Validated Snapshots**: Runtime configuration is built through checked constructors
//! - **Dependency-Free**: Pure values, no external crates

pub mod constants;

#[cfg(test)]
mod tests;
