//! Centralized configuration values shared across the code model crates.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// SOURCE LOCATION CONSTANTS
// =============================================================================

/// Sentinel line number used when the front end does not report lines.
///
/// # Examples
/// ```
/// use config::constants::UNKNOWN_LINE;
/// assert!(UNKNOWN_LINE < 0);
/// ```
pub const UNKNOWN_LINE: i32 = -1;

// =============================================================================
// RENDERING CONSTANTS
// =============================================================================

/// Longest presence condition rendered verbatim by the tree printer.
///
/// Longer conditions are replaced by [`TRUNCATED_CONDITION`].
///
/// # Examples
/// ```
/// use config::constants::CONDITION_DISPLAY_LIMIT;
/// assert_eq!(CONDITION_DISPLAY_LIMIT, 64);
/// ```
pub const CONDITION_DISPLAY_LIMIT: usize = 64;

/// Placeholder printed instead of an over-long condition.
pub const TRUNCATED_CONDITION: &str = "...";

/// Indentation unit used per nesting level by the tree printer.
///
/// # Examples
/// ```
/// use config::constants::RENDER_INDENT;
/// assert_eq!(RENDER_INDENT.repeat(2), "\t\t");
/// ```
pub const RENDER_INDENT: &str = "\t";

// =============================================================================
// RECURSION CONSTANTS
// =============================================================================

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = STACKER_STACK_SIZE_BYTES / 8;

// =============================================================================
// CACHE CONSTANTS
// =============================================================================

/// Format version written into every serialized tree.
///
/// Readers reject documents carrying any other version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// File extension of cache entries.
pub const CACHE_FILE_EXTENSION: &str = "json";

// =============================================================================
// CONVERTER CONFIGURATION
// =============================================================================

/// What the converter does with a translation unit whose kind it does not know.
///
/// # Examples
/// ```
/// use config::constants::UnknownKindPolicy;
/// assert_eq!(UnknownKindPolicy::default(), UnknownKindPolicy::Placeholder);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKindPolicy {
    /// Emit a warning diagnostic and leave an error placeholder in the tree.
    #[default]
    Placeholder,
    /// Drop the unit silently (it is still logged at debug level).
    Skip,
}

/// Immutable snapshot of converter settings.
///
/// # Examples
/// ```
/// use config::constants::{ConverterConfig, UnknownKindPolicy};
/// let config = ConverterConfig::new(UnknownKindPolicy::Skip);
/// assert_eq!(config.unknown_kinds, UnknownKindPolicy::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConverterConfig {
    /// Handling of unrecognized translation unit kinds.
    pub unknown_kinds: UnknownKindPolicy,
}

impl ConverterConfig {
    pub const fn new(unknown_kinds: UnknownKindPolicy) -> Self {
        Self { unknown_kinds }
    }
}

// =============================================================================
// RENDER CONFIGURATION
// =============================================================================

/// Immutable snapshot of tree printer settings.
///
/// # Examples
/// ```
/// use config::constants::{RenderConfig, CONDITION_DISPLAY_LIMIT};
/// assert_eq!(RenderConfig::default().condition_display_limit, CONDITION_DISPLAY_LIMIT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Conditions longer than this are elided by the tree printer.
    pub condition_display_limit: usize,
}

impl RenderConfig {
    /// Builds a configuration, rejecting a display limit too short to hold
    /// the truncation marker.
    ///
    /// # Examples
    /// ```
    /// use config::constants::RenderConfig;
    /// let cfg = RenderConfig::new(32).expect("valid config");
    /// assert_eq!(cfg.condition_display_limit, 32);
    /// assert!(RenderConfig::new(1).is_err());
    /// ```
    pub fn new(condition_display_limit: usize) -> Result<Self, ConfigError> {
        if condition_display_limit < TRUNCATED_CONDITION.len() {
            return Err(ConfigError::DisplayLimitTooSmall(condition_display_limit));
        }
        Ok(Self {
            condition_display_limit,
        })
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            condition_display_limit: CONDITION_DISPLAY_LIMIT,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the condition display limit cannot hold the truncation marker.
    DisplayLimitTooSmall(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DisplayLimitTooSmall(value) => {
                write!(
                    f,
                    "condition_display_limit must be >= {}: {value}",
                    TRUNCATED_CONDITION.len()
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}
