//! # Tests for Config Constants
//!
//! Unit tests verifying the sanity of the shared constants.

use crate::constants::*;

// =============================================================================
// LOCATION TESTS
// =============================================================================

#[test]
fn test_unknown_line_is_negative() {
    assert_eq!(UNKNOWN_LINE, -1, "front ends without line info use -1");
}

// =============================================================================
// RENDERING TESTS
// =============================================================================

#[test]
fn test_display_limit_fits_marker() {
    assert!(CONDITION_DISPLAY_LIMIT > TRUNCATED_CONDITION.len());
}

#[test]
fn test_indent_is_single_tab() {
    assert_eq!(RENDER_INDENT, "\t");
}

// =============================================================================
// RECURSION TESTS
// =============================================================================

#[test]
fn test_red_zone_smaller_than_segment() {
    assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
}

// =============================================================================
// CACHE TESTS
// =============================================================================

#[test]
fn test_cache_version_is_positive() {
    assert!(CACHE_FORMAT_VERSION >= 1);
}

#[test]
fn test_cache_extension_has_no_dot() {
    assert!(!CACHE_FILE_EXTENSION.starts_with('.'));
}
