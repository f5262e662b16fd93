//! # Presence Condition Formulas
//!
//! Immutable boolean expressions over named configuration variables. The code
//! model only needs conjunction, negation, a `True` constant and structural
//! equality; disjunction and `False` are provided for front ends that compute
//! effective `#elif`/`#else` conditions.
//!
//! ## Usage
//!
//! ```rust
//! use formula::Formula;
//!
//! let pc = Formula::var("CONFIG_A").and(&Formula::var("CONFIG_B").not());
//! assert_eq!(pc.to_string(), "CONFIG_A && !CONFIG_B");
//! assert_eq!(pc, Formula::var("CONFIG_A").and(&!Formula::var("CONFIG_B")));
//! ```
//!
//! ## Design Principles
//!
//! - **Structural**: `and` never simplifies, so equality is syntactic
//! - **Cheap clones**: operands are shared behind `Arc`
//! - **Serializable**: derives `serde` for the JSON cache

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A boolean formula.
///
/// # Example
///
/// ```rust
/// use formula::Formula;
///
/// assert!(Formula::TRUE.is_true());
/// assert!(!Formula::var("X").is_true());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    /// Tautology.
    True,
    /// Contradiction.
    False,
    /// A named configuration variable (e.g. a `#define`d macro).
    Variable(String),
    /// Negation.
    Not(Arc<Formula>),
    /// Conjunction.
    And(Arc<Formula>, Arc<Formula>),
    /// Disjunction.
    Or(Arc<Formula>, Arc<Formula>),
}

impl Formula {
    /// The `True` sentinel used for code outside any conditional block.
    pub const TRUE: Formula = Formula::True;

    /// The `False` constant.
    pub const FALSE: Formula = Formula::False;

    /// Creates a variable formula.
    pub fn var(name: impl Into<String>) -> Self {
        Formula::Variable(name.into())
    }

    /// Conjunction of `self` and `other`, without simplification.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formula::Formula;
    ///
    /// let f = Formula::TRUE.and(&Formula::var("A"));
    /// assert_ne!(f, Formula::var("A"));
    /// ```
    pub fn and(&self, other: &Formula) -> Formula {
        Formula::And(Arc::new(self.clone()), Arc::new(other.clone()))
    }

    /// Disjunction of `self` and `other`, without simplification.
    pub fn or(&self, other: &Formula) -> Formula {
        Formula::Or(Arc::new(self.clone()), Arc::new(other.clone()))
    }

    /// Negation of `self`.
    #[allow(clippy::should_implement_trait)]
    pub fn not(&self) -> Formula {
        Formula::Not(Arc::new(self.clone()))
    }

    /// Returns true for the `True` constant only.
    pub fn is_true(&self) -> bool {
        matches!(self, Formula::True)
    }

    /// Collects variable names in first-occurrence order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formula::Formula;
    ///
    /// let f = Formula::var("A").and(&Formula::var("B").or(&Formula::var("A")));
    /// assert_eq!(f.variables(), vec!["A", "B"]);
    /// ```
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Formula::True | Formula::False => {}
            Formula::Variable(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Formula::Not(inner) => inner.collect_variables(out),
            Formula::And(left, right) | Formula::Or(left, right) => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Or(..) => 1,
            Formula::And(..) => 2,
            _ => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, parent: u8) -> fmt::Result {
        if self.precedence() < parent {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl std::ops::Not for Formula {
    type Output = Formula;

    fn not(self) -> Formula {
        Formula::Not(Arc::new(self))
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::True => write!(f, "1"),
            Formula::False => write!(f, "0"),
            Formula::Variable(name) => write!(f, "{name}"),
            Formula::Not(inner) => {
                write!(f, "!")?;
                inner.fmt_operand(f, 3)
            }
            Formula::And(left, right) => {
                left.fmt_operand(f, 2)?;
                write!(f, " && ")?;
                right.fmt_operand(f, 2)
            }
            Formula::Or(left, right) => {
                left.fmt_operand(f, 1)?;
                write!(f, " || ")?;
                right.fmt_operand(f, 1)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_constants() {
        assert_eq!(Formula::TRUE.to_string(), "1");
        assert_eq!(Formula::FALSE.to_string(), "0");
    }

    #[test]
    fn test_display_conjunction_chain() {
        let f = Formula::var("A").and(&Formula::var("B")).and(&Formula::var("C"));
        assert_eq!(f.to_string(), "A && B && C");
    }

    #[test]
    fn test_display_parenthesizes_or_inside_and() {
        let f = Formula::var("A").and(&Formula::var("B").or(&Formula::var("C")));
        assert_eq!(f.to_string(), "A && (B || C)");
    }

    #[test]
    fn test_display_negated_compound() {
        let f = Formula::var("A").and(&Formula::var("B")).not();
        assert_eq!(f.to_string(), "!(A && B)");
        assert_eq!(Formula::var("A").not().to_string(), "!A");
    }

    #[test]
    fn test_and_is_structural() {
        let a = Formula::var("A");
        let b = Formula::var("B");
        assert_eq!(a.and(&b), a.and(&b));
        assert_ne!(a.and(&b), b.and(&a));
    }

    #[test]
    fn test_not_operator_matches_method() {
        assert_eq!(!Formula::var("X"), Formula::var("X").not());
    }

    #[test]
    fn test_serde_roundtrip() {
        let f = Formula::var("A").and(&!Formula::var("B")).or(&Formula::TRUE);
        let json = serde_json::to_string(&f).unwrap();
        let back: Formula = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
    }
}
