//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`EffectError`, `BuffError`, `CombatError`, ...) live
//! next to the operations that raise them. This module provides the shared
//! classification every one of them implements.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each component has its own error enum with specific variants
//! - **Stable Codes**: Every variant maps to a `SCREAMING_SNAKE` code the
//!   surrounding application can localize without inspecting internals
//! - **Category Classification**: Errors are grouped by how callers must react

/// How an error must be handled by the caller.
///
/// - **Configuration**: Static content is malformed. Abort startup validation
///   or the single offending action, never degrade silently.
/// - **Precondition**: An expected rejection (run already active, invalid
///   choice, quota exhausted). Reported to the caller, no retry.
/// - **InvariantViolation**: Internal state broke a rule it must never break.
///   Indicates a bug and must be surfaced loudly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// Malformed catalog data or configuration.
    ///
    /// Examples: unknown effect kind, template referencing a missing effect
    Configuration,

    /// Expected rejection of a well-formed request.
    ///
    /// Examples: run already active, invalid choice, quota exhausted
    Precondition,

    /// Broken internal invariant.
    ///
    /// Examples: two live instances of a non-independent buff, negative
    /// quota consumption
    InvariantViolation,
}

impl ErrorCategory {
    /// Returns a human-readable description of this category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Precondition => "precondition",
            Self::InvariantViolation => "invariant_violation",
        }
    }

    /// Returns true if the caller may surface this error as a plain rejection.
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::Precondition)
    }

    /// Returns true if this error indicates a bug or broken content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Configuration | Self::InvariantViolation)
    }
}

/// Common trait for all game-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Codes are part of the public contract: never rename an existing code
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the category of this error.
    fn category(&self) -> ErrorCategory;

    /// Returns a stable string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}
