//! Kernel error types.
//!
//! Everything in this crate reports failures through [`KernelError`].  The
//! variants are small and carry the offending input so callers can log or
//! surface them without string parsing.

/// Unified error type for the NutriBot kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    // -- Classifier errors --------------------------------------------------
    /// A regex pattern supplied to the classifier is invalid.
    #[error("invalid regex pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // -- Journey labels -----------------------------------------------------
    /// A journey label string did not name any known journey.
    #[error("unknown journey: {label}")]
    UnknownJourney { label: String },
}

/// Convenience alias used throughout the kernel crate.
pub type Result<T> = std::result::Result<T, KernelError>;
