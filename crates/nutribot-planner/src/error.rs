//! Planner error types.
//!
//! Planning itself never fails for lack of matches: the generator relaxes
//! its filters and finally synthesizes placeholders.  Errors are reserved
//! for requests that cannot be planned at all.

/// Unified error type for the planning algorithms.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    // -- Request validation -------------------------------------------------
    /// The request is structurally unusable (zero days, no meal types...).
    #[error("invalid planning request: {reason}")]
    InvalidRequest { reason: String },

    // -- Upstream crate errors ----------------------------------------------
    /// An error propagated from the catalog crate.
    #[error("catalog error: {0}")]
    Catalog(#[from] nutribot_catalog::CatalogError),
}

/// Convenience alias used throughout the planner crate.
pub type Result<T> = std::result::Result<T, PlannerError>;
