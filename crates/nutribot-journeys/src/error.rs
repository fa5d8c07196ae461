//! Journey error types.
//!
//! Input a step cannot understand is not an error: the step re-prompts with
//! a plain `Ok` reply.  [`JourneyError`] is reserved for conditions the
//! orchestrator has to recover from.

use nutribot_kernel::JourneyKind;

/// Unified error type for journey step handlers.
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    // -- Dispatch -----------------------------------------------------------
    /// The session points at a step the journey does not have.
    #[error("{journey} has no step {step}")]
    StepOutOfRange { journey: JourneyKind, step: u32 },

    /// A step expected an artifact an earlier step should have stored.
    #[error("missing journey state: {what}")]
    MissingState { what: String },

    // -- Upstream crate errors ----------------------------------------------
    /// An error propagated from the session store.
    #[error("store error: {0}")]
    Store(#[from] nutribot_store::StoreError),

    /// An error propagated from the planning algorithms.
    #[error("planner error: {0}")]
    Planner(#[from] nutribot_planner::PlannerError),

    /// An error propagated from the catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] nutribot_catalog::CatalogError),

    // -- Serialization ------------------------------------------------------
    /// JSON serialization or deserialization of a payload failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JourneyError {
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Self::MissingState { what: what.into() }
    }
}

/// Convenience alias used throughout the journeys crate.
pub type Result<T> = std::result::Result<T, JourneyError>;
