//! Agent error types.
//!
//! Journey failures never reach the caller of
//! [`Orchestrator::handle`](crate::Orchestrator::handle): the turn is rolled
//! back and the user gets an apology.  [`AgentError`] surfaces from setup
//! and from session lookups.

use nutribot_kernel::JourneyKind;

/// Unified error type for the agent runtime.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    // -- Session errors -----------------------------------------------------
    /// No session exists under the given id.
    #[error("unknown session: {session_id}")]
    UnknownSession { session_id: String },

    /// The classifier routed to a journey the orchestrator has no handler
    /// for.
    #[error("no journey registered for {kind}")]
    JourneyNotRegistered { kind: JourneyKind },

    // -- Configuration errors -----------------------------------------------
    /// Configuration validation or loading failed.
    #[error("config error: {reason}")]
    Config { reason: String },

    // -- Upstream crate errors ----------------------------------------------
    /// An error propagated from the kernel crate.
    #[error("kernel error: {0}")]
    Kernel(#[from] nutribot_kernel::KernelError),

    /// An error propagated from the session store.
    #[error("store error: {0}")]
    Store(#[from] nutribot_store::StoreError),

    /// An error propagated from the catalog.
    #[error("catalog error: {0}")]
    Catalog(#[from] nutribot_catalog::CatalogError),

    /// An error raised by a journey step.
    #[error("journey error: {0}")]
    Journey(#[from] nutribot_journeys::JourneyError),
}

/// Convenience alias used throughout the agent crate.
pub type Result<T> = std::result::Result<T, AgentError>;
