//! NutriBot kernel.
//!
//! The smallest crate in the workspace.  It owns the vocabulary every other
//! crate speaks:
//!
//! - **[`journey`]** -- [`JourneyKind`], the closed set of multi-turn
//!   journeys a conversation can be routed into.
//! - **[`classifier`]** -- Priority-ordered regex classifier that maps free
//!   text to a [`JourneyKind`] (or nothing).
//! - **[`error`]** -- Kernel error types via [`thiserror`].
//!
//! All public types are `Send + Sync`; a single [`IntentClassifier`] is built
//! at startup and shared by every session.

pub mod classifier;
pub mod error;
pub mod journey;

pub use classifier::{Classification, IntentClassifier};
pub use error::{KernelError, Result};
pub use journey::JourneyKind;
