//! # nutribot-store
//!
//! Process-memory session storage for NutriBot.
//!
//! Nothing here touches disk: a restart loses every open conversation.
//! The crate is the single source of truth for which journey and step a
//! conversation is in and what it must remember between turns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  SessionStore (DashMap, one per process) │
//! ├─────────────────────────────────────────┤
//! │  Session                                 │
//! │   ├─ ContextMemory  (cross-journey)      │
//! │   ├─ JourneyState   (per journey run)    │
//! │   ├─ UserPreferences                     │
//! │   └─ conversation history                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```
//! use nutribot_kernel::JourneyKind;
//! use nutribot_store::SessionStore;
//!
//! let store = SessionStore::new();
//! let mut session = store.checkout("demo");
//! session.start_journey(JourneyKind::MealPlanning);
//! session.update_step(2, None);
//! store.commit(session);
//!
//! assert_eq!(store.checkout("demo").current_step, Some(2));
//! ```

pub mod error;
pub mod memory;
pub mod session;
pub mod state;
pub mod store;

// ── re-exports ───────────────────────────────────────────────────────

pub use error::{StoreError, StoreResult};
pub use memory::ContextMemory;
pub use session::{Message, Sender, Session, SessionSummary, UserPreferences};
pub use state::{Decision, JourneyState};
pub use store::SessionStore;
