//! The roster/team transition engine.
//!
//! All game rules live here, written once against the
//! [`RosterStore`](crate::dao::roster_store::RosterStore) abstraction so that
//! every storage backend exposes identical semantics. Callers are expected to
//! serialize mutating operations through the gate on
//! [`AppState`](crate::state::AppState); the engine itself performs every
//! precondition check before the first write.

/// Bulk assignment of free agents into teams.
pub mod auto_assign;
/// The game error taxonomy.
pub mod error;
/// The five roster operations, status, and the admin mutations.
pub mod rules;

pub use auto_assign::{AutoAssignOutcome, auto_assign_free_agents};
pub use error::{GameError, GameResult};
pub use rules::{LeaveOutcome, PoachOutcome, RosterStatus};
