use thiserror::Error;

use crate::dao::storage::StorageError;

/// Result alias for roster rule operations.
pub type GameResult<T> = Result<T, GameError>;

/// Terminal outcomes of a roster operation whose preconditions failed.
///
/// Every variant is detected before any write happens, so a failed operation
/// never leaves partial state behind. None of these are retried.
#[derive(Debug, Error)]
pub enum GameError {
    /// A player or team name is already in use.
    #[error("{kind} name `{name}` is already taken")]
    DuplicateName {
        /// Which namespace collided ("player" or "team").
        kind: &'static str,
        /// The rejected name.
        name: String,
    },
    /// A referenced player or team does not exist.
    #[error("{kind} `{name}` not found")]
    NotFound {
        /// Which kind of record was missing ("player" or "team").
        kind: &'static str,
        /// The name that was looked up.
        name: String,
    },
    /// The operation requires a free agent but the player has a team.
    #[error("player `{name}` is already on a team")]
    AlreadyOnTeam {
        /// The offending player.
        name: String,
    },
    /// The operation requires team membership but the player is a free agent.
    #[error("player `{name}` is not on a team")]
    NotOnTeam {
        /// The offending player.
        name: String,
    },
    /// The target team is at the configured capacity.
    #[error("team `{name}` is already full")]
    TeamFull {
        /// The full team.
        name: String,
    },
    /// A team attempted to poach one of its own members.
    #[error("cannot poach from your own team")]
    SelfPoach,
    /// Poaching has been switched off by an administrator.
    #[error("poaching is currently disabled")]
    PoachingDisabled,
    /// A settings value is outside its allowed range.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the rejected value.
        message: String,
    },
    /// The storage backend failed; surfaced as-is, never swallowed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GameError {
    /// Duplicate player-name error.
    pub fn duplicate_player(name: impl Into<String>) -> Self {
        GameError::DuplicateName {
            kind: "player",
            name: name.into(),
        }
    }

    /// Duplicate team-name error.
    pub fn duplicate_team(name: impl Into<String>) -> Self {
        GameError::DuplicateName {
            kind: "team",
            name: name.into(),
        }
    }

    /// Missing player error.
    pub fn player_not_found(name: impl Into<String>) -> Self {
        GameError::NotFound {
            kind: "player",
            name: name.into(),
        }
    }

    /// Missing team error.
    pub fn team_not_found(name: impl Into<String>) -> Self {
        GameError::NotFound {
            kind: "team",
            name: name.into(),
        }
    }
}
