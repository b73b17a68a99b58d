//! Process-wide game settings adjustable from the admin surface.

use crate::engine::error::GameError;

/// Smallest allowed team capacity.
pub const MIN_TEAM_SIZE: usize = 1;
/// Largest allowed team capacity.
pub const MAX_TEAM_SIZE: usize = 10;
/// Capacity used when no administrator changed anything.
pub const DEFAULT_TEAM_SIZE: usize = 2;

/// Runtime-tunable rules consulted by the roster engine.
///
/// The engine reads a copy of these on every operation; mutation happens only
/// through [`crate::state::AppState`], under the same gate that serializes
/// roster mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Upper bound on team membership, in `1..=10`.
    pub max_team_size: usize,
    /// Whether the poach operation is allowed at all.
    pub poaching_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_team_size: DEFAULT_TEAM_SIZE,
            poaching_enabled: true,
        }
    }
}

impl GameSettings {
    /// Update the team capacity, rejecting values outside `1..=10`.
    ///
    /// Lowering the capacity never shrinks existing teams; oversized teams
    /// simply stop accepting members until they fall back under the bound.
    pub fn set_max_team_size(&mut self, size: usize) -> Result<(), GameError> {
        if !(MIN_TEAM_SIZE..=MAX_TEAM_SIZE).contains(&size) {
            return Err(GameError::InvalidConfiguration {
                message: format!(
                    "team size must be between {MIN_TEAM_SIZE} and {MAX_TEAM_SIZE} (got {size})"
                ),
            });
        }
        self.max_team_size = size;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_two_player_teams_with_poaching_enabled() {
        let settings = GameSettings::default();
        assert_eq!(settings.max_team_size, 2);
        assert!(settings.poaching_enabled);
    }

    #[test]
    fn accepts_the_whole_valid_range() {
        let mut settings = GameSettings::default();
        for size in MIN_TEAM_SIZE..=MAX_TEAM_SIZE {
            settings.set_max_team_size(size).unwrap();
            assert_eq!(settings.max_team_size, size);
        }
    }

    #[test]
    fn rejects_out_of_range_sizes() {
        let mut settings = GameSettings::default();
        assert!(matches!(
            settings.set_max_team_size(0),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            settings.set_max_team_size(11),
            Err(GameError::InvalidConfiguration { .. })
        ));
        assert_eq!(settings.max_team_size, 2);
    }
}
