//! Player representation

use crate::core::{GameEntity, ManaPool, PlayerId, PlayerName, ZoneId};
use serde::{Deserialize, Serialize};

/// Why a player lost the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    /// Life total is 0 or less
    ZeroLife,
    /// Attempted to draw from an empty library
    DrewFromEmptyLibrary,
}

/// The five zones every player owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerZones {
    pub library: ZoneId,
    pub hand: ZoneId,
    pub graveyard: ZoneId,
    pub exile: ZoneId,
    pub battlefield: ZoneId,
}

impl PlayerZones {
    pub fn all(&self) -> [ZoneId; 5] {
        [
            self.library,
            self.hand,
            self.graveyard,
            self.exile,
            self.battlefield,
        ]
    }
}

/// Represents a player in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: PlayerName,

    pub life: i32,

    pub mana_pool: ManaPool,

    pub zones: PlayerZones,

    /// Lands played this turn
    pub lands_played_this_turn: u8,

    /// Maximum lands per turn (usually 1)
    pub max_lands_per_turn: u8,

    /// Set when a draw was attempted with an empty library
    pub drew_from_empty_library: bool,

    pub has_lost: bool,

    pub loss_reason: Option<LossReason>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: impl Into<PlayerName>,
        starting_life: i32,
        zones: PlayerZones,
    ) -> Self {
        Player {
            id,
            name: name.into(),
            life: starting_life,
            mana_pool: ManaPool::new(),
            zones,
            lands_played_this_turn: 0,
            max_lands_per_turn: 1,
            drew_from_empty_library: false,
            has_lost: false,
            loss_reason: None,
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    /// Lose life. Losing the game is left to the state-based action check.
    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn can_play_land(&self) -> bool {
        self.lands_played_this_turn < self.max_lands_per_turn
    }

    pub fn play_land(&mut self) {
        self.lands_played_this_turn = self.lands_played_this_turn.saturating_add(1);
    }

    pub fn reset_lands_played(&mut self) {
        self.lands_played_this_turn = 0;
    }

    pub fn lose_game(&mut self, reason: LossReason) {
        self.has_lost = true;
        self.loss_reason = Some(reason);
    }

    pub fn owns_zone(&self, zone: ZoneId) -> bool {
        self.zones.all().contains(&zone)
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
