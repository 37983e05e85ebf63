//! Player, Pair and the Competitor identity used by the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Unique identifier for a doubles pair.
pub type PairId = Uuid;

/// A registered player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with the given name and a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn competitor(&self) -> Competitor {
        Competitor::Single(self.id)
    }
}

/// Two players entered together for doubles.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub player_1: Player,
    pub player_2: Player,
    pub team_name: Option<String>,
}

impl Pair {
    pub fn new(player_1: Player, player_2: Player, team_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_1,
            player_2,
            team_name,
        }
    }

    /// Team name when set, otherwise "First / Second".
    pub fn display_name(&self) -> String {
        match &self.team_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("{} / {}", self.player_1.name, self.player_2.name),
        }
    }

    pub fn competitor(&self) -> Competitor {
        Competitor::Pair {
            id: self.id,
            members: [self.player_1.id, self.player_2.id],
        }
    }
}

/// Opaque identity of whoever occupies one side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitor {
    Single(PlayerId),
    Pair { id: PairId, members: [PlayerId; 2] },
}

impl Competitor {
    /// Identity of the competitor itself (player id or pair id).
    pub fn id(&self) -> Uuid {
        match self {
            Competitor::Single(id) => *id,
            Competitor::Pair { id, .. } => *id,
        }
    }

    /// True when `id` names this competitor or, for a pair, one of its members.
    ///
    /// Every "does this match concern X" check goes through here so singles and
    /// doubles share one definition of membership.
    pub fn involves(&self, id: Uuid) -> bool {
        match self {
            Competitor::Single(player) => *player == id,
            Competitor::Pair { id: pair, members } => *pair == id || members.contains(&id),
        }
    }
}
