//! Derived standings data: PlayerStats, TieBreakData, PlayerRanking.
//!
//! None of these are stored; they are recomputed from the match list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Per-competitor totals over decided matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub competitor_id: Uuid,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub points_won: u32,
    pub points_lost: u32,
    /// 0..=100.
    pub win_percentage: f64,
    /// `sets_won / sets_lost`, or `sets_won` when nothing was lost.
    pub set_ratio: f64,
    /// `points_won / points_lost`, or `points_won` when nothing was lost.
    pub point_ratio: f64,
}

/// Head-to-head tally and ratios used to break ties on points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TieBreakData {
    /// Opponent id -> +1 per win, -1 per loss against that opponent.
    pub head_to_head: BTreeMap<Uuid, i32>,
    pub set_ratio: f64,
    pub point_ratio: f64,
}

impl TieBreakData {
    pub fn head_to_head_total(&self) -> i32 {
        self.head_to_head.values().sum()
    }
}

/// One line of the final standings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRanking {
    /// 1-based; 0 until positions are assigned.
    pub position: u32,
    pub competitor_id: Uuid,
    pub points: u32,
    pub stats: PlayerStats,
    pub tie_break: TieBreakData,
}

/// How to order candidates that are equal on every tie-break criterion.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieDraw {
    /// Keep the order the candidates were supplied in.
    #[default]
    InputOrder,
    /// Lottery drawn from a recorded seed; the same seed gives the same order.
    Seeded(u64),
}
