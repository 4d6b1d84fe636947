use crate::enemy::{ModifierEffect, PlayerId};
use serde::{Deserialize, Serialize};

/// Everything the engine reports back from a hook.
///
/// The presentation layer turns these into combat text, chat lines and
/// level-up fanfare. The engine never renders anything itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineEvent {
    // ── Progression ─────────────────────────────────────────────
    /// A player received XP from a kill or a direct grant.
    XpAwarded { player: PlayerId, amount: u64 },

    /// A player gained one or more levels from a single grant.
    LevelUp {
        player: PlayerId,
        new_level: u32,
        levels_gained: u32,
        world_level: u32,
    },

    // ── Enemies ─────────────────────────────────────────────────
    /// A modifier wants the host to act on a player or show feedback.
    Modifier(ModifierEffect),

    /// A boss died. `first_kill` is true the first time this world sees it.
    BossDefeated { boss_id: String, first_kill: bool },
}

impl EngineEvent {
    pub fn is_level_up(&self) -> bool {
        matches!(self, EngineEvent::LevelUp { .. })
    }
}
