use game_core::{DungeonRunView, DungeonStep};
use serde::{Deserialize, Serialize};

/// Everything one accepted `handle_action` call did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub steps: Vec<DungeonStep>,
    /// State after the action. A run that ended here shows its final phase,
    /// although the stored run has already been cleared.
    pub view: DungeonRunView,
    pub lifespan_spent: u32,
    /// Lifespan left today, when the action spent any.
    pub lifespan_remaining: Option<u64>,
}

impl ActionOutcome {
    pub fn run_ended(&self) -> bool {
        self.view.phase.is_terminal()
    }
}
