//! Plays one run along a fixed route, fighting battles on autopilot.

use anyhow::Result;
use game_core::{
    CharacterId, ChoiceId, DungeonPhase, DungeonRunView, ErrorCategory, GameError, NodeId,
    SkillTarget,
};
use runtime::GameService;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct Summary {
    pub actions: usize,
    pub ended: bool,
    pub final_phase: String,
    pub lifespan_spent: u32,
    pub battles_fought: u32,
}

pub async fn play(
    service: &GameService,
    character: CharacterId,
    entry: &NodeId,
    route: &[String],
) -> Result<Summary> {
    let mut view = service.start_dungeon(character, entry).await?;
    println!("{}", serde_json::to_string(&view)?);

    let mut summary = Summary::default();
    let mut route = route.iter();

    while !view.phase.is_terminal() {
        let choice = match &view.phase {
            DungeonPhase::InBattle { .. } => match pick_skill(service, &view) {
                Some(skill) => skill,
                None => {
                    tracing::warn!(%character, "no usable skill, fleeing");
                    break;
                }
            },
            _ => match route.next() {
                Some(step) => ChoiceId::new(step.as_str()),
                None => {
                    tracing::info!(%character, "route exhausted");
                    break;
                }
            },
        };

        match service.handle_action(character, &choice).await {
            Ok(outcome) => {
                println!("{}", serde_json::to_string(&outcome)?);
                summary.actions += 1;
                summary.lifespan_spent += outcome.lifespan_spent;
                let was_fighting = matches!(view.phase, DungeonPhase::InBattle { .. });
                if outcome.view.battle.is_some() && !was_fighting {
                    summary.battles_fought += 1;
                }
                view = outcome.view;
            }
            Err(error) if error.category() == ErrorCategory::Precondition => {
                tracing::warn!(
                    %character,
                    %choice,
                    code = error.error_code(),
                    %error,
                    "choice refused"
                );
                break;
            }
            Err(error) => return Err(error.into()),
        }
    }

    summary.ended = view.phase.is_terminal();
    summary.final_phase = if summary.ended {
        view.phase.as_str().to_owned()
    } else {
        service.quit_dungeon(character).await?;
        "quit".to_owned()
    };
    Ok(summary)
}

/// Most expensive affordable attack, so spiritual energy is spent early.
fn pick_skill(service: &GameService, view: &DungeonRunView) -> Option<ChoiceId> {
    let mp = view.battle.as_ref()?.player_mp.current;
    view.choices
        .iter()
        .filter_map(|choice| service.catalog().skill(&choice.id.as_str().into()))
        .filter(|skill| skill.target == SkillTarget::Enemy && skill.mp_cost <= mp)
        .max_by_key(|skill| skill.mp_cost)
        .map(|skill| ChoiceId::new(skill.id.as_str()))
}
