//! Dungeon State Machine.
//!
//! ```text
//! NotStarted → InProgress(node) → InBattle(node, battle) → InProgress(next) → Completed | Quit
//! ```
//!
//! Every operation is a pure function of the stored run (and battle
//! session): it returns the next state instead of mutating its input, so a
//! failed action cannot leave the run half-advanced. Durable storage and
//! quota charging belong to the caller.

use crate::buff::{BuffEngine, BuffSource};
use crate::catalog::Catalog;
use crate::combat::{ActionRequest, CombatError, CombatOutcome, CombatResolver, TargetResult};
use crate::config::GameConfig;
use crate::state::{
    BattleRef, CharacterId, CharacterSnapshot, ChoiceId, CombatantId, CombatantState, EnemyId,
    NodeId, SkillId,
};

use super::battle::{BattleSession, ENEMY, Exchange};
use super::enemy::EnemyTemplate;
use super::error::DungeonError;
use super::map::{MapNode, NodeKind};
use super::run::{DungeonPhase, DungeonRun};
use super::view::{BattleView, ChoiceView, DungeonRunView};

/// Something observable that happened while handling an action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DungeonStep {
    NodeEntered { node: NodeId, title: String },
    BattleStarted { battle: BattleRef, enemy: EnemyId },
    Exchange(Box<Exchange>),
    BattleWon { battle: BattleRef, enemy: EnemyId },
    BattleLost { battle: BattleRef, timed_out: bool },
    Completed { node: NodeId },
}

/// Result of one accepted action, not yet committed.
#[derive(Clone, Debug, PartialEq)]
pub struct Advance {
    pub run: DungeonRun,
    /// Battle state after the action; `None` once no battle is active.
    pub battle: Option<BattleSession>,
    /// Battle session that ended with this action and can be discarded.
    pub ended_battle: Option<BattleRef>,
    pub steps: Vec<DungeonStep>,
    /// Lifespan the action costs; must be charged before committing.
    pub lifespan_cost: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct DungeonMachine<'a> {
    catalog: &'a Catalog,
    config: &'a GameConfig,
}

impl<'a> DungeonMachine<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a GameConfig) -> Self {
        Self { catalog, config }
    }

    /// Creates a run at an entry node.
    ///
    /// Fails with `RunAlreadyActive` whenever `existing` is live, whatever
    /// node is requested.
    pub fn start(
        &self,
        existing: Option<&DungeonRun>,
        character: CharacterId,
        entry: &NodeId,
    ) -> Result<DungeonRun, DungeonError> {
        if existing.is_some_and(|run| run.phase.is_active()) {
            return Err(DungeonError::RunAlreadyActive(character));
        }
        let node = self.node(entry)?;
        if !node.entry || !matches!(node.kind, NodeKind::Passage) {
            return Err(DungeonError::NotAnEntry(entry.clone()));
        }
        Ok(DungeonRun::new(character, node.id.clone()))
    }

    /// Resolves one choice for the run's current state.
    ///
    /// `next_battle` is the reference a battle started by this action will use.
    pub fn advance(
        &self,
        run: &DungeonRun,
        battle: Option<&BattleSession>,
        character: &CharacterSnapshot,
        choice: &ChoiceId,
        next_battle: BattleRef,
    ) -> Result<Advance, DungeonError> {
        match &run.phase {
            DungeonPhase::InProgress { node } => {
                self.choose(run, node, character, choice, next_battle)
            }
            DungeonPhase::InBattle { node, battle: battle_ref } => {
                let session = battle
                    .filter(|session| session.battle == *battle_ref)
                    .ok_or(DungeonError::BattleMissing(*battle_ref))?;
                self.exchange(run, node, session, character, choice)
            }
            DungeonPhase::NotStarted
            | DungeonPhase::Completed { .. }
            | DungeonPhase::Quit { .. } => Err(DungeonError::NoActiveRun(run.character)),
        }
    }

    /// Abandons a live run. Progress is forfeited.
    pub fn quit(
        &self,
        run: Option<&DungeonRun>,
        character: CharacterId,
    ) -> Result<DungeonRun, DungeonError> {
        match run {
            Some(run) if run.phase.is_active() => {
                let mut run = run.clone();
                run.phase = DungeonPhase::Quit { defeated: false };
                Ok(run)
            }
            _ => Err(DungeonError::NoActiveRun(character)),
        }
    }

    pub fn view(
        &self,
        character: &CharacterSnapshot,
        run: Option<&DungeonRun>,
        battle: Option<&BattleSession>,
    ) -> DungeonRunView {
        let Some(run) = run else {
            return DungeonRunView::not_started(character.id);
        };
        let node = run.phase.node().and_then(|id| self.catalog.atlas().node(id));

        let choices = match &run.phase {
            DungeonPhase::InProgress { .. } => node
                .map(|node| node.choices.iter().map(ChoiceView::from).collect())
                .unwrap_or_default(),
            DungeonPhase::InBattle { .. } => character
                .skills
                .iter()
                .filter_map(|learned| self.catalog.skill(&learned.skill))
                .map(|skill| ChoiceView {
                    id: ChoiceId::new(skill.id.as_str()),
                    label: skill.name.clone(),
                    lifespan_cost: 0,
                })
                .collect(),
            _ => Vec::new(),
        };

        let battle = battle
            .filter(|session| run.phase.battle() == Some(session.battle))
            .and_then(|session| {
                let player = session.player()?;
                let enemy = session.opponent()?;
                Some(BattleView {
                    battle: session.battle,
                    round: session.round,
                    enemy: session.enemy.clone(),
                    enemy_name: enemy.name.clone(),
                    player_hp: player.hp,
                    player_mp: player.mp,
                    enemy_hp: enemy.hp,
                })
            });

        DungeonRunView {
            character: run.character,
            phase: run.phase.clone(),
            title: node.map(|node| node.title.clone()),
            history: run.history.clone(),
            choices,
            battle,
        }
    }

    fn choose(
        &self,
        run: &DungeonRun,
        node: &NodeId,
        character: &CharacterSnapshot,
        choice: &ChoiceId,
        next_battle: BattleRef,
    ) -> Result<Advance, DungeonError> {
        let current = self.node(node)?;
        let edge = current.choice(choice).ok_or_else(|| DungeonError::InvalidChoice {
            node: node.clone(),
            choice: choice.clone(),
        })?;

        let mut run = run.clone();
        run.lifespan_spent += edge.lifespan_cost;
        let mut steps = Vec::new();
        let battle = self.enter(&mut run, &edge.next, character, next_battle, &mut steps)?;

        Ok(Advance {
            run,
            battle,
            ended_battle: None,
            steps,
            lifespan_cost: edge.lifespan_cost,
        })
    }

    fn exchange(
        &self,
        run: &DungeonRun,
        node: &NodeId,
        session: &BattleSession,
        character: &CharacterSnapshot,
        choice: &ChoiceId,
    ) -> Result<Advance, DungeonError> {
        let invalid = || DungeonError::InvalidChoice {
            node: node.clone(),
            choice: choice.clone(),
        };
        let learned = character.skill(&SkillId::new(choice.as_str())).ok_or_else(invalid)?;
        let enemy = self.enemy(&session.enemy)?;
        let victory = match &self.node(node)?.kind {
            NodeKind::Battle { victory, .. } => victory.clone(),
            NodeKind::Passage | NodeKind::Terminal => return Err(invalid()),
        };

        let resolver = CombatResolver::new(self.catalog, self.config);
        let mut session = session.clone();
        let tier = learned.rank + character.equipment_quality;

        let request =
            ActionRequest::new(CombatantId::PLAYER, learned.skill.clone(), tier).at(ENEMY);
        let player = resolver.resolve(&mut session.combatants, &request)?;
        ensure_resolved(&player)?;

        let enemy_outcome = if alive(&session, ENEMY) && alive(&session, CombatantId::PLAYER) {
            let skill = enemy
                .rotation(session.round as usize)
                .ok_or_else(|| DungeonError::EnemyWithoutSkills(enemy.id.clone()))?;
            let request =
                ActionRequest::new(ENEMY, skill.clone(), enemy.rank).at(CombatantId::PLAYER);
            match resolver.resolve(&mut session.combatants, &request) {
                Ok(outcome) => {
                    ensure_resolved(&outcome)?;
                    Some(outcome)
                }
                // Out of spiritual energy: the enemy loses its turn.
                Err(CombatError::InsufficientMp { .. }) => None,
                Err(error) => return Err(error.into()),
            }
        } else {
            None
        };

        let engine = BuffEngine::new(self.catalog);
        let mut ticks = Vec::new();
        for combatant in &mut session.combatants {
            ticks.extend(engine.tick(combatant, 1)?.triggers);
        }
        session.round += 1;

        let player_alive = alive(&session, CombatantId::PLAYER);
        let enemy_alive = alive(&session, ENEMY);
        let mut steps = vec![DungeonStep::Exchange(Box::new(Exchange {
            round: session.round,
            player,
            enemy: enemy_outcome,
            ticks,
            player_hp: hp(&session, CombatantId::PLAYER),
            enemy_hp: hp(&session, ENEMY),
        }))];

        let mut run = run.clone();
        let battle_ref = session.battle;
        let mut battle = None;
        let mut ended_battle = Some(battle_ref);

        if !player_alive || (enemy_alive && session.round >= self.config.max_battle_rounds) {
            run.phase = DungeonPhase::Quit { defeated: true };
            steps.push(DungeonStep::BattleLost {
                battle: battle_ref,
                timed_out: player_alive,
            });
        } else if !enemy_alive {
            run.battles_won += 1;
            steps.push(DungeonStep::BattleWon {
                battle: battle_ref,
                enemy: enemy.id.clone(),
            });
            battle = self.enter(&mut run, &victory, character, battle_ref, &mut steps)?;
        } else {
            battle = Some(session);
            ended_battle = None;
        }

        Ok(Advance {
            run,
            battle,
            ended_battle,
            steps,
            lifespan_cost: 0,
        })
    }

    fn enter(
        &self,
        run: &mut DungeonRun,
        node: &NodeId,
        character: &CharacterSnapshot,
        next_battle: BattleRef,
        steps: &mut Vec<DungeonStep>,
    ) -> Result<Option<BattleSession>, DungeonError> {
        let node = self.node(node)?;
        run.history.push(node.id.clone());
        steps.push(DungeonStep::NodeEntered {
            node: node.id.clone(),
            title: node.title.clone(),
        });

        match &node.kind {
            NodeKind::Passage => {
                run.phase = DungeonPhase::InProgress { node: node.id.clone() };
                Ok(None)
            }
            NodeKind::Terminal => {
                run.phase = DungeonPhase::Completed { node: node.id.clone() };
                steps.push(DungeonStep::Completed { node: node.id.clone() });
                Ok(None)
            }
            NodeKind::Battle { enemy, .. } => {
                let session =
                    self.spawn_battle(run.character, node, enemy, character, next_battle)?;
                run.phase = DungeonPhase::InBattle {
                    node: node.id.clone(),
                    battle: next_battle,
                };
                steps.push(DungeonStep::BattleStarted {
                    battle: next_battle,
                    enemy: enemy.clone(),
                });
                Ok(Some(session))
            }
        }
    }

    fn spawn_battle(
        &self,
        owner: CharacterId,
        node: &MapNode,
        enemy: &EnemyId,
        character: &CharacterSnapshot,
        battle: BattleRef,
    ) -> Result<BattleSession, DungeonError> {
        let template = self.enemy(enemy)?;
        if template.skills.is_empty() {
            return Err(DungeonError::EnemyWithoutSkills(enemy.clone()));
        }

        let player = CombatantState::from_character(character, self.config);
        let mut opponent = template.to_combatant(ENEMY, self.config);
        let engine = BuffEngine::new(self.catalog);
        for innate in &template.innate_buffs {
            let source = BuffSource::new(ENEMY, template.attributes, template.rank);
            engine.apply_buff(&mut opponent, innate, source)?;
        }

        Ok(BattleSession {
            battle,
            character: owner,
            node: node.id.clone(),
            enemy: enemy.clone(),
            combatants: vec![player, opponent],
            round: 0,
        })
    }

    fn node(&self, id: &NodeId) -> Result<&'a MapNode, DungeonError> {
        self.catalog
            .atlas()
            .node(id)
            .ok_or_else(|| DungeonError::UnknownNode(id.clone()))
    }

    fn enemy(&self, id: &EnemyId) -> Result<&'a EnemyTemplate, DungeonError> {
        self.catalog
            .enemy(id)
            .ok_or_else(|| DungeonError::UnknownEnemy(id.clone()))
    }
}

fn ensure_resolved(outcome: &CombatOutcome) -> Result<(), DungeonError> {
    match outcome.targets.iter().find_map(|target| match &target.result {
        TargetResult::Failed(failure) => Some((target.target, failure)),
        TargetResult::Resolved(_) => None,
    }) {
        Some((target, failure)) => Err(DungeonError::ExchangeFailed {
            target,
            failure: failure.clone(),
        }),
        None => Ok(()),
    }
}

fn alive(session: &BattleSession, id: CombatantId) -> bool {
    session.combatant(id).is_some_and(CombatantState::is_alive)
}

fn hp(session: &BattleSession, id: CombatantId) -> u32 {
    session.combatant(id).map_or(0, |combatant| combatant.hp.current)
}
