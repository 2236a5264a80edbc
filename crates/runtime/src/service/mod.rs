//! The game service: the six operations exposed to the surrounding
//! application.
//!
//! Rules come from `game-core` as pure functions over loaded state. This
//! layer loads and stores that state, charges quota, serializes actions per
//! character and publishes events once an action is committed.

mod builder;
mod outcome;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use game_core::{
    Advance, BattleRef, BattleSession, Catalog, CharacterId, CharacterSnapshot, ChoiceId,
    DungeonError, DungeonMachine, DungeonRunView, DungeonStep, NodeId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

pub use builder::GameServiceBuilder;
pub use outcome::ActionOutcome;

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{EventBus, GameEvent, RunEnding};
use crate::oracle::CharacterOracle;
use crate::quota::{Admission, QuotaCharge, QuotaKind, QuotaLimiters, QuotaResult, QuotaStatus};
use crate::repository::{BattleRepository, RunRepository};

/// Cloneable handle to the game service.
#[derive(Clone)]
pub struct GameService {
    inner: Arc<Inner>,
}

struct Inner {
    catalog: Arc<Catalog>,
    config: RuntimeConfig,
    characters: Arc<dyn CharacterOracle>,
    runs: Arc<dyn RunRepository>,
    battles: Arc<dyn BattleRepository>,
    quotas: QuotaLimiters,
    events: EventBus,
    /// One async mutex per character; actions for a character never overlap.
    locks: Mutex<HashMap<CharacterId, Arc<Mutex<()>>>>,
    next_battle: AtomicU64,
}

impl GameService {
    pub fn builder() -> GameServiceBuilder {
        GameServiceBuilder::default()
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn quotas(&self) -> &QuotaLimiters {
        &self.inner.quotas
    }

    /// Opens a run at `node`.
    ///
    /// The run is validated before any quota is touched, so a rejected start
    /// never costs a dungeon attempt.
    pub async fn start_dungeon(
        &self,
        character: CharacterId,
        node: &NodeId,
    ) -> Result<DungeonRunView> {
        let _guard = self.lock(character).await;
        let snapshot = self.snapshot(character)?;
        let machine = self.machine();

        let existing = self.inner.runs.load(character)?;
        let run = machine.start(existing.as_ref(), character, node)?;

        let (charge, remaining) = match self.inner.quotas.admit_dungeon(character).await? {
            Admission::Admitted { charge, remaining } => (charge, remaining),
            Admission::RetreatLocked => {
                self.publish_rejection(character, QuotaKind::Lifespan, 0);
                return Err(DungeonError::RetreatLocked(character).into());
            }
            Admission::Exhausted { remaining } => {
                self.publish_rejection(character, QuotaKind::DungeonAttempts, remaining);
                return Err(DungeonError::QuotaExhausted {
                    quota: QuotaKind::DungeonAttempts.to_string(),
                    remaining,
                }
                .into());
            }
        };

        if let Err(error) = self.inner.runs.save(&run) {
            self.compensate(std::slice::from_ref(&charge)).await;
            return Err(error.into());
        }

        tracing::info!(%character, %node, attempts_left = remaining, "dungeon run started");
        self.inner.events.publish(GameEvent::QuotaConsumed {
            character,
            kind: charge.kind,
            amount: charge.amount,
            remaining,
        });
        self.inner.events.publish(GameEvent::DungeonStarted {
            character,
            node: node.clone(),
        });

        Ok(machine.view(&snapshot, Some(&run), None))
    }

    /// Resolves one choice (a map choice, or a skill while in battle).
    ///
    /// On any error the stored run and battle are left exactly as they were.
    pub async fn handle_action(
        &self,
        character: CharacterId,
        choice: &ChoiceId,
    ) -> Result<ActionOutcome> {
        let _guard = self.lock(character).await;
        let snapshot = self.snapshot(character)?;
        let machine = self.machine();

        let run = self
            .inner
            .runs
            .load(character)?
            .ok_or(DungeonError::NoActiveRun(character))?;
        let battle = match run.phase.battle() {
            Some(battle) => self.inner.battles.load(battle)?,
            None => None,
        };

        let next_battle = BattleRef(self.inner.next_battle.fetch_add(1, Ordering::Relaxed));
        let advance = machine.advance(&run, battle.as_ref(), &snapshot, choice, next_battle)?;

        let mut charges = Vec::new();
        let mut lifespan_remaining = None;
        if advance.lifespan_cost > 0 {
            let limiter = self.inner.quotas.get(QuotaKind::Lifespan);
            match limiter.charge(character, i64::from(advance.lifespan_cost)).await? {
                (result, Some(charge)) => {
                    lifespan_remaining = Some(result.remaining);
                    charges.push(charge);
                }
                (result, None) => {
                    self.publish_rejection(character, QuotaKind::Lifespan, result.remaining);
                    return Err(lifespan_rejection(character, result).into());
                }
            }
        }

        if let Err(error) = self.commit(character, &advance) {
            tracing::warn!(%character, %choice, %error, "action not committed");
            self.compensate(&charges).await;
            return Err(error);
        }

        for charge in &charges {
            self.inner.events.publish(GameEvent::QuotaConsumed {
                character,
                kind: charge.kind,
                amount: charge.amount,
                remaining: lifespan_remaining.unwrap_or_default(),
            });
        }
        self.publish_steps(character, battle.as_ref(), &advance);

        let view = machine.view(&snapshot, Some(&advance.run), advance.battle.as_ref());
        Ok(ActionOutcome {
            steps: advance.steps,
            view,
            lifespan_spent: advance.lifespan_cost,
            lifespan_remaining,
        })
    }

    /// Abandons the live run. Spent quota is not refunded.
    pub async fn quit_dungeon(&self, character: CharacterId) -> Result<()> {
        let _guard = self.lock(character).await;
        let run = self.inner.runs.load(character)?;
        let quit = self.machine().quit(run.as_ref(), character)?;

        self.inner.runs.delete(character)?;
        if let Some(battle) = run.as_ref().and_then(|run| run.phase.battle()) {
            self.discard_battle(character, battle);
        }

        let node = run.as_ref().and_then(|run| run.phase.node().cloned());
        tracing::info!(
            %character,
            node = ?node,
            nodes_visited = quit.history.len(),
            "dungeon run abandoned"
        );
        self.inner.events.publish(GameEvent::RunEnded {
            character,
            node,
            outcome: RunEnding::Quit,
        });
        Ok(())
    }

    /// Read-only view; `NotStarted` when the character has no live run.
    pub async fn dungeon_state(&self, character: CharacterId) -> Result<DungeonRunView> {
        let snapshot = self.snapshot(character)?;
        let run = self.inner.runs.load(character)?;
        let battle = match run.as_ref().and_then(|run| run.phase.battle()) {
            Some(battle) => self.inner.battles.load(battle)?,
            None => None,
        };
        Ok(self.machine().view(&snapshot, run.as_ref(), battle.as_ref()))
    }

    pub async fn consume_quota(
        &self,
        character: CharacterId,
        kind: QuotaKind,
        amount: i64,
    ) -> Result<QuotaResult> {
        let result = self.inner.quotas.get(kind).consume(character, amount).await?;
        if result.accepted {
            self.inner.events.publish(GameEvent::QuotaConsumed {
                character,
                kind,
                amount: amount.unsigned_abs(),
                remaining: result.remaining,
            });
        } else {
            self.publish_rejection(character, kind, result.remaining);
        }
        Ok(result)
    }

    pub async fn peek_quota(&self, character: CharacterId, kind: QuotaKind) -> Result<QuotaStatus> {
        Ok(self.inner.quotas.get(kind).peek(character).await?)
    }

    fn machine(&self) -> DungeonMachine<'_> {
        DungeonMachine::new(&self.inner.catalog, &self.inner.config.game_config)
    }

    fn snapshot(&self, character: CharacterId) -> Result<CharacterSnapshot> {
        self.inner
            .characters
            .character(character)?
            .ok_or(RuntimeError::UnknownCharacter(character))
    }

    async fn lock(&self, character: CharacterId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.inner.locks.lock().await;
            locks.entry(character).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// The run record is the commit point: an ended battle is only removed
    /// once no stored run can reference it.
    fn commit(&self, character: CharacterId, advance: &Advance) -> Result<()> {
        if let Some(session) = &advance.battle {
            self.inner.battles.save(session)?;
        }
        if advance.run.phase.is_terminal() {
            self.inner.runs.delete(character)?;
        } else {
            self.inner.runs.save(&advance.run)?;
        }
        if let Some(ended) = advance.ended_battle {
            self.discard_battle(character, ended);
        }
        Ok(())
    }

    fn discard_battle(&self, character: CharacterId, battle: BattleRef) {
        if let Err(error) = self.inner.battles.delete(battle) {
            tracing::warn!(
                %character,
                battle = battle.0,
                %error,
                "stale battle session left behind"
            );
        }
    }

    async fn compensate(&self, charges: &[QuotaCharge]) {
        for charge in charges {
            if let Err(error) = self.inner.quotas.refund(charge).await {
                tracing::error!(
                    character = %charge.character,
                    kind = %charge.kind,
                    amount = charge.amount,
                    %error,
                    "quota refund failed"
                );
            }
        }
    }

    fn publish_rejection(&self, character: CharacterId, kind: QuotaKind, remaining: u64) {
        self.inner.events.publish(GameEvent::QuotaRejected {
            character,
            kind,
            remaining,
        });
    }

    fn publish_steps(
        &self,
        character: CharacterId,
        before: Option<&BattleSession>,
        advance: &Advance,
    ) {
        let events = &self.inner.events;
        for step in &advance.steps {
            match step {
                DungeonStep::NodeEntered { node, .. } => {
                    tracing::debug!(%character, %node, "node entered");
                    events.publish(GameEvent::NodeEntered {
                        character,
                        node: node.clone(),
                    });
                }
                DungeonStep::BattleStarted { battle, enemy } => {
                    tracing::info!(%character, battle = battle.0, %enemy, "battle started");
                    events.publish(GameEvent::BattleStarted {
                        character,
                        battle: *battle,
                        enemy: enemy.clone(),
                    });
                }
                DungeonStep::Exchange(exchange) => {
                    tracing::debug!(
                        %character,
                        round = exchange.round,
                        player_hp = exchange.player_hp,
                        enemy_hp = exchange.enemy_hp,
                        "exchange resolved"
                    );
                    if let Some(session) = before {
                        events.publish(GameEvent::BattleExchange {
                            character,
                            battle: session.battle,
                            exchange: exchange.clone(),
                        });
                    }
                }
                DungeonStep::BattleWon { battle, enemy } => {
                    tracing::info!(%character, battle = battle.0, %enemy, "battle won");
                }
                DungeonStep::BattleLost { battle, timed_out } => {
                    tracing::info!(%character, battle = battle.0, timed_out, "battle lost");
                    events.publish(GameEvent::RunEnded {
                        character,
                        node: before.map(|session| session.node.clone()),
                        outcome: RunEnding::Defeated,
                    });
                }
                DungeonStep::Completed { node } => {
                    tracing::info!(
                        %character,
                        %node,
                        battles_won = advance.run.battles_won,
                        "dungeon run completed"
                    );
                    events.publish(GameEvent::RunEnded {
                        character,
                        node: Some(node.clone()),
                        outcome: RunEnding::Completed,
                    });
                }
            }
        }
    }
}

fn lifespan_rejection(character: CharacterId, result: QuotaResult) -> DungeonError {
    if result.retreat_locked {
        DungeonError::RetreatLocked(character)
    } else {
        DungeonError::QuotaExhausted {
            quota: QuotaKind::Lifespan.to_string(),
            remaining: result.remaining,
        }
    }
}
