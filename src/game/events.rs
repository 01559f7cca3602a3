//! Game events, the event bus and the snapshot diff that produces events
//!
//! Events are never raised by the code that changes the state. The engine
//! compares the snapshot before a processing step with the snapshot after it
//! and reports what it sees: a card that was on the battlefield and is now in
//! a graveyard died. Adding an event kind means adding a case to
//! `diff_events`.

use crate::core::{CardId, LossReason, PlayerId};
use crate::game::{GameState, Step};
use crate::zones::Zone;
use serde::Serialize;
use std::fmt;

/// Something that happened between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Battlefield -> graveyard
    Died { card_id: CardId, owner: PlayerId },

    EnteredBattlefield {
        card_id: CardId,
        controller: PlayerId,
    },

    /// Battlefield -> any zone other than a graveyard
    LeftBattlefield { card_id: CardId, to: Zone },

    /// Library -> hand
    CardDrawn { card_id: CardId, player: PlayerId },

    PlayerLost {
        player: PlayerId,
        reason: Option<LossReason>,
    },

    /// The game moved to a new step (or a new turn)
    StepBegan {
        turn: u32,
        step: Step,
        active_player: PlayerId,
    },
}

impl GameEvent {
    /// Key used by the bus to route this event
    pub fn event_type(&self) -> &'static str {
        match self {
            GameEvent::Died { .. } => "died",
            GameEvent::EnteredBattlefield { .. } => "entered_battlefield",
            GameEvent::LeftBattlefield { .. } => "left_battlefield",
            GameEvent::CardDrawn { .. } => "card_drawn",
            GameEvent::PlayerLost { .. } => "player_lost",
            GameEvent::StepBegan { .. } => "step_began",
        }
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Died { card_id, .. } => write!(f, "card {card_id} died"),
            GameEvent::EnteredBattlefield { card_id, .. } => {
                write!(f, "card {card_id} entered the battlefield")
            }
            GameEvent::LeftBattlefield { card_id, to } => {
                write!(f, "card {card_id} left the battlefield for {to:?}")
            }
            GameEvent::CardDrawn { card_id, player } => {
                write!(f, "player {player} drew card {card_id}")
            }
            GameEvent::PlayerLost { player, reason } => {
                write!(f, "player {player} lost ({reason:?})")
            }
            GameEvent::StepBegan { turn, step, .. } => write!(f, "turn {turn}: {step:?}"),
        }
    }
}

/// Derive the events that explain how `old` became `new`
///
/// Each qualifying transition yields exactly one event. Order: step change
/// first, then cards by ascending id, then players in table order.
pub fn diff_events(old: &GameState, new: &GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if old.turn.turn_number != new.turn.turn_number
        || old.turn.current_step != new.turn.current_step
    {
        events.push(GameEvent::StepBegan {
            turn: new.turn.turn_number,
            step: new.turn.current_step,
            active_player: new.turn.active_player,
        });
    }

    // Untouched card storage means no card changed zone
    if !old.cards.shares_storage_with(&new.cards) {
        for card_id in new.cards.sorted_ids() {
            let Ok(card) = new.cards.get(card_id) else {
                continue;
            };
            let before = old.zone_type_of(card_id);
            let after = new.zone_type_of(card_id);
            if before == after {
                continue;
            }

            match (before, after) {
                (Some(Zone::Battlefield), Some(Zone::Graveyard)) => events.push(GameEvent::Died {
                    card_id,
                    owner: card.owner,
                }),
                (Some(Zone::Battlefield), Some(to)) => {
                    events.push(GameEvent::LeftBattlefield { card_id, to })
                }
                (Some(Zone::Library), Some(Zone::Hand)) => events.push(GameEvent::CardDrawn {
                    card_id,
                    player: card.owner,
                }),
                _ => {}
            }

            if after == Some(Zone::Battlefield) {
                events.push(GameEvent::EnteredBattlefield {
                    card_id,
                    controller: card.controller,
                });
            }
        }
    }

    for &player_id in new.player_ids() {
        let was_out = old.get_player(player_id).is_ok_and(|p| p.has_lost);
        if let Ok(player) = new.get_player(player_id) {
            if player.has_lost && !was_out {
                events.push(GameEvent::PlayerLost {
                    player: player_id,
                    reason: player.loss_reason,
                });
            }
        }
    }

    events
}

/// Which events a subscription receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    /// Events whose `event_type()` equals this key
    Type(String),
    /// Every event (`"*"`)
    All,
}

impl EventFilter {
    pub fn matches(&self, event: &GameEvent) -> bool {
        match self {
            EventFilter::Type(key) => key == event.event_type(),
            EventFilter::All => true,
        }
    }
}

impl From<&str> for EventFilter {
    fn from(key: &str) -> Self {
        if key == "*" {
            EventFilter::All
        } else {
            EventFilter::Type(key.to_string())
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event handler. Returning `Some(state)` makes that state authoritative
/// for the handlers that follow and for the engine.
pub type EventHandler = Box<dyn FnMut(&GameEvent, &GameState) -> Option<GameState> + Send>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Synchronous publish/subscribe dispatcher
///
/// Handlers run on the caller's thread, in registration order, inside
/// `emit`. The bus is owned by one engine; nothing is shared between games.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent, &GameState) -> Option<GameState> + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            filter: filter.into(),
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a subscription; false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        self.subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Deliver `event` to every matching handler and return the resulting
    /// state
    pub fn emit(&mut self, event: &GameEvent, state: GameState) -> GameState {
        let mut current = state;
        for sub in self.subscriptions.iter_mut() {
            if !sub.filter.matches(event) {
                continue;
            }
            if let Some(next) = (sub.handler)(event, &current) {
                current = next;
            }
        }
        current
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let filters: Vec<_> = self.subscriptions.iter().map(|s| &s.filter).collect();
        f.debug_struct("EventBus").field("subscriptions", &filters).finish()
    }
}
