//! Built-in ability factories
//!
//! Each factory reads its parameters from the card definition's JSON and
//! builds a behavior object bound to its source card. Parameters are
//! validated here, once, so the behavior objects never fail on bad data.

use crate::core::{
    apply_effect, AbilityKind, AbilityParams, AbilityRegistry, ActivatedAbility, CardId, Color, Cost,
    CounterType, Effect, PlayerId, StaticAbility, TargetRef, TriggeredAbility,
};
use crate::game::{GameEvent, GameState, Step};
use crate::zones::Zone;
use crate::{MtgError, Result};
use std::sync::Arc;

pub fn register_builtins(registry: &mut AbilityRegistry) {
    registry.register("keyword", |params, _, _| {
        Ok(AbilityKind::Static(Arc::new(Keyword {
            keyword: string_param("keyword", params, "keyword")?,
        })))
    });
    registry.register("gain_life_on_death", |params, source, _| {
        Ok(AbilityKind::Triggered(Arc::new(GainLifeOnDeath {
            source,
            amount: amount_param("gain_life_on_death", params)?,
        })))
    });
    registry.register("drain_on_creature_death", |params, source, _| {
        Ok(AbilityKind::Triggered(Arc::new(DrainOnCreatureDeath {
            source,
            amount: amount_param("drain_on_creature_death", params)?,
        })))
    });
    registry.register("damage_on_enter", |params, source, _| {
        Ok(AbilityKind::Triggered(Arc::new(DamageOnEnter {
            source,
            amount: amount_param("damage_on_enter", params)?,
        })))
    });
    registry.register("upkeep_life_gain", |params, source, _| {
        Ok(AbilityKind::Triggered(Arc::new(UpkeepLifeGain {
            source,
            amount: amount_param("upkeep_life_gain", params)?,
        })))
    });
    registry.register("tap_for_mana", |params, _, _| {
        let symbol = string_param("tap_for_mana", params, "color")?;
        let color = Color::from_symbol(&symbol).ok_or_else(|| MtgError::InvalidAbilityParams {
            key: "tap_for_mana".to_string(),
            message: format!("unknown color '{symbol}'"),
        })?;
        Ok(AbilityKind::Activated(Arc::new(TapForMana {
            color,
            costs: vec![Cost::Tap],
        })))
    });
    registry.register("ping", |params, _, _| {
        let mut costs = vec![Cost::Tap];
        costs.extend(mana_cost_param("ping", params)?);
        Ok(AbilityKind::Activated(Arc::new(Ping {
            amount: amount_param("ping", params)?,
            costs,
        })))
    });
    registry.register("pump_counters", |params, source, _| {
        Ok(AbilityKind::Activated(Arc::new(PumpCounters {
            source,
            amount: amount_param("pump_counters", params)?.unsigned_abs(),
            costs: mana_cost_param("pump_counters", params)?,
        })))
    });
}

fn bad_params(key: &str, message: impl Into<String>) -> MtgError {
    MtgError::InvalidAbilityParams {
        key: key.to_string(),
        message: message.into(),
    }
}

/// `amount` as a positive integer, defaulting to 1
fn amount_param(key: &str, params: &AbilityParams) -> Result<i32> {
    match params.get("amount") {
        None => Ok(1),
        Some(value) => value
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| bad_params(key, format!("amount must be a positive integer, got {value}"))),
    }
}

fn string_param(key: &str, params: &AbilityParams, name: &str) -> Result<String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| bad_params(key, format!("missing string parameter '{name}'")))
}

/// Optional `mana` parameter such as "1R"
fn mana_cost_param(key: &str, params: &AbilityParams) -> Result<Vec<Cost>> {
    let Some(value) = params.get("mana") else {
        return Ok(Vec::new());
    };
    let text = value
        .as_str()
        .ok_or_else(|| bad_params(key, "mana must be a string"))?;
    match Cost::parse_list(text) {
        Some(costs) if costs.iter().all(|c| matches!(c, Cost::Mana(_))) => Ok(costs),
        _ => Err(bad_params(key, format!("'{text}' is not a mana cost"))),
    }
}

fn controller_of(state: &GameState, card_id: CardId) -> Option<PlayerId> {
    state.cards.get(card_id).ok().map(|card| card.controller)
}

fn on_battlefield(state: &GameState, card_id: CardId) -> bool {
    state.zone_type_of(card_id) == Some(Zone::Battlefield)
}

/// Evasion and similar keywords; a marker only
#[derive(Debug)]
struct Keyword {
    keyword: String,
}

impl StaticAbility for Keyword {
    fn description(&self) -> String {
        self.keyword.clone()
    }
}

/// When this dies, its controller gains life
#[derive(Debug)]
struct GainLifeOnDeath {
    source: CardId,
    amount: i32,
}

impl TriggeredAbility for GainLifeOnDeath {
    fn check_trigger(&self, event: &GameEvent, _state: &GameState) -> bool {
        matches!(event, GameEvent::Died { card_id, .. } if *card_id == self.source)
    }

    fn resolve(&self, state: &GameState) -> GameState {
        match controller_of(state, self.source) {
            Some(player) => apply_effect(
                state,
                &Effect::GainLife {
                    player,
                    amount: self.amount,
                },
            ),
            None => state.clone(),
        }
    }

    fn description(&self) -> String {
        format!("When this dies, you gain {} life", self.amount)
    }
}

/// Whenever another creature dies, each opponent loses life
#[derive(Debug)]
struct DrainOnCreatureDeath {
    source: CardId,
    amount: i32,
}

impl TriggeredAbility for DrainOnCreatureDeath {
    fn check_trigger(&self, event: &GameEvent, state: &GameState) -> bool {
        match event {
            GameEvent::Died { card_id, .. } => {
                *card_id != self.source
                    && on_battlefield(state, self.source)
                    && state.is_creature(*card_id)
            }
            _ => false,
        }
    }

    fn resolve(&self, state: &GameState) -> GameState {
        let Some(controller) = controller_of(state, self.source) else {
            return state.clone();
        };
        let drain = state
            .opponents(controller)
            .map(|player| Effect::LoseLife {
                player,
                amount: self.amount,
            })
            .collect();
        apply_effect(state, &Effect::Sequence(drain))
    }

    fn description(&self) -> String {
        format!(
            "Whenever another creature dies, each opponent loses {} life",
            self.amount
        )
    }
}

/// When this enters, it deals damage to each other creature
#[derive(Debug)]
struct DamageOnEnter {
    source: CardId,
    amount: i32,
}

impl TriggeredAbility for DamageOnEnter {
    fn check_trigger(&self, event: &GameEvent, _state: &GameState) -> bool {
        matches!(event, GameEvent::EnteredBattlefield { card_id, .. } if *card_id == self.source)
    }

    fn resolve(&self, state: &GameState) -> GameState {
        let damage = state
            .battlefield_cards()
            .into_iter()
            .filter(|&card_id| card_id != self.source && state.is_creature(card_id))
            .map(|card_id| Effect::DealDamage {
                target: TargetRef::Permanent(card_id),
                amount: self.amount,
            })
            .collect();
        apply_effect(state, &Effect::Sequence(damage))
    }

    fn description(&self) -> String {
        format!(
            "When this enters, it deals {} damage to each other creature",
            self.amount
        )
    }
}

/// At the beginning of your upkeep, gain life
#[derive(Debug)]
struct UpkeepLifeGain {
    source: CardId,
    amount: i32,
}

impl TriggeredAbility for UpkeepLifeGain {
    fn check_trigger(&self, event: &GameEvent, state: &GameState) -> bool {
        match event {
            GameEvent::StepBegan {
                step: Step::Upkeep,
                active_player,
                ..
            } => {
                on_battlefield(state, self.source)
                    && controller_of(state, self.source) == Some(*active_player)
            }
            _ => false,
        }
    }

    fn resolve(&self, state: &GameState) -> GameState {
        match controller_of(state, self.source) {
            Some(player) => apply_effect(
                state,
                &Effect::GainLife {
                    player,
                    amount: self.amount,
                },
            ),
            None => state.clone(),
        }
    }

    fn description(&self) -> String {
        format!("At the beginning of your upkeep, gain {} life", self.amount)
    }
}

/// {T}: Add one mana of a color
#[derive(Debug)]
struct TapForMana {
    color: Color,
    costs: Vec<Cost>,
}

impl ActivatedAbility for TapForMana {
    fn costs(&self) -> &[Cost] {
        &self.costs
    }

    fn effect(&self, _state: &GameState, controller: PlayerId, _target: TargetRef) -> Option<Effect> {
        Some(Effect::AddMana {
            player: controller,
            color: self.color,
            amount: 1,
        })
    }

    fn can_activate(&self, _state: &GameState, _player: PlayerId, _target: TargetRef) -> bool {
        true
    }

    fn description(&self) -> String {
        format!("{{T}}: Add {{{}}}", self.color)
    }
}

/// {T}: Deal damage to any target
#[derive(Debug)]
struct Ping {
    amount: i32,
    costs: Vec<Cost>,
}

impl ActivatedAbility for Ping {
    fn costs(&self) -> &[Cost] {
        &self.costs
    }

    fn effect(&self, _state: &GameState, _controller: PlayerId, target: TargetRef) -> Option<Effect> {
        match target {
            TargetRef::None => None,
            target => Some(Effect::DealDamage {
                target,
                amount: self.amount,
            }),
        }
    }

    fn can_activate(&self, state: &GameState, _player: PlayerId, target: TargetRef) -> bool {
        match target {
            TargetRef::Player(player) => state.players.contains(player),
            TargetRef::Permanent(card_id) => {
                on_battlefield(state, card_id) && state.is_creature(card_id)
            }
            TargetRef::None => false,
        }
    }

    fn description(&self) -> String {
        format!("{{T}}: Deal {} damage to any target", self.amount)
    }
}

/// Pay mana: put +1/+1 counters on this
#[derive(Debug)]
struct PumpCounters {
    source: CardId,
    amount: u32,
    costs: Vec<Cost>,
}

impl ActivatedAbility for PumpCounters {
    fn costs(&self) -> &[Cost] {
        &self.costs
    }

    fn effect(&self, _state: &GameState, _controller: PlayerId, _target: TargetRef) -> Option<Effect> {
        Some(Effect::PutCounters {
            target: self.source,
            counter_type: CounterType::plus_one_plus_one(),
            amount: self.amount,
        })
    }

    fn can_activate(&self, _state: &GameState, _player: PlayerId, _target: TargetRef) -> bool {
        true
    }

    fn description(&self) -> String {
        format!("Put {} +1/+1 counter(s) on this", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AbilityKey;
    use crate::game::test_support::{two_player_game, TestGame, TestStateExt};
    use serde_json::json;

    fn build(key: &str, params: serde_json::Value) -> Result<AbilityKind> {
        let game = two_player_game();
        AbilityRegistry::with_builtin_abilities().build(
            &AbilityKey::from(key),
            &params,
            CardId::new(1),
            &game.state,
        )
    }

    #[test]
    fn test_param_validation() {
        assert!(build("keyword", json!({"keyword": "Flying"})).is_ok());
        assert!(matches!(
            build("keyword", json!({})),
            Err(MtgError::InvalidAbilityParams { .. })
        ));
        assert!(build("tap_for_mana", json!({"color": "Q"})).is_err());
        assert!(build("ping", json!({"amount": -1})).is_err());
        assert!(build("pump_counters", json!({"mana": "T"})).is_err());
        // Mana amounts that do not fit are refused, never treated as free
        assert!(matches!(
            build("ping", json!({"mana": "255R"})),
            Err(MtgError::InvalidAbilityParams { .. })
        ));
        assert!(matches!(
            build("pump_counters", json!({"mana": "300"})),
            Err(MtgError::InvalidAbilityParams { .. })
        ));

        let ping = build("ping", json!({"amount": 2, "mana": "1R"})).unwrap();
        match ping {
            AbilityKind::Activated(ability) => {
                assert_eq!(ability.costs().len(), 2);
                assert!(Cost::includes_tap(ability.costs()));
            }
            other => panic!("expected activated ability, got {other:?}"),
        }
    }

    #[test]
    fn test_damage_on_enter_spares_source() {
        let TestGame { state, alice, bob } = two_player_game();
        let (state, bears) = state.with_card("grizzly_bears", bob, Zone::Battlefield);
        let (state, elemental) = state.with_card("flame_elemental", alice, Zone::Battlefield);

        let ability_id = state.cards.get(elemental).unwrap().abilities.triggered[0];
        let ability = state.abilities.get(ability_id).unwrap().as_triggered().unwrap();
        let event = GameEvent::EnteredBattlefield {
            card_id: elemental,
            controller: alice,
        };
        assert!(ability.check_trigger(&event, &state));

        let after = ability.resolve(&state);
        assert_eq!(after.cards.get(bears).unwrap().damage, 1);
        assert_eq!(after.cards.get(elemental).unwrap().damage, 0);
    }

    #[test]
    fn test_upkeep_trigger_only_for_controller() {
        let TestGame { state, alice, bob } = two_player_game();
        let (state, soul) = state.with_card("soul_warden", alice, Zone::Battlefield);
        let ability_id = state.cards.get(soul).unwrap().abilities.triggered[0];
        let ability = state.abilities.get(ability_id).unwrap().as_triggered().unwrap();

        let upkeep = |active_player| GameEvent::StepBegan {
            turn: 2,
            step: Step::Upkeep,
            active_player,
        };
        assert!(ability.check_trigger(&upkeep(alice), &state));
        assert!(!ability.check_trigger(&upkeep(bob), &state));
        assert_eq!(ability.resolve(&state).get_player(alice).unwrap().life, 21);
    }

    #[test]
    fn test_ping_requires_target() {
        let TestGame { state, alice, bob } = two_player_game();
        let (state, pinger) = state.with_card("prodigal_pyromancer", alice, Zone::Battlefield);
        let ability_id = state.cards.get(pinger).unwrap().abilities.activated[0];
        let ability = state.abilities.get(ability_id).unwrap().as_activated().unwrap();

        assert!(!ability.can_activate(&state, alice, TargetRef::None));
        assert!(ability.can_activate(&state, alice, TargetRef::Player(bob)));

        let after = ability.activate(&state, alice, pinger, TargetRef::Player(bob));
        assert_eq!(after.get_player(bob).unwrap().life, 19);
        assert!(after.cards.get(pinger).unwrap().tapped);
    }

    #[test]
    fn test_pump_needs_mana() {
        let TestGame { state, alice, .. } = two_player_game();
        let (mut state, ogre) = state.with_card("pump_ogre", alice, Zone::Battlefield);
        let ability_id = state.cards.get(ogre).unwrap().abilities.activated[0];

        let ability = state.abilities.get(ability_id).unwrap().as_activated().unwrap();
        // Empty pool: activation falls through unchanged
        assert_eq!(ability.activate(&state, alice, ogre, TargetRef::None), state);

        state
            .players
            .get_mut(alice)
            .unwrap()
            .mana_pool
            .add(Color::Red, 1);
        let ability = state.abilities.get(ability_id).unwrap().as_activated().unwrap();
        let after = ability.activate(&state, alice, ogre, TargetRef::None);
        let card = after.cards.get(ogre).unwrap();
        assert_eq!(card.get_counter(&CounterType::plus_one_plus_one()), 1);
        assert_eq!(after.get_player(alice).unwrap().mana_pool.total(), 0);
    }
}
