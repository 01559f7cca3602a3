//! Priority rotation

use crate::game::GameState;

/// Moves priority between players
///
/// Detecting that every player passed in succession with nothing changing
/// (the point where the top of the stack would resolve) is not done here;
/// with no stack resolution there is nothing for it to trigger.
pub struct PriorityManager;

impl PriorityManager {
    /// Give priority to the next player in table order, wrapping
    ///
    /// Changes nothing else.
    pub fn pass_priority(state: &GameState) -> GameState {
        let mut next = state.clone();
        match state.next_player_after(state.turn.priority_player) {
            Ok(player) => next.turn.priority_player = player,
            Err(err) => state
                .logger
                .internal_error(&format!("Priority holder is not seated: {err}")),
        }
        next
    }

    /// Give priority to the active player
    ///
    /// Called after anything that changes the game materially, which
    /// restarts the round of passes.
    pub fn set_active_player_priority(state: &GameState) -> GameState {
        let mut next = state.clone();
        next.turn.priority_player = next.turn.active_player;
        Self::skip_lost_holder(&next)
    }

    /// Move priority on from a holder who has lost the game
    pub fn skip_lost_holder(state: &GameState) -> GameState {
        let holder = state.priority_player();
        if state.get_player(holder).is_ok_and(|p| p.has_lost) {
            Self::pass_priority(state)
        } else {
            state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LossReason;
    use crate::game::test_support::{game_with_players, two_player_game, TestGame};

    #[test]
    fn test_pass_rotates_and_wraps() {
        let TestGame { state, alice, bob } = two_player_game();

        let once = PriorityManager::pass_priority(&state);
        assert_eq!(once.priority_player(), bob);
        let twice = PriorityManager::pass_priority(&once);
        assert_eq!(twice.priority_player(), alice);
    }

    #[test]
    fn test_pass_changes_only_priority() {
        let TestGame { state, .. } = two_player_game();
        let mut expected = state.clone();
        let after = PriorityManager::pass_priority(&state);
        expected.turn.priority_player = after.priority_player();
        assert_eq!(after, expected);
        assert!(after.cards.shares_storage_with(&state.cards));
    }

    #[test]
    fn test_n_passes_return_to_start() {
        for count in 2..=5 {
            let state = game_with_players(count);
            let start = state.priority_player();
            let mut current = state;
            for _ in 0..count {
                current = PriorityManager::pass_priority(&current);
            }
            assert_eq!(current.priority_player(), start, "{count} players");
        }
    }

    #[test]
    fn test_lost_players_never_get_priority() {
        let state = game_with_players(3);
        let seats = state.player_ids().to_vec();
        let (alice, bob, carol) = (seats[0], seats[1], seats[2]);

        let mut state = state;
        state.players.get_mut(alice).unwrap().lose_game(LossReason::ZeroLife);

        let moved = PriorityManager::skip_lost_holder(&state);
        assert_eq!(moved.priority_player(), bob);
        // Alice is still active, but priority goes round her
        assert_eq!(PriorityManager::set_active_player_priority(&moved).priority_player(), bob);
        let once = PriorityManager::pass_priority(&moved);
        assert_eq!(once.priority_player(), carol);
        assert_eq!(PriorityManager::pass_priority(&once).priority_player(), bob);

        // A holder still in the game keeps it
        assert_eq!(PriorityManager::skip_lost_holder(&moved), moved);
    }

    #[test]
    fn test_reset_to_active_player() {
        let TestGame { state, alice, .. } = two_player_game();
        let passed = PriorityManager::pass_priority(&state);
        let reset = PriorityManager::set_active_player_priority(&passed);
        assert_eq!(reset.priority_player(), alice);
    }
}
