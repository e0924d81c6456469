use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Valid transitions:
/// - AwaitingFirstSelection -> AwaitingSecondSelection
/// - AwaitingSecondSelection -> PendingResolution
/// - PendingResolution -> AwaitingFirstSelection
/// - PendingResolution -> GameOver
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    #[default]
    AwaitingFirstSelection,
    AwaitingSecondSelection,
    /// Two cards are face up until the resolution deadline passes
    PendingResolution,
    /// Every pair was found, no further input is accepted
    GameOver,
}

impl ControllerState {
    pub const fn accepts_selection(self) -> bool {
        matches!(
            self,
            Self::AwaitingFirstSelection | Self::AwaitingSecondSelection
        )
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Runs a session: turns player selections and clock ticks into board changes and score.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchController {
    board: Board,
    state: ControllerState,
    selection: SmallVec<[CardPos; 2]>,
    resolution_deadline: Option<Timestamp>,
    clock: Timestamp,
    flip_delay: Duration,
    score: u32,
}

impl MatchController {
    pub fn new(board: Board) -> Self {
        Self::with_flip_delay(board, DEFAULT_FLIP_DELAY)
    }

    pub fn with_flip_delay(board: Board, flip_delay: Duration) -> Self {
        let state = if board.all_matched() {
            log::debug!("Board has no cards, game is over from the start");
            ControllerState::GameOver
        } else {
            ControllerState::default()
        };
        Self {
            board,
            state,
            selection: SmallVec::new(),
            resolution_deadline: None,
            clock: Duration::ZERO,
            flip_delay,
            score: 0,
        }
    }

    pub fn from_config<G: DeckGenerator>(config: &GameConfig, generator: G) -> Self {
        Self::with_flip_delay(Board::build(&config.faces, generator), config.flip_delay())
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Cards flipped this turn and not yet resolved, in selection order.
    pub fn selection(&self) -> &[CardPos] {
        &self.selection
    }

    pub fn resolution_deadline(&self) -> Option<Timestamp> {
        self.resolution_deadline
    }

    /// Latest clock value seen, deadlines are measured from it.
    pub fn clock(&self) -> Timestamp {
        self.clock
    }

    pub fn flip_delay(&self) -> Duration {
        self.flip_delay
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_controller(self)
    }

    /// Flip the card at `pos`, anything that is not a legal flip right now is ignored.
    pub fn select(&mut self, pos: CardPos) -> SelectOutcome {
        if !self.state.accepts_selection() {
            log::trace!("Ignoring card {} while {:?}", pos, self.state);
            return SelectOutcome::Ignored;
        }
        if !self.board.is_selectable(pos) {
            log::trace!("Ignoring card {}, it cannot be flipped", pos);
            return SelectOutcome::Ignored;
        }

        self.board.reveal(pos);
        self.selection.push(pos);
        log::debug!("Revealed card {} at {:?}", pos, self.clock);

        match self.selection.len() {
            1 => {
                self.state = ControllerState::AwaitingSecondSelection;
                SelectOutcome::Revealed
            }
            _ => {
                let deadline = self.clock.saturating_add(self.flip_delay);
                self.resolution_deadline = Some(deadline);
                self.state = ControllerState::PendingResolution;
                log::debug!("Pair {:?} resolves at {:?}", self.selection, deadline);
                SelectOutcome::PairPending
            }
        }
    }

    /// Advance the clock to `now` first, then select, for callers that know when the click happened.
    pub fn select_at(&mut self, pos: CardPos, now: Timestamp) -> SelectOutcome {
        self.advance_clock(now);
        self.select(pos)
    }

    /// Advance the clock and resolve the pending pair once its deadline has passed.
    pub fn tick(&mut self, now: Timestamp) -> TickOutcome {
        self.advance_clock(now);

        if !matches!(self.state, ControllerState::PendingResolution) {
            return TickOutcome::NoChange;
        }
        match self.resolution_deadline {
            Some(deadline) if self.clock >= deadline => self.resolve_pair(),
            _ => TickOutcome::NoChange,
        }
    }

    fn advance_clock(&mut self, now: Timestamp) {
        if now < self.clock {
            log::warn!(
                "Clock went backwards from {:?} to {:?}, keeping the later value",
                self.clock,
                now
            );
            return;
        }
        self.clock = now;
    }

    fn resolve_pair(&mut self) -> TickOutcome {
        let &[first, second] = self.selection.as_slice() else {
            unreachable!("pending resolution without two selected cards");
        };

        let outcome = if self.board.pair_key_at(first) == self.board.pair_key_at(second) {
            self.board.confirm_match(first, second);
            self.score = self.score.saturating_add(MATCH_AWARD);
            log::info!(
                "Cards {} and {} match, score is now {}",
                first,
                second,
                self.score
            );
            TickOutcome::Matched
        } else {
            self.board.reset_pair(first, second);
            log::info!("Cards {} and {} do not match", first, second);
            TickOutcome::Mismatched
        };

        self.selection.clear();
        self.resolution_deadline = None;

        if self.board.all_matched() {
            self.state = ControllerState::GameOver;
            log::info!(
                "All {} pairs found, final score {}",
                self.board.total_pairs(),
                self.score
            );
            TickOutcome::Won
        } else {
            self.state = ControllerState::AwaitingFirstSelection;
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const A: PairKey = PairKey::new(0);
    const B: PairKey = PairKey::new(1);

    fn secs(secs: u64) -> Timestamp {
        Duration::from_secs(secs)
    }

    fn millis(millis: u64) -> Timestamp {
        Duration::from_millis(millis)
    }

    /// Faces `[A, B]` dealt as `A B A B`.
    fn two_pair_controller() -> MatchController {
        let deck = Deck::from_arrangement(&["A", "B"], &[A, B, A, B]).unwrap();
        MatchController::new(Board::new(deck))
    }

    fn positions(controller: &MatchController, key: PairKey) -> (CardPos, CardPos) {
        let found: Vec<_> = controller.board().positions_of(key).collect();
        (found[0], found[1])
    }

    #[test]
    fn starts_awaiting_first_selection() {
        let controller = two_pair_controller();

        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
        assert_eq!(controller.score(), 0);
        assert!(controller.selection().is_empty());
        assert_eq!(controller.resolution_deadline(), None);
    }

    #[test]
    fn empty_board_is_game_over_immediately() {
        let faces: [&str; 0] = [];
        let mut controller =
            MatchController::from_config(&GameConfig::new(faces), RandomDeckGenerator::new(3));

        assert_eq!(controller.state(), ControllerState::GameOver);
        assert_eq!(controller.score(), 0);
        assert!(controller.snapshot().game_over);
        assert_eq!(controller.select(0), SelectOutcome::Ignored);
        assert_eq!(controller.tick(secs(10)), TickOutcome::NoChange);
    }

    #[test]
    fn second_selection_sets_deadline_from_second_reveal() {
        let mut controller = two_pair_controller();

        assert_eq!(controller.select_at(0, secs(2)), SelectOutcome::Revealed);
        assert_eq!(controller.state(), ControllerState::AwaitingSecondSelection);
        assert_eq!(controller.tick(secs(5)), TickOutcome::NoChange);
        assert_eq!(controller.select(1), SelectOutcome::PairPending);

        assert_eq!(controller.state(), ControllerState::PendingResolution);
        assert_eq!(controller.selection(), &[0, 1]);
        assert_eq!(controller.resolution_deadline(), Some(secs(6)));
    }

    #[test]
    fn selecting_revealed_or_matched_card_is_ignored() {
        let mut controller = two_pair_controller();
        controller.select(0);
        let before = controller.clone();

        assert_eq!(controller.select(0), SelectOutcome::Ignored);
        assert_eq!(controller, before);

        controller.select(2);
        controller.tick(secs(1));
        assert!(controller.board().card_at(0).unwrap().is_matched());
        let snapshot = controller.snapshot();

        assert_eq!(controller.select(2), SelectOutcome::Ignored);
        assert_eq!(controller.snapshot(), snapshot);
        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut controller = two_pair_controller();

        assert_eq!(controller.select(4), SelectOutcome::Ignored);
        assert_eq!(controller.select(usize::MAX), SelectOutcome::Ignored);
        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
    }

    #[test]
    fn selection_while_pending_is_ignored() {
        let mut controller = two_pair_controller();
        controller.select(0);
        controller.select(1);

        assert_eq!(controller.select(2), SelectOutcome::Ignored);
        assert!(!controller.board().card_at(2).unwrap().is_revealed());
        assert_eq!(controller.selection(), &[0, 1]);
    }

    #[test]
    fn matching_pair_scores_after_deadline() {
        let mut controller = two_pair_controller();
        let (a1, a2) = positions(&controller, A);
        controller.select(a1);
        controller.select(a2);

        assert_eq!(controller.tick(millis(999)), TickOutcome::NoChange);
        assert_eq!(controller.state(), ControllerState::PendingResolution);
        assert_eq!(controller.tick(secs(1)), TickOutcome::Matched);

        let board = controller.board();
        assert!(board.card_at(a1).unwrap().is_matched());
        assert!(board.card_at(a2).unwrap().is_matched());
        assert_eq!(controller.score(), MATCH_AWARD);
        assert!(controller.selection().is_empty());
        assert_eq!(controller.resolution_deadline(), None);
        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
    }

    #[test]
    fn mismatched_pair_flips_back_after_deadline() {
        let mut controller = two_pair_controller();
        controller.select(0);
        controller.select(1);

        assert_eq!(controller.tick(secs(3)), TickOutcome::Mismatched);

        let board = controller.board();
        for pos in [0, 1] {
            let card = board.card_at(pos).unwrap();
            assert!(!card.is_revealed());
            assert!(!card.is_matched());
        }
        assert_eq!(controller.score(), 0);
        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
    }

    #[test]
    fn tick_before_deadline_changes_nothing() {
        let mut controller = two_pair_controller();
        controller.select_at(0, secs(1));
        controller.select(1);
        let before = controller.clone();

        assert_eq!(controller.tick(secs(1)), TickOutcome::NoChange);
        assert_eq!(controller.tick(millis(1999)), TickOutcome::NoChange);

        assert_eq!(controller.state(), before.state());
        assert_eq!(controller.board(), before.board());
        assert_eq!(controller.snapshot(), before.snapshot());
    }

    #[test]
    fn backwards_clock_is_ignored() {
        let mut controller = two_pair_controller();
        controller.tick(secs(10));
        controller.select(0);
        controller.select(1);

        assert_eq!(controller.tick(secs(1)), TickOutcome::NoChange);
        assert_eq!(controller.clock(), secs(10));
        assert_eq!(controller.resolution_deadline(), Some(secs(11)));
        assert_eq!(controller.tick(secs(11)), TickOutcome::Mismatched);
    }

    #[test]
    fn custom_flip_delay_is_honored() {
        let deck = Deck::from_arrangement(&["A"], &[A, A]).unwrap();
        let mut controller = MatchController::with_flip_delay(Board::new(deck), millis(250));
        controller.select(0);
        controller.select(1);

        assert_eq!(controller.tick(millis(249)), TickOutcome::NoChange);
        assert_eq!(controller.tick(millis(250)), TickOutcome::Won);
    }

    #[test]
    fn two_pair_scenario_runs_to_game_over() {
        let mut controller = two_pair_controller();
        let (a1, a2) = positions(&controller, A);
        let (b1, b2) = positions(&controller, B);

        controller.select(a1);
        assert_eq!(controller.select(b1), SelectOutcome::PairPending);
        assert_eq!(controller.state(), ControllerState::PendingResolution);
        assert_eq!(controller.tick(secs(1)), TickOutcome::Mismatched);
        assert!(!controller.board().card_at(a1).unwrap().is_revealed());
        assert!(!controller.board().card_at(b1).unwrap().is_revealed());
        assert_eq!(controller.state(), ControllerState::AwaitingFirstSelection);
        assert_eq!(controller.score(), 0);

        controller.select(a1);
        controller.select(a2);
        assert_eq!(controller.tick(secs(2)), TickOutcome::Matched);
        assert_eq!(controller.score(), 10);

        controller.select(b1);
        controller.select(b2);
        assert_eq!(controller.tick(secs(3)), TickOutcome::Won);
        assert_eq!(controller.score(), 20);
        assert_eq!(controller.state(), ControllerState::GameOver);
    }

    #[test]
    fn game_over_is_terminal() {
        let deck = Deck::from_arrangement(&["A"], &[A, A]).unwrap();
        let mut controller = MatchController::new(Board::new(deck));
        controller.select(0);
        controller.select(1);
        assert_eq!(controller.tick(secs(1)), TickOutcome::Won);
        let finished = controller.clone();

        for pos in 0..3 {
            assert_eq!(controller.select(pos), SelectOutcome::Ignored);
        }
        assert_eq!(controller.tick(secs(100)), TickOutcome::NoChange);

        assert_eq!(controller.state(), ControllerState::GameOver);
        assert_eq!(controller.score(), finished.score());
        assert_eq!(controller.snapshot(), finished.snapshot());
    }

    #[test]
    fn seeded_sessions_always_finish_with_full_score() {
        let config = GameConfig::default();
        for seed in 0..20 {
            let mut controller = MatchController::from_config(&config, RandomDeckGenerator::new(seed));
            let mut now = Duration::ZERO;

            for index in 0..config.pair_count() {
                let key = PairKey::from_index(index).unwrap();
                let (first, second) = positions(&controller, key);
                controller.select(first);
                controller.select(second);
                now += config.flip_delay();
                assert!(controller.tick(now).is_match());
            }

            assert!(controller.is_finished());
            assert_eq!(controller.score(), MATCH_AWARD * config.pair_count() as u32);
        }
    }
}
