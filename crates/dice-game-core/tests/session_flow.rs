//! Integration tests for the turn-flow state machine.
//!
//! Sessions are driven end to end with a scripted console and scripted
//! entropy, so every hidden secret and every answer is known in advance.

use dice_game_core::{
    Die, GameEngine, GameError, HmacSha3_256, MacAlgorithm, MacDigest, Phase, ProbabilityMatrix,
    ProbabilityRenderer, RoundResult, ScriptedConsole, ScriptedEntropy, SessionState, Side,
};
use std::cell::Cell;

fn die(faces: &[u32]) -> Die {
    Die::new(faces.to_vec()).unwrap()
}

fn cycle() -> Vec<Die> {
    vec![
        die(&[2, 2, 4, 4, 9, 9]),
        die(&[1, 1, 6, 6, 8, 8]),
        die(&[3, 3, 5, 5, 7, 7]),
    ]
}

fn engine(values: &[u32], inputs: &[&str]) -> GameEngine<ScriptedEntropy, ScriptedConsole> {
    GameEngine::new(
        cycle(),
        Box::new(HmacSha3_256),
        ScriptedEntropy::new(values.iter().copied()),
        ScriptedConsole::new(inputs.iter().copied()),
    )
    .unwrap()
}

/// MAC that answers differently every time it is asked
struct ForgetfulMac {
    calls: Cell<u8>,
}

impl MacAlgorithm for ForgetfulMac {
    fn name(&self) -> &'static str {
        "forgetful"
    }

    fn compute(&self, _key: &[u8], _message: &[u8]) -> dice_game_core::Result<MacDigest> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        Ok(MacDigest::from_bytes(vec![n; 32]))
    }
}

/// MAC that breaks on one specific call
struct BrokenOnCall {
    inner: HmacSha3_256,
    fail_at: u8,
    calls: Cell<u8>,
}

impl MacAlgorithm for BrokenOnCall {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn compute(&self, key: &[u8], message: &[u8]) -> dice_game_core::Result<MacDigest> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n == self.fail_at {
            return Err(GameError::InvalidKey("simulated failure".to_string()));
        }
        self.inner.compute(key, message)
    }
}

/// MAC that is honest until one call, where it returns a flipped digest
struct TamperedOnCall {
    inner: HmacSha3_256,
    tamper_at: u8,
    calls: Cell<u8>,
}

impl MacAlgorithm for TamperedOnCall {
    fn name(&self) -> &'static str {
        "tampered"
    }

    fn compute(&self, key: &[u8], message: &[u8]) -> dice_game_core::Result<MacDigest> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        let digest = self.inner.compute(key, message)?;
        if n != self.tamper_at {
            return Ok(digest);
        }
        let mut bytes = digest.as_bytes().to_vec();
        bytes[0] ^= 0xFF;
        Ok(MacDigest::from_bytes(bytes))
    }
}

struct StubRenderer;

impl ProbabilityRenderer for StubRenderer {
    fn render(&self, dice: &[Die], _matrix: &ProbabilityMatrix) -> String {
        format!("stub table for {} dice", dice.len())
    }
}

#[test]
fn test_session_requires_three_dice() {
    let result = GameEngine::new(
        cycle()[..2].to_vec(),
        Box::new(HmacSha3_256),
        ScriptedEntropy::default(),
        ScriptedConsole::default(),
    );
    assert!(matches!(result, Err(GameError::InputValidation(_))));
}

#[test]
fn test_session_requires_equal_face_counts() {
    let mut dice = cycle();
    dice.push(die(&[1, 2, 3]));
    let result = GameEngine::new(
        dice,
        Box::new(HmacSha3_256),
        ScriptedEntropy::default(),
        ScriptedConsole::default(),
    );
    assert!(matches!(result, Err(GameError::InputValidation(_))));
}

#[test]
fn test_correct_guess_lets_user_move_first() {
    // Secret 0, guess 0: combined result 0
    let mut engine = engine(&[0], &["0"]);
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    assert_eq!(state.phase(), Phase::UserPicksFirst);
    assert_eq!(state.first_mover(), Some(Side::User));
    assert!(engine.console().saw("My selection: 0 (KEY="));
}

#[test]
fn test_wrong_guess_lets_computer_move_first() {
    // Secret 1, guess 0: combined result 1
    let mut engine = engine(&[1], &["0"]);
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    assert_eq!(state.phase(), Phase::ComputerPicksFirst);
    assert_eq!(state.first_mover(), Some(Side::Computer));
}

#[test]
fn test_digest_and_key_are_uppercase_hex() {
    let mut engine = engine(&[1], &["1"]);
    engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    let key_line = engine
        .console()
        .transcript()
        .iter()
        .find(|l| l.contains("KEY="))
        .unwrap()
        .clone();
    assert!(key_line.contains(&"42".repeat(32)));

    let hmac_line = engine
        .console()
        .transcript()
        .iter()
        .find(|l| l.contains("HMAC="))
        .unwrap()
        .clone();
    let hex: String = hmac_line
        .split("HMAC=")
        .nth(1)
        .unwrap()
        .trim_end_matches(").")
        .to_string();
    assert_eq!(hex.len(), 64);
    assert!(hex.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[test]
fn test_invalid_guess_reprompts_without_new_commitment() {
    let mut engine = engine(&[0], &["7", "abc", "0"]);
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    assert_eq!(state.phase(), Phase::UserPicksFirst);
    let hmac_lines = engine
        .console()
        .transcript()
        .iter()
        .filter(|l| l.contains("HMAC="))
        .count();
    assert_eq!(hmac_lines, 1);
    assert!(engine.console().saw("Invalid input"));
}

#[test]
fn test_help_renders_table_and_stays_in_state() {
    let mut engine = engine(&[0], &["?", "0"]);
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    assert_eq!(state.phase(), Phase::UserPicksFirst);
    assert!(engine.console().saw("Win Probabilities"));
    assert!(engine.console().saw("0.5556"));
    assert_eq!(engine.entropy().remaining(), 0);
}

#[test]
fn test_exit_at_first_move() {
    let mut engine = engine(&[0], &["x"]);
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();
    assert_eq!(state.phase(), Phase::End);
    assert_eq!(state.first_mover(), None);
}

#[test]
fn test_custom_renderer_answers_help() {
    let mut engine = engine(&[0], &["?", "0"]).with_renderer(Box::new(StubRenderer));
    let state = engine
        .step(SessionState::entering(Phase::DetermineFirstMove))
        .unwrap();

    assert_eq!(state.phase(), Phase::UserPicksFirst);
    assert!(engine.console().saw("stub table for 3 dice"));
    assert!(!engine.console().saw("Win Probabilities"));
}

#[test]
fn test_exit_when_user_picks_first() {
    let mut engine = engine(&[0], &["X"]);
    let state = engine
        .step(SessionState::entering(Phase::UserPicksFirst))
        .unwrap();

    assert_eq!(state.phase(), Phase::End);
    assert_eq!(state.user_die(), None);
    assert_eq!(engine.entropy().remaining(), 1);
}

#[test]
fn test_exit_when_computer_picks_first() {
    let mut engine = engine(&[2], &["x"]);
    let state = engine
        .step(SessionState::entering(Phase::ComputerPicksFirst))
        .unwrap();

    assert_eq!(state.phase(), Phase::End);
    assert_eq!(state.computer_die(), Some(2));
    assert_eq!(state.user_die(), None);
}

#[test]
fn test_preset_computer_die_out_of_range_is_protocol_error() {
    let mut engine = engine(&[], &["0"]);
    let err = engine
        .step(SessionState::entering(Phase::ComputerPicksFirst).with_dice(None, Some(9)))
        .unwrap_err();
    assert!(matches!(err, GameError::Protocol(_)));
    assert!(engine.console().transcript().is_empty());
}

#[test]
fn test_user_cannot_take_computer_die() {
    // Computer picks die 1, user tries 1 then settles on 2
    let mut engine = engine(&[1], &["1", "2"]);
    let state = engine
        .step(SessionState::entering(Phase::ComputerPicksFirst))
        .unwrap();

    assert!(engine.console().saw("You cannot select my dice"));
    assert_eq!(state.phase(), Phase::RoundInProgress);
    assert_eq!(state.computer_die(), Some(1));
    assert_eq!(state.user_die(), Some(2));
}

#[test]
fn test_user_may_take_first_remaining_die() {
    let mut engine = engine(&[1], &["0"]);
    let state = engine
        .step(SessionState::entering(Phase::ComputerPicksFirst))
        .unwrap();

    assert!(!engine.console().saw("You cannot select my dice"));
    assert_eq!(state.user_die(), Some(0));
}

#[test]
fn test_computer_choice_survives_help() {
    // Help must not make the computer pick again
    let mut engine = engine(&[2, 0], &["?", "0"]);
    let state = engine
        .step(SessionState::entering(Phase::ComputerPicksFirst))
        .unwrap();

    assert_eq!(state.computer_die(), Some(2));
    assert_eq!(engine.entropy().remaining(), 1);
}

#[test]
fn test_computer_picks_from_remaining_dice() {
    for (draw, user, expected) in [(0, 0, 1), (1, 0, 2), (0, 1, 0), (1, 1, 2), (1, 2, 1)] {
        let input = user.to_string();
        let mut engine = engine(&[draw], &[input.as_str()]);
        let state = engine
            .step(SessionState::entering(Phase::UserPicksFirst))
            .unwrap();

        assert_eq!(state.user_die(), Some(user));
        assert_eq!(state.computer_die(), Some(expected));
        assert_ne!(state.user_die(), state.computer_die());
    }
}

#[test]
fn test_round_nine_beats_six() {
    // User secret 4 plus 0 lands on face 9; computer secret 2 plus 0 lands on face 6
    let mut engine = engine(&[4, 2, 0], &["0"]);
    let state = engine
        .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(0), Some(1)))
        .unwrap();

    assert_eq!(state.phase(), Phase::RoundResolved);
    let report = state.last_round().unwrap();
    assert_eq!(report.user_roll, 9);
    assert_eq!(report.computer_roll, 6);
    assert_eq!(report.result, RoundResult::UserWins);
    assert!(engine.console().saw("You win (9 > 6)!"));
    assert!(engine.console().saw("4 + 0 = 4 (mod 6)"));
}

#[test]
fn test_round_tie_is_not_rerolled() {
    let dice = vec![
        die(&[5, 5, 5]),
        die(&[5, 1, 9]),
        die(&[2, 4, 6]),
    ];
    let mut engine = GameEngine::new(
        dice,
        Box::new(HmacSha3_256),
        ScriptedEntropy::new([0, 0, 0]),
        ScriptedConsole::new(["2"]),
    )
    .unwrap();
    // User secret 0 plus 2 lands on face 5; computer lands on face 5 too
    let state = engine
        .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(0), Some(1)))
        .unwrap();

    assert_eq!(state.last_round().unwrap().result, RoundResult::Tie);
    assert_eq!(state.scoreboard().ties, 1);
    assert!(engine.console().saw("It's a tie (5 = 5)!"));
}

#[test]
fn test_exit_during_roll_ends_session() {
    let mut engine = engine(&[4], &["X"]);
    let state = engine
        .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(0), Some(1)))
        .unwrap();

    assert_eq!(state.phase(), Phase::End);
    assert_eq!(state.scoreboard().rounds_played(), 0);
}

#[test]
fn test_round_without_dice_is_protocol_error() {
    let mut engine = engine(&[], &[]);
    let err = engine
        .step(SessionState::entering(Phase::RoundInProgress))
        .unwrap_err();
    assert!(matches!(err, GameError::Protocol(_)));
}

#[test]
fn test_round_with_unknown_die_is_protocol_error() {
    for (user, computer) in [(7, 1), (0, 3)] {
        let mut engine = engine(&[4, 2, 0], &["0"]);
        let err = engine
            .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(user), Some(computer)))
            .unwrap_err();
        assert!(matches!(err, GameError::Protocol(_)), "{user} vs {computer}");
        assert_eq!(engine.entropy().remaining(), 3);
    }
}

#[test]
fn test_round_with_shared_die_is_protocol_error() {
    let mut engine = engine(&[4, 2, 0], &["0"]);
    let err = engine
        .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(1), Some(1)))
        .unwrap_err();
    assert!(matches!(err, GameError::Protocol(_)));
    assert!(!engine.console().saw("It's time for your roll."));
}

#[test]
fn test_full_session_user_wins() {
    // Guess 0 against secret 1: computer first, takes die 1.
    // User takes die 0, rolls 9 against 6, then declines another round.
    let mut engine = engine(&[1, 1, 4, 2, 0], &["0", "0", "0", "N"]);
    let state = engine.run().unwrap();

    assert_eq!(state.phase(), Phase::End);
    assert_eq!(state.scoreboard().user_wins, 1);
    assert_eq!(state.scoreboard().rounds_played(), 1);
    assert!(engine.console().saw("You win (9 > 6)!"));
    assert!(engine.console().saw("Thank you for playing!"));
}

#[test]
fn test_play_again_starts_new_round() {
    let mut engine = engine(
        &[1, 1, 4, 2, 0, 1, 1, 0, 0, 0],
        &["0", "0", "0", "y", "0", "0", "0", "n"],
    );
    let state = engine.run().unwrap();

    // Second round: user face 2 against computer face 1
    assert_eq!(state.scoreboard().rounds_played(), 2);
    assert_eq!(state.scoreboard().user_wins, 2);
    assert!(engine.console().saw("Final score: you 2 - 0 me (0 ties)."));
}

#[test]
fn test_anything_but_yes_ends_session() {
    for answer in ["n", "no", "maybe", "X", ""] {
        let mut engine = engine(&[1, 1, 4, 2, 0], &["0", "0", "0", answer]);
        let state = engine.run().unwrap();
        assert_eq!(state.scoreboard().rounds_played(), 1, "{answer}");
    }
}

#[test]
fn test_end_of_input_ends_session() {
    let mut engine = engine(&[0], &[]);
    let state = engine.run().unwrap();
    assert_eq!(state.phase(), Phase::End);
    assert!(engine.console().saw("Thank you for playing!"));
}

#[test]
fn test_trust_violation_terminates_session() {
    let mut engine = GameEngine::new(
        cycle(),
        Box::new(ForgetfulMac {
            calls: Cell::new(0),
        }),
        ScriptedEntropy::new([0]),
        ScriptedConsole::new(["0"]),
    )
    .unwrap();

    let err = engine.run().unwrap_err();
    assert!(matches!(err, GameError::TrustViolation { .. }));
}

#[test]
fn test_failure_in_round_is_abandoned_not_fatal() {
    // Call 1 commits the first move, call 2 verifies it, call 3 fails the user roll
    let mut engine = GameEngine::new(
        cycle(),
        Box::new(BrokenOnCall {
            inner: HmacSha3_256,
            fail_at: 3,
            calls: Cell::new(0),
        }),
        ScriptedEntropy::new([1, 1]),
        ScriptedConsole::new(["0", "0", "N"]),
    )
    .unwrap();

    let state = engine.run().unwrap();
    assert_eq!(state.scoreboard().abandoned, 1);
    assert_eq!(state.scoreboard().rounds_played(), 0);
    assert!(engine.console().saw("Error in game round"));
    assert!(engine.console().saw("Play again?"));
}

#[test]
fn test_trust_violation_during_roll_is_not_abandoned() {
    // Calls 1 and 2 settle the first move honestly; call 3 commits the
    // user roll and call 4 recomputes it with a different result.
    let mut engine = GameEngine::new(
        cycle(),
        Box::new(TamperedOnCall {
            inner: HmacSha3_256,
            tamper_at: 4,
            calls: Cell::new(0),
        }),
        ScriptedEntropy::new([1, 1]),
        ScriptedConsole::new(["0", "0", "0", "N"]),
    )
    .unwrap();

    let err = engine.run().unwrap_err();
    assert!(matches!(err, GameError::TrustViolation { .. }));
    assert!(engine.console().saw("Add your number modulo 6:"));
    assert!(!engine.console().saw("Error in game round"));
    assert!(!engine.console().saw("Play again?"));
    assert_eq!(engine.console().remaining(), 1);
}

#[test]
fn test_trust_violation_in_round_step_is_returned() {
    let mut engine = GameEngine::new(
        cycle(),
        Box::new(TamperedOnCall {
            inner: HmacSha3_256,
            tamper_at: 2,
            calls: Cell::new(0),
        }),
        ScriptedEntropy::new([4]),
        ScriptedConsole::new(["0"]),
    )
    .unwrap();

    let err = engine
        .step(SessionState::entering(Phase::RoundInProgress).with_dice(Some(0), Some(1)))
        .unwrap_err();
    assert!(matches!(err, GameError::TrustViolation { .. }));
    assert!(!engine.console().saw("My number is"));
}
