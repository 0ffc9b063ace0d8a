//! Session state types.

use serde::Serialize;
use std::fmt;

/// Where the session currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    Start,
    DetermineFirstMove,
    UserPicksFirst,
    ComputerPicksFirst,
    RoundInProgress,
    RoundResolved,
    ContinueSession,
    End,
}

/// One of the two parties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Side {
    User,
    Computer,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::User => write!(f, "user"),
            Side::Computer => write!(f, "computer"),
        }
    }
}

/// Round result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RoundResult {
    UserWins,
    ComputerWins,
    Tie,
}

impl RoundResult {
    /// Higher roll wins, equal rolls tie
    pub fn judge(user_roll: u32, computer_roll: u32) -> Self {
        match user_roll.cmp(&computer_roll) {
            std::cmp::Ordering::Greater => RoundResult::UserWins,
            std::cmp::Ordering::Less => RoundResult::ComputerWins,
            std::cmp::Ordering::Equal => RoundResult::Tie,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoundResult::UserWins => "User wins",
            RoundResult::ComputerWins => "Computer wins",
            RoundResult::Tie => "Tie",
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved round
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub user_die: usize,
    pub computer_die: usize,
    pub user_roll: u32,
    pub computer_roll: u32,
    pub result: RoundResult,
}

/// Tally of rounds played in this session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub user_wins: u32,
    pub computer_wins: u32,
    pub ties: u32,
    pub abandoned: u32,
}

impl Scoreboard {
    pub fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::UserWins => self.user_wins += 1,
            RoundResult::ComputerWins => self.computer_wins += 1,
            RoundResult::Tie => self.ties += 1,
        }
    }

    /// Rounds that reached a result
    pub fn rounds_played(&self) -> u32 {
        self.user_wins + self.computer_wins + self.ties
    }
}

/// Everything the state machine carries between transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    first_mover: Option<Side>,
    user_die: Option<usize>,
    computer_die: Option<usize>,
    last_round: Option<RoundReport>,
    scoreboard: Scoreboard,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// A fresh session in [`Phase::Start`]
    pub fn new() -> Self {
        Self::entering(Phase::Start)
    }

    /// A fresh session about to run `phase`
    pub fn entering(phase: Phase) -> Self {
        Self {
            phase,
            first_mover: None,
            user_die: None,
            computer_die: None,
            last_round: None,
            scoreboard: Scoreboard::default(),
        }
    }

    /// Preset die choices, for resuming at a later phase
    pub fn with_dice(mut self, user_die: Option<usize>, computer_die: Option<usize>) -> Self {
        self.user_die = user_die;
        self.computer_die = computer_die;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn first_mover(&self) -> Option<Side> {
        self.first_mover
    }

    pub fn user_die(&self) -> Option<usize> {
        self.user_die
    }

    pub fn computer_die(&self) -> Option<usize> {
        self.computer_die
    }

    pub fn last_round(&self) -> Option<&RoundReport> {
        self.last_round.as_ref()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::End
    }

    pub(crate) fn goto(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub(crate) fn finish(self) -> Self {
        self.goto(Phase::End)
    }

    pub(crate) fn set_first_mover(&mut self, side: Side) {
        self.first_mover = Some(side);
    }

    pub(crate) fn set_user_die(&mut self, index: usize) {
        self.user_die = Some(index);
    }

    pub(crate) fn set_computer_die(&mut self, index: usize) {
        self.computer_die = Some(index);
    }

    pub(crate) fn record_round(&mut self, report: RoundReport) {
        self.scoreboard.record(report.result);
        self.last_round = Some(report);
    }

    pub(crate) fn record_abandoned(&mut self) {
        self.scoreboard.abandoned += 1;
        self.last_round = None;
    }

    /// Forget this round's choices, keep the tally
    pub(crate) fn reset_round(&mut self) {
        self.first_mover = None;
        self.user_die = None;
        self.computer_die = None;
        self.last_round = None;
    }
}
