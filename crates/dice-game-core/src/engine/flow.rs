//! The game engine: drives a session one transition at a time.

use super::prompt::{parse_choice, Choice};
use super::state::{Phase, RoundReport, RoundResult, SessionState, Side};
use crate::console::Console;
use crate::crypto::{EntropySource, MacAlgorithm};
use crate::dice::{validate_dice_set, Die};
use crate::error::{GameError, Result};
use crate::fairness::{FairExchange, Reveal};
use crate::probability::win_probabilities;
use crate::render::{ProbabilityRenderer, TableRenderer};
use tracing::{error, info, warn};

const SELECTION_PROMPT: &str = "Your selection: ";
const PLAY_AGAIN_PROMPT: &str = "Play again? (Y/N): ";

/// Answer to a menu once help requests and bad input are dealt with
enum Answer {
    Value(u32),
    Exit,
}

/// Runs game sessions over a fixed set of dice
pub struct GameEngine<E, C> {
    dice: Vec<Die>,
    face_count: u32,
    mac: Box<dyn MacAlgorithm>,
    entropy: E,
    console: C,
    renderer: Box<dyn ProbabilityRenderer>,
}

impl<E: EntropySource, C: Console> GameEngine<E, C> {
    /// Create an engine; the dice must form a playable set
    pub fn new(dice: Vec<Die>, mac: Box<dyn MacAlgorithm>, entropy: E, console: C) -> Result<Self> {
        let face_count = validate_dice_set(&dice)?;
        let face_count = u32::try_from(face_count)
            .map_err(|_| GameError::invalid("Dice have too many faces."))?;

        Ok(Self {
            dice,
            face_count,
            mac,
            entropy,
            console,
            renderer: Box::new(TableRenderer::default()),
        })
    }

    /// Replace the renderer used for help requests
    pub fn with_renderer(mut self, renderer: Box<dyn ProbabilityRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn entropy(&self) -> &E {
        &self.entropy
    }

    /// Play until the user leaves. Returns the final state.
    pub fn run(&mut self) -> Result<SessionState> {
        info!(dice = self.dice.len(), faces = self.face_count, mac = self.mac.name(), "Session started");

        let mut state = SessionState::new();
        while !state.is_finished() {
            state = self.step(state)?;
        }

        let board = *state.scoreboard();
        info!(
            user_wins = board.user_wins,
            computer_wins = board.computer_wins,
            ties = board.ties,
            abandoned = board.abandoned,
            "Session ended"
        );
        if board.rounds_played() > 0 {
            self.console.show(&format!(
                "Final score: you {} - {} me ({} ties).",
                board.user_wins, board.computer_wins, board.ties
            ))?;
        }
        self.console.show("Thank you for playing!")?;
        Ok(state)
    }

    /// Execute exactly one transition
    pub fn step(&mut self, state: SessionState) -> Result<SessionState> {
        match state.phase() {
            Phase::Start => Ok(state.goto(Phase::DetermineFirstMove)),
            Phase::DetermineFirstMove => self.determine_first_move(state),
            Phase::UserPicksFirst => self.user_picks_first(state),
            Phase::ComputerPicksFirst => self.computer_picks_first(state),
            Phase::RoundInProgress => self.play_round(state),
            Phase::RoundResolved => self.ask_play_again(state),
            Phase::ContinueSession => {
                let mut state = state;
                state.reset_round();
                Ok(state.goto(Phase::DetermineFirstMove))
            }
            Phase::End => Ok(state),
        }
    }

    fn determine_first_move(&mut self, mut state: SessionState) -> Result<SessionState> {
        self.console.show("Let's determine who makes the first move.")?;

        let mut exchange = FairExchange::begin(2, self.mac.as_ref(), &mut self.entropy)?;
        self.console.show(&format!(
            "I selected a random value in the range 0..1 (HMAC={}).",
            exchange.digest()
        ))?;

        let options = numeric_options(2);
        let guess = match self.ask("Try to guess my selection:", &options, 2, |_| Ok(()))? {
            Answer::Value(v) => v,
            Answer::Exit => return Ok(state.finish()),
        };

        exchange.supply_counterpart_value(guess)?;
        let reveal = exchange.reveal()?;
        reveal.verify(self.mac.as_ref())?;

        self.console.show(&format!(
            "My selection: {} (KEY={}).",
            reveal.secret(),
            reveal.key().to_hex()
        ))?;

        let first = if guess == reveal.secret() {
            Side::User
        } else {
            Side::Computer
        };
        info!(exchange = %reveal.id(), first_mover = %first, "First move decided");
        state.set_first_mover(first);

        Ok(match first {
            Side::User => state.goto(Phase::UserPicksFirst),
            Side::Computer => state.goto(Phase::ComputerPicksFirst),
        })
    }

    fn user_picks_first(&mut self, mut state: SessionState) -> Result<SessionState> {
        self.console.show("You make the first move!")?;

        let options = self.dice_options(None);
        let bound = self.dice.len() as u32;
        let user = match self.ask("Choose your dice:", &options, bound, |_| Ok(()))? {
            Answer::Value(v) => v as usize,
            Answer::Exit => return Ok(state.finish()),
        };
        state.set_user_die(user);

        // Uniform over the dice the user left
        let pick = self.entropy.below(bound - 1) as usize;
        let computer = if pick >= user { pick + 1 } else { pick };
        state.set_computer_die(computer);

        self.console
            .show(&format!("You choose the [{}] dice.", self.dice[user]))?;
        self.console
            .show(&format!("I choose the [{}] dice.", self.dice[computer]))?;

        Ok(state.goto(Phase::RoundInProgress))
    }

    fn computer_picks_first(&mut self, mut state: SessionState) -> Result<SessionState> {
        let bound = self.dice.len() as u32;
        let computer = match state.computer_die() {
            Some(index) => {
                self.check_die(index, "computer")?;
                index
            }
            None => {
                let index = self.entropy.below(bound) as usize;
                state.set_computer_die(index);
                index
            }
        };

        self.console.show(&format!(
            "I make the first move and choose the [{}] dice.",
            self.dice[computer]
        ))?;

        let options = self.dice_options(Some(computer));
        let taken = computer as u32;
        let user = match self.ask(
            "Choose your dice (cannot select my dice):",
            &options,
            bound,
            |v| {
                if v == taken {
                    Err(GameError::invalid(
                        "You cannot select my dice. Please choose again.",
                    ))
                } else {
                    Ok(())
                }
            },
        )? {
            Answer::Value(v) => v as usize,
            Answer::Exit => return Ok(state.finish()),
        };
        state.set_user_die(user);

        self.console
            .show(&format!("You choose the [{}] dice.", self.dice[user]))?;

        Ok(state.goto(Phase::RoundInProgress))
    }

    fn play_round(&mut self, mut state: SessionState) -> Result<SessionState> {
        let (user_die, computer_die) = match (state.user_die(), state.computer_die()) {
            (Some(user), Some(computer)) => (user, computer),
            _ => {
                return Err(GameError::Protocol(
                    "round started before both dice were chosen".to_string(),
                ))
            }
        };
        self.check_die(user_die, "user")?;
        self.check_die(computer_die, "computer")?;
        if user_die == computer_die {
            return Err(GameError::Protocol(format!(
                "both sides hold dice #{}",
                user_die
            )));
        }

        match self.resolve_round(user_die, computer_die) {
            Ok(Some(report)) => {
                info!(
                    user_roll = report.user_roll,
                    computer_roll = report.computer_roll,
                    result = %report.result,
                    "Round resolved"
                );
                state.record_round(report);
                Ok(state.goto(Phase::RoundResolved))
            }
            Ok(None) => Ok(state.finish()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                error!(error = %e, "Round abandoned");
                self.console.show(&format!("Error in game round: {}", e))?;
                state.record_abandoned();
                Ok(state.goto(Phase::RoundResolved))
            }
        }
    }

    /// Both rolls and the comparison. `None` when the user exits.
    fn resolve_round(&mut self, user_die: usize, computer_die: usize) -> Result<Option<RoundReport>> {
        self.console.show("It's time for your roll.")?;
        let user_roll = match self.user_roll(user_die)? {
            Some(roll) => roll,
            None => return Ok(None),
        };

        self.console.show("It's time for my roll.")?;
        let computer_roll = self.computer_roll(computer_die)?;

        self.console.show(&format!(
            "Your roll result is {} with the [{}] dice.",
            user_roll, self.dice[user_die]
        ))?;
        self.console.show(&format!(
            "My roll result is {} with the [{}] dice.",
            computer_roll, self.dice[computer_die]
        ))?;

        let result = RoundResult::judge(user_roll, computer_roll);
        self.console.show(&match result {
            RoundResult::UserWins => format!("You win ({} > {})!", user_roll, computer_roll),
            RoundResult::ComputerWins => format!("I win ({} > {})!", computer_roll, user_roll),
            RoundResult::Tie => format!("It's a tie ({} = {})!", user_roll, computer_roll),
        })?;

        Ok(Some(RoundReport {
            user_die,
            computer_die,
            user_roll,
            computer_roll,
            result,
        }))
    }

    fn user_roll(&mut self, die: usize) -> Result<Option<u32>> {
        let range = self.face_count;
        let mut exchange = FairExchange::begin(range, self.mac.as_ref(), &mut self.entropy)?;
        self.console.show(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            exchange.digest()
        ))?;

        let options = numeric_options(range);
        let title = format!("Add your number modulo {}:", range);
        let value = match self.ask(&title, &options, range, |_| Ok(()))? {
            Answer::Value(v) => v,
            Answer::Exit => return Ok(None),
        };

        exchange.supply_counterpart_value(value)?;
        let reveal = exchange.reveal()?;
        self.settle(die, &reveal).map(Some)
    }

    fn computer_roll(&mut self, die: usize) -> Result<u32> {
        let range = self.face_count;
        let mut exchange = FairExchange::begin(range, self.mac.as_ref(), &mut self.entropy)?;
        self.console.show(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            exchange.digest()
        ))?;

        let counterpart = self.entropy.below(range);
        self.console
            .show(&format!("My counterpart number is {}.", counterpart))?;

        exchange.supply_counterpart_value(counterpart)?;
        let reveal = exchange.reveal()?;
        self.settle(die, &reveal)
    }

    /// Verify a revealed exchange, announce it, and read the rolled face
    fn settle(&mut self, die: usize, reveal: &Reveal) -> Result<u32> {
        reveal.verify(self.mac.as_ref())?;

        self.console.show(&format!(
            "My number is {} (KEY={}).",
            reveal.secret(),
            reveal.key().to_hex()
        ))?;
        self.console.show(&format!(
            "The fair number generation result is {} + {} = {} (mod {}).",
            reveal.secret(),
            reveal.counterpart(),
            reveal.result(),
            reveal.range()
        ))?;

        self.dice[die].face(reveal.result() as usize)
    }

    fn ask_play_again(&mut self, state: SessionState) -> Result<SessionState> {
        let answer = self.console.prompt(PLAY_AGAIN_PROMPT)?;
        let again = answer
            .map(|a| {
                let a = a.trim();
                a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
            })
            .unwrap_or(false);

        Ok(if again {
            state.goto(Phase::ContinueSession)
        } else {
            state.finish()
        })
    }

    /// Present a menu and block until the answer is a valid selection or exit.
    ///
    /// Help requests and rejected input loop back to the same menu.
    fn ask<F>(&mut self, title: &str, options: &[(u32, String)], bound: u32, accept: F) -> Result<Answer>
    where
        F: Fn(u32) -> Result<()>,
    {
        loop {
            self.console.show(title)?;
            for (value, label) in options {
                self.console.show(&format!("{} - {}", value, label))?;
            }
            self.console.show("X - exit")?;
            self.console.show("? - help")?;

            let line = match self.console.prompt(SELECTION_PROMPT)? {
                Some(line) => line,
                None => return Ok(Answer::Exit),
            };

            let outcome = parse_choice(&line, bound).and_then(|choice| match choice {
                Choice::Select(v) => accept(v).map(|_| Choice::Select(v)),
                other => Ok(other),
            });

            match outcome {
                Ok(Choice::Select(v)) => return Ok(Answer::Value(v)),
                Ok(Choice::Exit) => return Ok(Answer::Exit),
                Ok(Choice::Help) => self.show_help()?,
                Err(e) if e.is_recoverable() => {
                    warn!(input = %line, error = %e, "Rejected input");
                    self.console.show(&e.to_string())?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn show_help(&mut self) -> Result<()> {
        let matrix = win_probabilities(&self.dice)?;
        let table = self.renderer.render(&self.dice, &matrix);
        for line in table.lines() {
            self.console.show(line)?;
        }
        Ok(())
    }

    fn check_die(&self, index: usize, owner: &str) -> Result<()> {
        if index < self.dice.len() {
            Ok(())
        } else {
            Err(GameError::Protocol(format!(
                "{} holds dice #{} but only {} dice are in play",
                owner,
                index,
                self.dice.len()
            )))
        }
    }

    fn dice_options(&self, exclude: Option<usize>) -> Vec<(u32, String)> {
        self.dice
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != exclude)
            .map(|(i, die)| (i as u32, format!("[{}]", die)))
            .collect()
    }
}

fn numeric_options(range: u32) -> Vec<(u32, String)> {
    (0..range).map(|v| (v, v.to_string())).collect()
}
