//! Dice Game CLI
//!
//! Play non-transitive dice against the computer with provably fair rolls,
//! print the win-probability table, or check a revealed commitment.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use dice_game_core::{
    verify, win_probabilities, DiceParser, GameEngine, GameError, MacDigest, ProbabilityRenderer,
    SecretKey, StdConsole, SystemEntropy, TableRenderer,
};
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(?cli, "Parsed arguments");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<GameError>() {
                Some(GameError::InputValidation(_)) => {
                    eprintln!("Input Error:\n{:#}", e);
                }
                Some(GameError::TrustViolation { .. }) => {
                    error!(error = %e, "Session terminated");
                    eprintln!("Commitment verification failed, the session was terminated:\n{:#}", e);
                }
                _ => eprintln!("Unexpected error occurred: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let parser = DiceParser::new(cli.faces)?;

    match cli.command {
        Command::Play { dice } => {
            let dice = parser.parse(&dice)?;
            let mut engine = GameEngine::new(
                dice,
                cli.mac.algorithm(),
                SystemEntropy::os(),
                StdConsole::new(),
            )?;
            engine.run().context("game session failed")?;
        }
        Command::Odds { dice, json } => {
            let dice = parser.parse(&dice)?;
            let matrix = win_probabilities(&dice)?;
            if json {
                let out = serde_json::to_string_pretty(&serde_json::json!({
                    "dice": dice,
                    "win_probabilities": matrix.rows().collect::<Vec<_>>(),
                }))
                .context("failed to encode probabilities")?;
                println!("{}", out);
            } else {
                println!("{}", TableRenderer::default().render(&dice, &matrix));
            }
        }
        Command::Verify {
            digest,
            key,
            secret,
        } => {
            let digest = MacDigest::from_hex(&digest)?;
            let key = SecretKey::from_hex(&key)?;
            let mac = cli.mac.algorithm();
            verify(mac.as_ref(), &digest, &key, secret)?;
            println!("OK: {} of {} under the given key matches {}", mac.name(), secret, digest);
        }
    }

    Ok(())
}
