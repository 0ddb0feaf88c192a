//! The engine drives a [`GameSession`] from a line-based text protocol (see
//! [`protocol`]) so that a frontend (GUI, tournament runner, terminal) can
//! play against the automated player.
//!
//! [`Engine::protocol_loop`] is the "main loop" of the engine which reads
//! commands from the input stream and writes responses to the output stream.
//! Diagnostics are reported as `info string` lines, the same way UCI engines
//! do it.

use std::io::{BufRead, Write};

use itertools::Itertools;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::protocol::{Command, EngineOption, OptionValue};
use crate::evaluation::material::material_balance;
use crate::rules::core::Move;
use crate::session::GameSession;

mod protocol;

/// The Engine connects everything together: it owns the game, the random
/// source of the automated player and the I/O.
pub struct Engine<'a, R: BufRead, W: Write> {
    session: GameSession,
    rng: ChaCha8Rng,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new instance of the engine with starting position and provided
    /// I/O. The automated player is seeded from OS entropy.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self::with_rng(input, output, ChaCha8Rng::from_entropy())
    }

    /// Creates an engine whose automated player is reproducible.
    #[must_use]
    pub fn with_seed(input: &'a mut R, output: &'a mut W, seed: u64) -> Self {
        Self::with_rng(input, output, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(input: &'a mut R, output: &'a mut W, rng: ChaCha8Rng) -> Self {
        Self {
            session: GameSession::new(),
            rng,
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes commands until `quit`
    /// is sent or the input is closed.
    ///
    /// Malformed commands, positions and moves never stop the loop: they are
    /// reported as `info string` and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails.
    pub fn protocol_loop(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Command::Ucci => self.handle_ucci()?,
                Command::IsReady => writeln!(self.output, "readyok")?,
                Command::SetOption {
                    option: EngineOption::Seed,
                    value: OptionValue::Integer(seed),
                } => self.rng = ChaCha8Rng::seed_from_u64(seed),
                Command::NewGame => self.session = GameSession::new(),
                Command::SetPosition { fen, moves } => self.handle_position(fen.as_deref(), &moves)?,
                Command::Move(mv) => self.handle_move(&mv)?,
                Command::Go => self.handle_go()?,
                Command::Play => self.handle_play()?,
                Command::Display => write!(self.output, "{}", self.session)?,
                Command::Moves => writeln!(self.output, "{}", self.session.legal_moves().iter().join(" "))?,
                Command::Eval => writeln!(
                    self.output,
                    "info string material {}",
                    material_balance(self.session.board(), self.session.side_to_move())
                )?,
                Command::Quit => break,
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Responds to the `ucci` handshake command by identifying the engine.
    fn handle_ucci(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        writeln!(self.output, "option name Seed type spin")?;
        writeln!(self.output, "ucciok")?;
        Ok(())
    }

    /// Replaces the game with the given position (the starting one if `fen`
    /// is `None`) and plays `moves` on top of it, stopping at the first
    /// rejected move.
    fn handle_position(&mut self, fen: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        let session = match fen {
            None => GameSession::new(),
            Some(fen) => match GameSession::from_fen(fen) {
                Ok(session) => session,
                Err(e) => {
                    writeln!(self.output, "info string Invalid position: {e:#}")?;
                    return Ok(());
                },
            },
        };
        self.session = session;
        for next_move in moves {
            if let Err(e) = Move::from_iccs(next_move).and_then(|mv| self.session.play(mv)) {
                writeln!(self.output, "info string Rejected move {next_move}: {e:#}")?;
                break;
            }
        }
        self.report_outcome()
    }

    /// Applies a move sent by the frontend (usually a human player).
    fn handle_move(&mut self, input: &str) -> anyhow::Result<()> {
        match Move::from_iccs(input).and_then(|mv| self.session.play(mv)) {
            Ok(_) => self.report_outcome(),
            Err(e) => {
                writeln!(self.output, "info string Rejected move {input}: {e:#}")?;
                Ok(())
            },
        }
    }

    /// Suggests the automated player's move without applying it.
    fn handle_go(&mut self) -> anyhow::Result<()> {
        match self.session.choose_automated_move(&mut self.rng) {
            Some(mv) => writeln!(self.output, "bestmove {mv}")?,
            None => writeln!(self.output, "nobestmove")?,
        }
        Ok(())
    }

    /// Chooses and applies the automated player's move for the side to move.
    fn handle_play(&mut self) -> anyhow::Result<()> {
        match self.session.choose_automated_move(&mut self.rng) {
            Some(mv) => {
                let _ = self.session.play(mv)?;
                writeln!(self.output, "bestmove {mv}")?;
            },
            None => {
                let _ = self.session.adjudicate();
                writeln!(self.output, "nobestmove")?;
            },
        }
        self.report_outcome()
    }

    fn report_outcome(&mut self) -> anyhow::Result<()> {
        if let Some(outcome) = self.session.outcome() {
            writeln!(self.output, "info string game over: {outcome}")?;
        }
        Ok(())
    }
}
