use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use concentration_core::{CardPos, MatchController, SelectOutcome, TickOutcome, Timestamp};
use web_time::Instant;

use crate::render;

/// Monotonic time source driving the controller.
pub trait Clock {
    fn now(&self) -> Timestamp;

    /// Blocks until `deadline` has been reached.
    fn wait_until(&mut self, deadline: Timestamp);
}

/// Wall clock measured from the start of the session.
#[derive(Copy, Clone, Debug)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        self.started.elapsed()
    }

    fn wait_until(&mut self, deadline: Timestamp) {
        let remaining = deadline.saturating_sub(self.now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

/// A line of player input and the time it arrived.
pub type Stamped = io::Result<(Timestamp, String)>;

/// Reads `input` on its own thread so every line is stamped when it arrives,
/// not when the session gets around to it.
pub fn read_stamped<R>(input: R, clock: MonotonicClock) -> mpsc::Receiver<Stamped>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in input.lines() {
            let stamped = line.map(|line| (clock.now(), line));
            if tx.send(stamped).is_err() {
                break;
            }
        }
    });
    rx
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Select(CardPos),
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "" => Command::Empty,
        "q" | "quit" | "exit" => Command::Quit,
        _ => line
            .parse()
            .map_or_else(|_| Command::Invalid(line.to_string()), Command::Select),
    }
}

/// Plays until every pair is found, the player quits or input runs out.
///
/// Lines that arrived while a pair was face up are dropped.
pub fn run<I, W, C>(
    controller: &mut MatchController,
    columns: usize,
    input: I,
    out: &mut W,
    clock: &mut C,
) -> Result<()>
where
    I: IntoIterator<Item = Stamped>,
    W: Write,
    C: Clock,
{
    let labels = controller.board().deck().faces().to_vec();
    render::draw(out, &controller.snapshot(), &labels, columns)?;
    if controller.is_finished() {
        render::draw_game_over(out, &controller.snapshot())?;
        return Ok(());
    }
    writeln!(
        out,
        "Pick a card by its number, q to quit. Input typed while a pair is face up is ignored"
    )?;

    let mut accept_from = Timestamp::ZERO;
    for line in input {
        let (at, line) = line.context("Could not read input")?;
        if at < accept_from {
            log::debug!("Dropping {:?} typed at {:?} while a pair was face up", line, at);
            continue;
        }
        let pos = match parse_command(&line) {
            Command::Select(pos) => pos,
            Command::Empty => continue,
            Command::Quit => {
                log::info!("Player quit with score {}", controller.score());
                break;
            }
            Command::Invalid(text) => {
                writeln!(out, "Not a card number: {text}")?;
                continue;
            }
        };

        let outcome = controller.select_at(pos, at);
        if !outcome.has_update() {
            writeln!(out, "Card {pos} cannot be flipped")?;
            continue;
        }
        render::draw(out, &controller.snapshot(), &labels, columns)?;

        if outcome == SelectOutcome::PairPending {
            match resolve_pending(controller, clock) {
                TickOutcome::Matched | TickOutcome::Won => writeln!(out, "It's a pair!")?,
                TickOutcome::Mismatched => writeln!(out, "No match")?,
                TickOutcome::NoChange => {}
            }
            render::draw(out, &controller.snapshot(), &labels, columns)?;
            accept_from = clock.now();
        }

        if controller.is_finished() {
            render::draw_game_over(out, &controller.snapshot())?;
            break;
        }
    }

    Ok(())
}

/// Keeps ticking until the face-up pair is resolved.
fn resolve_pending<C: Clock>(controller: &mut MatchController, clock: &mut C) -> TickOutcome {
    while let Some(deadline) = controller.resolution_deadline() {
        clock.wait_until(deadline);
        let outcome = controller.tick(clock.now());
        if outcome.has_update() {
            return outcome;
        }
    }
    TickOutcome::NoChange
}
