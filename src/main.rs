//! Terminal runner (default binary).
//!
//! Round setup comes from `GRIDFALL_*` environment variables. The loop
//! renders, waits out the rest of the tick on the input queue, then
//! steps the simulation with whatever actions arrived.

use std::time::{Duration, Instant};

use anyhow::Result;
use arrayvec::ArrayVec;

use gridfall::engine::{Round, RoundConfig};
use gridfall::input;
use gridfall::term::{FrameBuffer, GameView, TerminalRenderer};
use gridfall::types::{GameAction, INPUT_BATCH_MAX, TICK_MS};

fn main() -> Result<()> {
    let config = RoundConfig::from_env();
    let mut round = Round::new(&config)?;
    round.register_renderable(Box::new(GameView::new()));

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut round, &mut term);

    // Always try to restore terminal state.
    let _ = term.exit();

    let score = round.world().score;
    println!(
        "final score {} ({} lines, level {})",
        score.score, score.total_lines, score.level
    );
    result
}

fn run(round: &mut Round, term: &mut TerminalRenderer) -> Result<()> {
    let tick_duration = Duration::from_millis(TICK_MS);
    let mut fb = FrameBuffer::new(0, 0);
    let mut pending: ArrayVec<GameAction, INPUT_BATCH_MAX> = ArrayVec::new();
    let mut last_tick = Instant::now();

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        fb.resize(w, h);
        round.render(&mut fb);
        term.draw(&fb)?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        let batch = input::poll_batch(timeout)?;
        if batch.quit {
            return Ok(());
        }
        for action in batch.actions {
            let _ = pending.try_push(action);
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            let now = round.now_ms();
            round.tick(&pending, now);
            pending.clear();
        }
    }
}
