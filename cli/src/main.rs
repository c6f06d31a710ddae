use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use sweeper_core::{GameConfig, GameSession, MoveOutcome, RandomMineGenerator};

use command::{Command, HELP};
use schedule::TickSchedule;

mod command;
mod render;
mod schedule;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Number of rows, at least 5
    #[arg(long, default_value_t = 20)]
    rows: u32,

    /// Number of columns, at least 5
    #[arg(long, default_value_t = 10)]
    cols: u32,

    /// Percentage of cells holding a mine, 5 to 40
    #[arg(short, long, default_value_t = 15)]
    mine_ratio: u32,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every frame as JSON instead of a text grid
    #[arg(long)]
    json: bool,
}

enum Event {
    Line(String),
    Closed,
}

/// Reads stdin on its own thread so the event loop can wait for input and timer ticks at once.
fn spawn_input_reader() -> Receiver<Event> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = sender.send(Event::Closed);
    });
    receiver
}

struct Frontend<W> {
    session: GameSession,
    json: bool,
    out: W,
}

impl<W: Write> Frontend<W> {
    fn show(&mut self) -> anyhow::Result<()> {
        let view = self.session.snapshot();
        if self.json {
            serde_json::to_writer(&mut self.out, &view)?;
            writeln!(self.out)?;
        } else {
            writeln!(self.out, "{}", render::status_line(&view))?;
            write!(self.out, "{}", render::board(&view))?;
            if let Some(banner) = render::outcome_banner(&view) {
                writeln!(self.out, "{banner}")?;
            }
        }
        Ok(())
    }

    /// Runs one command; returns `false` when the player quits.
    fn apply(&mut self, command: Command) -> anyhow::Result<bool> {
        let redraw = match command {
            Command::Reveal(pos) => self.session.left_click(pos).map(MoveOutcome::has_update),
            Command::Flag(pos) => self.session.right_click(pos).map(MoveOutcome::has_update),
            Command::NewRound => self.session.new_round().map(|()| true),
            Command::Configure(form) => {
                let result = self.session.update_config(&form);
                if result.is_err() {
                    if let Some(preview) = render::settings_preview(&form) {
                        writeln!(self.out, "{preview}")?;
                    }
                }
                result.map(|()| true)
            }
            Command::Show => Ok(true),
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        match redraw {
            Ok(true) => self.show()?,
            Ok(false) => writeln!(self.out, "Nothing happened")?,
            Err(err) => writeln!(self.out, "error: {err}")?,
        }
        self.out.flush()?;
        Ok(true)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(io::stderr)
        .init();

    let config =
        GameConfig::new(args.rows, args.cols, args.mine_ratio).context("Invalid board settings")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let session = GameSession::new(config, RandomMineGenerator::new(seed))?;
    let mut frontend = Frontend {
        session,
        json: args.json,
        out: io::stdout().lock(),
    };
    frontend.show()?;

    let events = spawn_input_reader();
    let mut schedule = TickSchedule::default();

    loop {
        schedule.sync(frontend.session.next_tick(), Instant::now());

        let event = match schedule.deadline() {
            Some(deadline) => {
                events.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => events.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match event {
            Ok(Event::Line(line)) => match Command::parse(&line) {
                Ok(command) => {
                    if !frontend.apply(command)? {
                        break;
                    }
                }
                Err(command::CommandError::Empty) => {}
                Err(err) => writeln!(frontend.out, "error: {err}")?,
            },
            Ok(Event::Closed) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                if let Some(handle) = schedule.fire(Instant::now()) {
                    frontend.session.tick(handle);
                }
            }
        }
    }

    log::debug!("Exiting after {} rounds", frontend.session.round());
    Ok(())
}
