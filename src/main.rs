// SPDX-License-Identifier: MIT
//
// ticklist — pick lines from a checklist file and save the ones you tick.
//
// This is the binary that wires the two crates together:
//
//   ticklist-term → raw mode, key decoding, ANSI sequences
//   ticklist-core → checklist, placeholders, output, session loop
//
// Flow:
//
//   args → Config → Checklist::load → Session::run → "Saved in …" / "Exiting …"
//
// Every error ends up here and is printed as `ticklist: <error>` on stderr
// with exit status 1. Quitting without saving is not an error.

mod logging;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use ticklist_core::checklist::Checklist;
use ticklist_core::config::{self, Config, LineStyle};
use ticklist_core::render;
use ticklist_core::session::{Outcome, Session};
use ticklist_core::Error;
use ticklist_term::terminal::{self, StdinMode};

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "ticklist",
    version,
    about = "Tick items from a checklist file and save the selection"
)]
struct Cli {
    /// Checklist file, one item per line
    #[arg(short, long, value_name = "PATH", default_value = config::DEFAULT_INPUT)]
    input: PathBuf,

    /// File the selected lines are written to
    #[arg(short, long, value_name = "PATH", default_value = config::DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Fill a {placeholder} without prompting (repeatable)
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = config::parse_assignment)]
    set: Vec<(String, String)>,

    /// Prefix each written line with "- "
    #[arg(long)]
    bullet: bool,

    /// Write debug logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            source: self.input,
            output: self.output,
            known: self.set.into_iter().collect(),
            style: if self.bullet {
                LineStyle::Bullet
            } else {
                LineStyle::Plain
            },
        }
    }
}

// ─── Entry ──────────────────────────────────────────────────────────────────

fn run(config: Config) -> Result<Outcome, Error> {
    let checklist = Checklist::load(&config.source)?;
    let width = terminal::get_size().map(|size| usize::from(size.cols));

    if !terminal::is_tty() {
        tracing::warn!("stdin is not a terminal");
    }

    let mut session = Session::new(checklist, config, StdinMode::new(), io::stdin(), io::stdout())
        .with_width(width);
    session.run()
}

fn report(outcome: &Outcome, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        Outcome::Saved { path, lines } => {
            tracing::info!(path = %path.display(), lines, "selection saved");
            render::notice(out, &format!("Saved in \"{}\"", path.display()))
        }
        Outcome::Quit => render::notice(out, "Exiting without saving"),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(e) = logging::init(path) {
            eprintln!("ticklist: log file {}: {e}", path.display());
            process::exit(1);
        }
    }

    let outcome = run(cli.into_config()).unwrap_or_else(|e| {
        eprintln!("ticklist: {e}");
        process::exit(1);
    });

    // stdout may already be gone; the file was written either way.
    let _ = report(&outcome, &mut io::stdout());
}

// ─── Tests ──────────────────────────────────────────────────────────────────
