use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::Parser;

use session::{Flow, Session};

mod session;

/// Play a game of mines on the terminal, one command per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let mut session = Session::new(seed);
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", session.render())?;

    for line in io::stdin().lock().lines() {
        match session.execute_line(&line?) {
            Ok(Flow::Continue(output)) => write!(stdout, "{output}")?,
            Ok(Flow::Quit) => break,
            Err(err) => writeln!(stdout, "error: {err}")?,
        }
        stdout.flush()?;
    }

    log::debug!("Session ended");
    Ok(())
}
