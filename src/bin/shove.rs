use std::process;

use clap::Parser;
use shove::common::config::{Config, config_file};
use shove::common::log;
use shove::mover::{Actual, Mover, Outcome, SpaceIndex};
use shove::sys::accessibility;
use tracing::{error, warn};

const PRECONDITIONS: &str = "\
Requires Mission Control keyboard shortcuts for every target space:
  System Settings > Keyboard > Keyboard Shortcuts > Mission Control,
  enable \"Switch to Desktop N\" and bind it to Cmd+Shift+Ctrl+Opt+N.
Accessibility permission must be granted to the process running shove.
The move is a synthesized drag: do not touch the mouse while it runs.";

#[derive(Parser)]
#[command(name = "shove")]
#[command(about = "Move the frontmost window to another Mission Control space")]
#[command(after_help = PRECONDITIONS)]
struct Cli {
    /// Target space number.
    #[arg(value_parser = clap::value_parser!(u8).range(1..=9))]
    space: u8,

    /// Resolve the window and drag plan, print them, and post nothing.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    // clap exits 2 on bad usage by default; every failure here is exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };
    log::init_logging();

    let config = if config_file().exists() {
        match Config::read(&config_file()) {
            Ok(config) => config,
            Err(err) => {
                error!("could not read {}: {err:#}", config_file().display());
                process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    for issue in config.validate() {
        warn!("config: {issue}");
    }

    let target = match SpaceIndex::new(cli.space) {
        Ok(target) => target,
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    };

    let system = Actual;
    let mover = Mover::new(&system, &system, &system, &system, &config);

    if cli.dry_run {
        match mover.prepare() {
            Ok(prep) => {
                println!(
                    "would drag {} ({:?} chrome) from ({}, {}) to space {target}",
                    prep.window.owner_name, prep.chrome, prep.plan.anchor.x, prep.plan.anchor.y
                );
                return;
            }
            Err(err) => {
                error!("{err}");
                process::exit(1);
            }
        }
    }

    if !accessibility::is_trusted() {
        accessibility::prompt_for_permission();
        eprintln!(
            "shove does not have accessibility permission. Enable it in System Settings > \
             Privacy & Security > Accessibility, then run it again."
        );
        process::exit(1);
    }

    match mover.move_to_space(target) {
        Ok(Outcome::AlreadyThere) => println!("already on space {target}; nothing to do"),
        Ok(Outcome::Moved { owner }) => println!("moved {owner} to space {target}"),
        Err(err) => {
            error!("{err}");
            process::exit(1);
        }
    }
}
