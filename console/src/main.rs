mod peaks;
mod profile;
mod random;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use peaks::PeaksArgs;
use profile::ProfileArgs;
use random::RandomArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Build per-feature profiles from bedGraph tracks.
    Profile {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  ProfileArgs,
    },

    /// Report relative maxima of a track as BED.
    Peaks {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  PeaksArgs,
    },

    /// Tile a genome with random fragments.
    Random {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  RandomArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Profile { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Peaks { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Random { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
