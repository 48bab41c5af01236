use crate::config::{Config, Variant};
use clap::Parser;
use std::path::PathBuf;

mod animation;
mod app;
mod config;
mod events;
mod logging;
mod motion;
mod pointer;
mod render;
mod scroll;
mod sequencer;
mod view;

/// Run a scroll animated portfolio page in your terminal.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path to the configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// The decoration style to use.
    #[arg(long)]
    variant: Option<Variant>,

    /// The number of decorative blocks.
    #[arg(long)]
    blocks: Option<usize>,

    /// Seed block placement and motion, for a reproducible page.
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the scroll trigger markers.
    #[arg(long)]
    markers: bool,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List the FIGlet fonts that can be used and exit.
    #[arg(long)]
    list_fonts: bool,

    /// Print the resulting configuration and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(blocks) = self.blocks {
            config.blocks = Some(blocks);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        config.markers |= self.markers;
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    if cli.list_fonts {
        for font in render::available_fonts() {
            println!("{font}");
        }
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let rng = match config.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    app::run(&config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["folio", "--variant", "blobs", "--seed", "3", "--markers", "--fps", "60"]);
        let mut config = Config { markers: false, ..Default::default() };
        cli.apply(&mut config);
        assert_eq!(config.variant, Variant::Blobs);
        assert_eq!(config.block_count(), 35);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.fps, 60);
        assert!(config.markers);
    }
}
