use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use watermark_blend::{run_interactive, ConfigInput, LineInput};

#[derive(Parser)]
#[command(
    name = "watermark-blend",
    about = "Blend a watermark image onto a base image",
    version,
    after_help = "All blending parameters are asked interactively, one per line:\n\
                  base image, watermark image, alpha/transparency color, weight (0-100),\n\
                  position method (single, grid), position, output file."
)]
struct Cli {
    /// Read the answers from this file instead of standard input
    #[arg(short, long, value_name = "FILE")]
    answers: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not print the prompts
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &cli.answers {
        Some(path) => {
            let file = match File::open(path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Error: Cannot open answers file {}: {e}", path.display());
                    process::exit(1);
                }
            };
            run(LineInput::new(BufReader::new(file), io::stdout()).quiet(cli.quiet));
        }
        None => run(LineInput::stdio().quiet(cli.quiet)),
    }
}

fn run<I: ConfigInput>(input: I) {
    if let Err(e) = run_interactive(input) {
        log::debug!("run aborted: {e:?}");
        println!("{e}");
        process::exit(1);
    }
}
