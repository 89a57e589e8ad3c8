//! WeRead autoreader - accumulates reading time through signed progress reports.

mod app;
mod sign;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reader_config_and_utils::{init_logging, Config, Paths};

/// WeRead autoreader command-line interface.
#[derive(Parser)]
#[command(name = "weread-autoread")]
#[command(about = "Simulate reading sessions to accumulate WeRead reading time")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Config file. Defaults to ~/.weread/config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base directory for config and logs. Defaults to ~/.weread
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the reading loop until the target count is reached
    Run {
        /// Override the number of confirmed reads
        #[arg(short = 'n', long)]
        read_num: Option<u32>,
    },
    /// Print the canonical string, checksum and signature of a payload file
    Sign {
        /// JSON object with the payload fields
        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    let mut config = Config::load(&paths, cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    match cli.command {
        Some(Commands::Sign { payload }) => {
            let report = sign::sign_file(&payload, &config.signing_salt)?;
            println!("{report}");
        }
        Some(Commands::Run { read_num }) => {
            if let Some(read_num) = read_num {
                config.read_num = read_num;
            }
            init_logging(&config.log_level, paths.log_file())?;
            app::run(config).await?;
        }
        None => {
            init_logging(&config.log_level, paths.log_file())?;
            app::run(config).await?;
        }
    }

    Ok(())
}
