use clap::{ArgGroup, Args, Parser, Subcommand};
use log::LevelFilter;
use pixcrypt::cli::{decrypt_image, encrypt_image, show_info, show_plan, CryptOptions};
use pixcrypt::pipeline::{load_pipeline, parse_pipeline_ops};
use pixcrypt::{Pipeline, Result};
use std::path::PathBuf;
use std::process::ExitCode;

/// Version info from build.rs
const VERSION: &str = env!("PIXCRYPT_VERSION");
const PROFILE: &str = env!("PIXCRYPT_PROFILE");
const GIT_HASH: &str = env!("PIXCRYPT_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} ({})", PROFILE, VERSION, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "pixcrypt")]
#[command(about = "Reversible pixel transform pipelines for image obfuscation", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Log each pipeline step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a pipeline to an image
    #[command(alias = "e")]
    Encrypt {
        /// Input image
        input: PathBuf,

        /// Output image (use a lossless format such as PNG)
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Undo a pipeline previously applied with encrypt
    #[command(alias = "d")]
    Decrypt {
        /// Encrypted image
        input: PathBuf,

        /// Output image
        output: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show the forward and inverse steps of a pipeline
    Plan {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Show information about an image file
    #[command(alias = "i")]
    Info {
        /// Image file to inspect
        file: PathBuf,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").args(["pipeline", "op"])))]
struct PipelineArgs {
    /// JSON pipeline description file
    #[arg(long)]
    pipeline: Option<PathBuf>,

    /// Operation in short form, repeatable (e.g. --op swap --op xor:42)
    #[arg(long = "op")]
    op: Vec<String>,
}

impl PipelineArgs {
    /// Resolve to a pipeline; falls back to the built-in one.
    fn resolve(&self) -> Result<Pipeline> {
        if let Some(path) = &self.pipeline {
            load_pipeline(path)
        } else if !self.op.is_empty() {
            parse_pipeline_ops(&self.op)
        } else {
            Ok(Pipeline::default_obfuscation())
        }
    }
}

fn init_logger(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Encrypt { input, output, pipeline } => {
            let options = CryptOptions {
                pipeline: pipeline.resolve()?,
            };
            let shape = encrypt_image(&input, &output, &options)?;
            println!("Encrypted {} image to {}", shape, output.display());
            println!("Pipeline fingerprint: {}", options.pipeline.fingerprint()?);
        }

        Commands::Decrypt { input, output, pipeline } => {
            let options = CryptOptions {
                pipeline: pipeline.resolve()?,
            };
            let shape = decrypt_image(&input, &output, &options)?;
            println!("Decrypted {} image to {}", shape, output.display());
        }

        Commands::Plan { pipeline } => {
            print!("{}", show_plan(&pipeline.resolve()?)?);
        }

        Commands::Info { file } => {
            print!("{}", show_info(&file)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("pixcrypt {}", get_version());
        return ExitCode::SUCCESS;
    }

    init_logger(cli.verbose);

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if let Err(e) = Cli::command().print_help() {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
