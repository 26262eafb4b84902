/*!
 * Simlink CLI - Command Line Interface
 */

use anyhow::Context;
use clap::{Parser, Subcommand};
use simlink::{
    config::ClientConfig,
    decode, depth_io, dilate,
    error::{SimError, EXIT_FATAL, EXIT_SUCCESS},
    logging,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "simlink")]
#[command(version, about = "Simulator remote API helper: return codes and depth-map dilation", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a remote return code into its error flags
    Decode {
        /// Raw return code
        #[arg(allow_negative_numbers = true)]
        code: i32,

        /// Print the flags as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Fill holes in a depth map by band-wise dilation
    Dilate {
        /// Grayscale depth image (normalized, 1.0 = far)
        #[arg(short = 'i', long = "input", value_name = "PNG")]
        input: PathBuf,

        /// Output path (16-bit grayscale PNG)
        #[arg(short = 'o', long = "output", value_name = "PNG")]
        output: PathBuf,

        /// Sensor far clipping distance in meters
        #[arg(long)]
        max_depth: Option<f32>,

        /// Radius in pixels of a structure one meter away
        #[arg(long)]
        radius_scale: Option<f32>,

        /// Largest structuring element radius in pixels
        #[arg(long)]
        radius_max: Option<i32>,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<SimError>()
                .map(SimError::exit_code)
                .unwrap_or(EXIT_FATAL)
        }
    };

    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    config.verbose |= cli.verbose;

    logging::init_logging(&config)?;

    match cli.command {
        Commands::Decode { code, json } => {
            let errors = decode(code);
            if json {
                println!("{}", serde_json::to_string(&errors)?);
            } else {
                println!("{}", errors);
            }
        }

        Commands::Dilate {
            input,
            output,
            max_depth,
            radius_scale,
            radius_max,
        } => {
            let mut dilation = config.dilation;
            if let Some(v) = max_depth {
                dilation.max_depth_m = v;
            }
            if let Some(v) = radius_scale {
                dilation.radius_scale_px_m = v;
            }
            if let Some(v) = radius_max {
                dilation.radius_max_px = v;
            }
            if !(dilation.max_depth_m.is_finite() && dilation.max_depth_m > 0.0) {
                return Err(SimError::InvalidArgument(format!(
                    "max depth must be positive, got {}",
                    dilation.max_depth_m
                ))
                .into());
            }

            let image = depth_io::load_depth(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let model = dilation.radius_model();
            let filled = dilate(&image, dilation.max_depth_m, |d| model.radius(d));
            depth_io::save_depth(&filled, &output)
                .with_context(|| format!("writing {}", output.display()))?;

            info!(
                input = %input.display(),
                output = %output.display(),
                width = filled.width(),
                height = filled.height(),
                "dilated depth map"
            );
        }

        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(SimError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ))
                .into());
            }
            ClientConfig::default().to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
