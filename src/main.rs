use clap::{Parser, Subcommand};
use simple_filters::{config, imaging, output, pipeline};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "simple-filters")]
#[command(about = "Apply a sequence of image filters and write every intermediate result")]
#[command(long_about = "\
Apply a sequence of image filters and write every intermediate result

For each configured stage, three files land in the output directory:

  _<name>p1.jpg            the stage applied to the original image
  _<name>p2.jpg            the stage applied into a pre-allocated buffer,
                           then geometric-blended with the original
  _<i>_-<a>-<b>...jpg      the cumulative result of stages 0..=i

The stock stages are: smoothing, distortion (shear 2,2), reflection_v,
reflection_h, scale (0.5). Image format follows the output extension:
png writes PNG, anything else writes JPEG.

Run 'simple-filters gen-config' to generate a documented pipeline.toml.")]
#[command(version)]
struct Cli {
    /// Log debug output from the filters
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every configured stage over an image
    Run {
        /// Image to read (defaults to `input` from the config)
        image: Option<PathBuf>,
        /// Pipeline config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output directory (defaults to `output_dir` from the config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a pipeline config file
    Check {
        #[arg(long, default_value = "pipeline.toml")]
        config: PathBuf,
    },
    /// Print a stock pipeline.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            image,
            config: config_path,
            output,
            json,
        } => {
            let pipeline_config = config::load_or_default(config_path.as_deref())?;
            pipeline_config.validate()?;
            init_thread_pool(&pipeline_config.processing);

            let input = image.unwrap_or_else(|| PathBuf::from(&pipeline_config.input));
            let output_dir = output.unwrap_or_else(|| PathBuf::from(&pipeline_config.output_dir));

            let Some(source) = imaging::load(&input) else {
                eprintln!("Could not load image: {}", input.display());
                std::process::exit(1);
            };

            let report = pipeline::run(&source, &input, &pipeline_config, &output_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::print_run_report(&report);
            }
        }
        Command::Check {
            config: config_path,
        } => {
            println!("==> Checking {}", config_path.display());
            let pipeline_config = config::load_config(&config_path)?;
            output::print_config_summary(&pipeline_config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "simple_filters=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
