//! The command line interface for the program.
use crate::input::load_model;
use crate::log;
use crate::output::metadata::write_metadata;
use crate::output::{
    create_output_directory, get_output_dir, write_capacities, write_debug_info, write_dispatch,
    write_summary,
};
use crate::settings::Settings;
use crate::solver::{SolveOptions, get_backend, solve};
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the program.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the run command
#[derive(Args, Default)]
pub struct RunOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Maximum time allowed for the solve in seconds
    #[arg(long, value_name = "SECS")]
    pub time_limit: Option<f64>,
    /// Don't write hourly dispatch to file
    #[arg(long)]
    pub no_dispatch: bool,
    /// Whether to write additional information to output files
    #[arg(long)]
    pub debug_model: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build and solve a model.
    Run {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other run options
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model without solving it.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Run { model_dir, opts } => handle_run_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the program
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ wss --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // No command given, so just print the help text
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Handle the `run` command.
pub fn handle_run_command(
    model_path: &Path,
    opts: &RunOpts,
    settings: Option<Settings>,
) -> Result<()> {
    // Load program settings, if not provided
    let mut settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // These settings can be overridden by command-line arguments
    if opts.debug_model {
        settings.debug_model = true;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }
    if opts.no_dispatch {
        settings.write_dispatch = false;
    }
    if opts.time_limit.is_some() {
        settings.time_limit = opts.time_limit;
    }
    if let Some(time_limit) = settings.time_limit {
        ensure!(
            time_limit.is_finite() && time_limit >= 0.0,
            "Time limit must be a non-negative number of seconds, got {time_limit}"
        );
    }

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(model_path)?;
        &pathbuf
    };

    let overwrite =
        create_output_directory(output_path, settings.overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the model to run
    let model = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    let backend = get_backend(&settings.solver)?;
    let spec = model.build().context("Failed to build model.")?;
    let options = SolveOptions {
        time_limit: settings.time_limit,
        verbose: settings.debug_model,
    };
    let solution = solve(&spec, backend.as_ref(), &options).context("Failed to solve model.")?;

    // Write results to disk
    write_metadata(
        output_path,
        model_path,
        backend.name(),
        settings.time_limit,
    )
    .context("Failed to save metadata.")?;
    write_capacities(output_path, &solution, spec.costs())?;
    if settings.write_dispatch {
        write_dispatch(output_path, &solution)?;
    }
    write_summary(output_path, &solution.summarise(&model.time_series))?;
    if settings.debug_model {
        write_debug_info(output_path, &solution)?;
    }

    for (technology, capacity) in &solution.capacities {
        info!("Optimal {technology}: {capacity:.4}");
    }
    info!("Model run complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    // Load program settings, if not provided
    let settings = if let Some(settings) = settings {
        settings
    } else {
        Settings::load().context("Failed to load settings.")?
    };

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    // Load the model and check that the optimisation problem can be built
    let model = load_model(model_path).context("Failed to validate model.")?;
    model.build().context("Failed to validate model.")?;
    get_backend(&settings.solver)?;
    info!("Model validation successful!");

    Ok(())
}
