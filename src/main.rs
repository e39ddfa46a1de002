use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fieldmap::{AppError, RowEdit, SessionOptions, UpdateMode, parse_assignment};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldmap")]
#[command(version)]
#[command(about = "Map dynamic fields onto Salesforce fields and manage the installation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// Manifest JSON with read objects and field metadata
    #[arg(short, long)]
    manifest: PathBuf,
    /// Provider object to map (defaults to the first read object)
    #[arg(short, long)]
    object: Option<String>,
    /// Settings file with an [amp] table; AMP_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Use an offline installation client
    #[arg(long)]
    mock: bool,
}

impl SessionArgs {
    fn into_options(self) -> SessionOptions {
        SessionOptions {
            manifest: self.manifest,
            object: self.object,
            settings: self.config,
            mock: self.mock,
        }
    }
}

#[derive(Args)]
struct EditArgs {
    /// Bind a provider field: <dynamicField>=<fieldName> (empty field clears)
    #[arg(short, long = "bind", value_name = "KEY=FIELD")]
    bind: Vec<String>,
    /// Default value for a row: <dynamicField>=<value>
    #[arg(short, long = "default", value_name = "KEY=VALUE")]
    default: Vec<String>,
    /// Update mode for a row: <dynamicField>=<Auto-fill|Overwrite|Skip>
    #[arg(short = 'u', long = "mode", value_name = "KEY=MODE")]
    mode: Vec<String>,
}

impl EditArgs {
    fn parse(&self) -> Result<Vec<RowEdit>, AppError> {
        let mut edits = Vec::new();
        for raw in &self.bind {
            let (dynamic_field, field_name) = parse_assignment(raw)?;
            edits.push(RowEdit::Bind { dynamic_field, field_name });
        }
        for raw in &self.default {
            let (dynamic_field, value) = parse_assignment(raw)?;
            edits.push(RowEdit::Default { dynamic_field, value });
        }
        for raw in &self.mode {
            let (dynamic_field, mode) = parse_assignment(raw)?;
            edits.push(RowEdit::Mode { dynamic_field, mode: mode.parse::<UpdateMode>()? });
        }
        Ok(edits)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current field mappings
    #[clap(visible_alias = "s")]
    Show {
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Edit mappings and save the installation
    #[clap(visible_alias = "m")]
    Map {
        #[command(flatten)]
        session: SessionArgs,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Print the configuration a map would submit, without calling the API
    #[clap(visible_alias = "p")]
    Preview {
        /// Manifest JSON with read objects and field metadata
        #[arg(short, long)]
        manifest: PathBuf,
        /// Provider object to map
        #[arg(short, long)]
        object: Option<String>,
        /// Build only the read section from the manifest
        #[arg(long)]
        read_only: bool,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Delete the installation
    Uninstall {
        #[command(flatten)]
        session: SessionArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Show { session } => fieldmap::show(&session.into_options()).map(|_| ()),
        Commands::Map { session, edits } => edits
            .parse()
            .and_then(|edits| fieldmap::map(&session.into_options(), &edits))
            .map(|_| ()),
        Commands::Preview { manifest, object, read_only, edits } => edits
            .parse()
            .and_then(|edits| fieldmap::preview(manifest, object, &edits, read_only))
            .and_then(|content| Ok(serde_json::to_string_pretty(&content)?))
            .map(|json| println!("{}", json)),
        Commands::Uninstall { session } => fieldmap::uninstall(&session.into_options()).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
