use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use energyplan_frames::config::{DEFAULT_INPUT_DIR, Labels};
use energyplan_frames::model::{Granularity, SheetRef};
use energyplan_frames::report::{self, ComparisonRequest};
use energyplan_frames::scenario::{self, ScenarioParams};
use energyplan_frames::{FrameError, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("energyplan_frames=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| FrameError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Normalize(args) => execute_normalize(args),
        Command::Compare(args) => execute_compare(args),
        Command::Costs(args) => execute_costs(args),
        Command::Scenario(args) => execute_scenario(args),
    }
}

fn execute_normalize(args: NormalizeArgs) -> Result<()> {
    let sheet = SheetRef::parse(&args.cases.sheet);
    report::export_cases(
        &args.cases.input_dir,
        &args.cases.files,
        &sheet,
        args.granularity.into(),
        &args.output,
    )
}

fn execute_compare(args: CompareArgs) -> Result<()> {
    let labels = load_labels(args.labels.as_ref())?;
    let request = ComparisonRequest {
        sheet: SheetRef::parse(&args.cases.sheet),
        input_dir: args.cases.input_dir,
        files: args.cases.files,
        granularity: args.granularity.into(),
        columns: args.columns,
        labels,
        min_value: args.min_value,
        include_partial: args.include_partial,
    };

    // Skipped columns were already reported as warnings while planning.
    let plan = report::export_comparison(&request, &args.output)?;
    info!(
        compared = plan.columns.len(),
        skipped = plan.missing.len(),
        output = %args.output.display(),
        "comparison written"
    );
    Ok(())
}

fn execute_costs(args: CostsArgs) -> Result<()> {
    let labels = load_labels(args.labels.as_ref())?;
    let sheet = SheetRef::parse(&args.cases.sheet);
    report::export_costs(
        &args.cases.input_dir,
        &args.cases.files,
        &sheet,
        &labels,
        &args.output,
    )
}

fn execute_scenario(args: ScenarioArgs) -> Result<()> {
    let params = ScenarioParams::load(&args.params)?;
    scenario::write_scenario(&args.template, &params, &args.case, &args.output)?;
    Ok(())
}

fn load_labels(path: Option<&PathBuf>) -> Result<Labels> {
    match path {
        Some(path) => Labels::load(path),
        None => Ok(Labels::default()),
    }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Reshape EnergyPLAN result workbooks into comparable tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize each workbook into one sheet per case.
    Normalize(NormalizeArgs),
    /// Compare selected columns across cases.
    Compare(CompareArgs),
    /// Collect the annual cost lines of each case.
    Costs(CostsArgs),
    /// Write an EnergyPLAN input file with the parameters of one case.
    Scenario(ScenarioArgs),
}

#[derive(clap::Args)]
struct CaseArgs {
    /// Directory the workbooks are resolved against.
    #[arg(long, default_value = DEFAULT_INPUT_DIR)]
    input_dir: PathBuf,

    /// Sheet to read, by position or by name.
    #[arg(long, default_value = "0")]
    sheet: String,

    /// Workbook file names, one per case.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct NormalizeArgs {
    /// Time resolution to extract.
    #[arg(long, value_enum)]
    granularity: GranularityKind,

    /// Output workbook path.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    cases: CaseArgs,
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Time resolution to extract.
    #[arg(long, value_enum)]
    granularity: GranularityKind,

    /// Columns to compare. Defaults to every shared column for yearly runs
    /// and to the storage columns otherwise.
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// JSON file with case and technology display names.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Yearly only: add a composition sheet of columns above this value in
    /// every case.
    #[arg(long)]
    min_value: Option<f64>,

    /// Also compare skipped columns across the cases that have them.
    #[arg(long)]
    include_partial: bool,

    /// Output workbook path.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    cases: CaseArgs,
}

#[derive(clap::Args)]
struct CostsArgs {
    /// JSON file with case display names.
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output workbook path.
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    cases: CaseArgs,
}

#[derive(clap::Args)]
struct ScenarioArgs {
    /// EnergyPLAN input file (UTF-16) used as the template.
    #[arg(long)]
    template: PathBuf,

    /// JSON file with base values and per-case overrides.
    #[arg(long)]
    params: PathBuf,

    /// Case to apply, e.g. `base` or `shock`.
    #[arg(long)]
    case: String,

    /// Path of the input file to write.
    #[arg(long)]
    output: PathBuf,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GranularityKind {
    Hourly,
    Monthly,
    Yearly,
}

impl From<GranularityKind> for Granularity {
    fn from(kind: GranularityKind) -> Self {
        match kind {
            GranularityKind::Hourly => Granularity::Hourly,
            GranularityKind::Monthly => Granularity::Monthly,
            GranularityKind::Yearly => Granularity::Yearly,
        }
    }
}
