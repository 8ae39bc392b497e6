use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unirank::cli;
use unirank::types::UserId;

#[derive(Parser)]
#[command(name = "unirank")]
#[command(about = "University ranking data entry: indicator calculators and Excel interchange")]
#[command(long_about = "UniRank - university ranking data entry toolkit

Calculates the ratio indicators (FSR, IFR, ISR) and moves ranking rows
between Excel workbooks and a local record store.

COMMANDS:
  fsr      - Faculty/Student ratio score
  ifr      - International Faculty ratio score
  isr      - International Student ratio score
  import   - Excel workbook to record store
  sample   - Write the demonstration workbook
  load     - Show the latest stored record for a university
  export   - Stored record to Excel (.xlsx)
  csv      - Stored record to a flat field,value CSV
  save     - Validate a YAML record and store it

EXAMPLES:
  unirank fsr --staff 100 --students 2000
  unirank import rankings.xlsx --user admin
  unirank export \"Stanford University\" stanford.xlsx

The interchange layout: sheet 'University Rankings', rows 1-3 blank,
headers on row 4, data from row 5.")]
#[command(version)]
struct Cli {
    /// Record store file
    #[arg(long, global = true, env = "UNIRANK_STORE", default_value = "unirank-store.json")]
    store: PathBuf,

    /// User the records are stored under
    #[arg(long, global = true, env = "UNIRANK_USER", default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Faculty/Student ratio.

  ratio      = students / staff            (2 decimals)
  percentage = staff / students * 100      (2 decimals)
  score      = min(100, 20 / ratio * 100)  (2 decimals)

Both counts must be at least 1.")]
    /// Faculty/Student ratio score
    Fsr {
        /// Total academic staff
        #[arg(long)]
        staff: Option<f64>,

        /// Total students
        #[arg(long)]
        students: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "International Faculty ratio.

  ratio      = international / total       (3 decimals)
  percentage = ratio * 100                 (2 decimals)
  score      = min(100, ratio * 100 * 2)   (2 decimals)

International staff cannot exceed total academic staff.")]
    /// International Faculty ratio score
    Ifr {
        /// International academic staff
        #[arg(long)]
        international: Option<f64>,

        /// Total academic staff
        #[arg(long)]
        staff: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "International Student ratio.

  ratio      = international / total       (3 decimals)
  percentage = ratio * 100                 (2 decimals)
  score      = min(100, ratio * 100 * 3)   (2 decimals)

International students cannot exceed total students.")]
    /// International Student ratio score
    Isr {
        /// International students
        #[arg(long)]
        international: Option<f64>,

        /// Total students
        #[arg(long)]
        students: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import an Excel workbook into the record store
    Import {
        /// Workbook to read (.xlsx, .xls, .xlsb, .ods)
        input: PathBuf,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write the ten-university demonstration workbook
    Sample {
        /// Output Excel file
        #[arg(default_value = "university_rankings_sample.xlsx")]
        output: PathBuf,
    },

    /// Show the latest stored record for a university
    Load {
        /// University name (exact match)
        name: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a stored record to Excel
    Export {
        /// University name (exact match)
        name: String,

        /// Output Excel file
        output: PathBuf,
    },

    /// Export a stored record as field,value CSV
    Csv {
        /// University name (exact match)
        name: String,

        /// Output CSV file
        output: PathBuf,
    },

    #[command(long_about = "Validate a university record written in YAML and store it.

Scores must be within 0-100, the ranking at least 1, and size, focus,
research and status must all be set. Invalid fields are listed and
nothing is stored.")]
    /// Validate a YAML record and store it
    Save {
        /// YAML record file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unirank=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let user = UserId::new(cli.user);
    let store = cli.store;

    match cli.command {
        Commands::Fsr {
            staff,
            students,
            json,
        } => cli::fsr(staff, students, json)?,

        Commands::Ifr {
            international,
            staff,
            json,
        } => cli::ifr(international, staff, json)?,

        Commands::Isr {
            international,
            students,
            json,
        } => cli::isr(international, students, json)?,

        Commands::Import { input, verbose } => cli::import(input, user, store, verbose).await?,

        Commands::Sample { output } => cli::sample(output)?,

        Commands::Load { name, json } => cli::load(name, user, store, json).await?,

        Commands::Export { name, output } => cli::export(name, output, user, store).await?,

        Commands::Csv { name, output } => cli::csv(name, output, user, store).await?,

        Commands::Save { file } => cli::save(file, user, store).await?,
    }

    Ok(())
}
