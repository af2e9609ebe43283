// Freightbook CLI - headless ledger and reporting operations

mod admin;
mod exit_codes;
mod import;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_ERROR, EXIT_STORE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "fbk")]
#[command(about = "Freight ledger, reconciliation and reporting (headless)")]
#[command(version)]
struct Cli {
    /// Ledger database file
    #[arg(long, global = true, env = "FBK_DB", default_value = "freightbook.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger database and schema
    Init,

    /// Import CSV data into the ledger
    #[command(subcommand)]
    Import(ImportCommands),

    /// Run the reconciliation reports for a period
    #[command(after_help = "\
The period defaults to the first of the current month through today.

Examples:
  fbk report --start 2026-01-01 --end 2026-01-31
  fbk report --json | jq '.branch_summary'
  fbk report --output monthly.xlsx
  fbk report --config company.toml --output monthly.xlsx")]
    Report {
        /// Period start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Period end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Company config file (TOML); built-in defaults if omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the full report set as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write an Excel workbook to this path
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Record a reconciliation figure against one CN
    #[command(after_help = "\
Examples:
  fbk recon CN1042 --received 950
  fbk recon CN1042 --received 950 --sales 1000 --remarks 'partial payment'")]
    Recon {
        /// CN number
        cn_no: String,

        /// Amount actually received, in rupees
        #[arg(long)]
        received: String,

        /// Corrected billed amount, in rupees
        #[arg(long)]
        sales: Option<String>,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// Search the ledger by CN, manifest, or party name
    Search {
        needle: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record and list head-office expenses
    #[command(subcommand)]
    Ho(HoCommands),

    /// Manage the branch hierarchy (sub branch -> main hub)
    #[command(subcommand)]
    Mapping(MappingCommands),

    /// Manage expense categories
    #[command(subcommand)]
    Category(CategoryCommands),
}

#[derive(Subcommand)]
enum ImportCommands {
    /// Import a monthly manifest CSV
    #[command(after_help = "\
Rows with a bad CN number, manifest number, manifest date, or sales type
are rejected individually; the rest are written. Exit code 4 signals a
partial import.

Example:
  fbk import shipments january.csv")]
    Shipments { file: PathBuf },

    /// Import a branch expense CSV
    Expenses { file: PathBuf },

    /// Print a blank branch expense CSV template with the registered categories
    Template,
}

#[derive(Subcommand)]
enum HoCommands {
    /// Set one category's amount on a day's register entry
    #[command(after_help = "\
Other categories on the same day are untouched, so figures can be
recorded one bill at a time.

Examples:
  fbk ho set 2026-01-15 rent 40000
  fbk ho set 2026-01-15 electricity 6000 --remarks 'january bill'")]
    Set {
        /// Entry date (YYYY-MM-DD)
        date: String,

        /// Expense category; registered on first use
        category: String,

        /// Amount in rupees
        amount: String,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// List register entries, one line per day
    List {
        /// Period start (YYYY-MM-DD); defaults to the first of the month
        #[arg(long)]
        start: Option<String>,

        /// Period end (YYYY-MM-DD); defaults to today
        #[arg(long)]
        end: Option<String>,
    },
}

#[derive(Subcommand)]
enum MappingCommands {
    /// Point a sub branch at its main hub
    Add { child: String, parent: String },
    /// List all hierarchy edges
    List,
    /// Remove a sub branch's mapping
    Delete { child: String },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Register an expense category (scope: branch or ho)
    Add { scope: String, name: String },
    /// List registered categories for a scope
    List { scope: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let db = cli.db;

    let result = match cli.command {
        Commands::Init => admin::cmd_init(&db),
        Commands::Import(cmd) => match cmd {
            ImportCommands::Shipments { file } => import::cmd_import_shipments(&db, &file),
            ImportCommands::Expenses { file } => import::cmd_import_expenses(&db, &file),
            ImportCommands::Template => import::cmd_expense_template(&db),
        },
        Commands::Report {
            start,
            end,
            config,
            json,
            output,
        } => report::cmd_report(&db, start, end, config, json, output),
        Commands::Recon {
            cn_no,
            received,
            sales,
            remarks,
        } => admin::cmd_recon(&db, cn_no, received, sales, remarks),
        Commands::Search { needle, json } => admin::cmd_search(&db, &needle, json),
        Commands::Ho(cmd) => match cmd {
            HoCommands::Set {
                date,
                category,
                amount,
                remarks,
            } => admin::cmd_ho_set(&db, &date, &category, &amount, remarks),
            HoCommands::List { start, end } => admin::cmd_ho_list(&db, start, end),
        },
        Commands::Mapping(cmd) => match cmd {
            MappingCommands::Add { child, parent } => admin::cmd_mapping_add(&db, &child, &parent),
            MappingCommands::List => admin::cmd_mapping_list(&db),
            MappingCommands::Delete { child } => admin::cmd_mapping_delete(&db, &child),
        },
        Commands::Category(cmd) => match cmd {
            CategoryCommands::Add { scope, name } => admin::cmd_category_add(&db, &scope, &name),
            CategoryCommands::List { scope } => admin::cmd_category_list(&db, &scope),
        },
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Store failures get their own exit code so scripts can tell a
    /// broken database from bad data.
    pub fn store(err: freightbook_store::StoreError) -> Self {
        Self {
            code: EXIT_STORE,
            message: err.to_string(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
