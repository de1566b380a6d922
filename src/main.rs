mod error;
mod layout;
mod request;
mod session;
mod writer;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use session::FormSession;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SheetKind {
    #[default]
    Personal,
    Equipment,
}

impl SheetKind {
    /// Header over the name column.
    pub fn crew_header(&self) -> &'static str {
        match self {
            SheetKind::Personal => "ESP Crew",
            SheetKind::Equipment => "Equipment",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            SheetKind::Personal => "Personal_Timesheet",
            SheetKind::Equipment => "Equipment_Timesheet",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "fieldsheet")]
#[command(version, about = "Generate field services timesheets as formatted Excel workbooks")]
pub struct Args {
    /// Timesheet type
    #[arg(short, long, value_enum, default_value_t = SheetKind::Personal)]
    pub kind: SheetKind,

    /// Month of the sheet (1-12)
    #[arg(short, long)]
    pub month: u32,

    /// Field name
    #[arg(long)]
    pub field_name: String,

    /// Well name
    #[arg(long)]
    pub well_name: String,

    /// Client name
    #[arg(long)]
    pub client_name: String,

    /// Starting date (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: NaiveDate,

    /// Ending date (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: NaiveDate,

    /// Row content, once per row: a technician name, or for equipment
    /// sheets a catalog index (1-9) or free text
    #[arg(short, long = "entry")]
    pub entries: Vec<String>,

    /// Row count (default: 2 for personal, 3 for equipment; equipment
    /// sheets cap at 7)
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// SLB representative
    #[arg(long, default_value = "")]
    pub representative: String,

    /// Output file or directory (default: derived file name in the
    /// current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Decorative logo embedded at the sheet corner
    #[arg(long, default_value = "logo.png")]
    pub logo: PathBuf,

    /// Print detailed progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: Args) -> error::Result<()> {
    let mut session = FormSession::new(args.kind);

    let requested_rows = args.rows.unwrap_or(0).max(args.entries.len());
    while session.row_count() < requested_rows {
        if !session.add_row() {
            if args.verbose {
                eprintln!(
                    "rows capped at {} for equipment sheets",
                    session::MAX_EQUIPMENT_ROWS
                );
            }
            break;
        }
    }

    for (index, raw) in args.entries.iter().enumerate() {
        let value = resolve_entry(args.kind, raw);
        if args.verbose {
            eprintln!("{}: {}", session.prompt_label(index), value);
        }
        session.set_entry(index, value)?;
    }

    let request = session.into_request(
        args.month,
        args.field_name,
        args.well_name,
        args.client_name,
        args.start_date,
        args.end_date,
        args.representative,
    );

    let plan = layout::plan(&request)?;

    if args.verbose {
        eprintln!(
            "grid: {} data rows, {} day columns",
            plan.layout.data_row_count, plan.layout.day_column_count
        );
    }

    let bytes = writer::render(&plan, Some(args.logo.as_path()))?;

    let file_name = writer::file_name(request.kind, &request.well_name);
    let path = match &args.output {
        Some(p) if p.is_dir() => p.join(&file_name),
        Some(p) => p.clone(),
        None => PathBuf::from(&file_name),
    };

    if args.verbose {
        eprintln!("output: {:?} ({})", path, writer::XLSX_MIME);
    }

    std::fs::write(&path, &bytes)?;
    Ok(())
}

/// Equipment rows are usually picked from the fixed catalog; a 1-based
/// index selects from it, anything else is kept as free text (the form's
/// "Other" entry). Personal rows are always free text.
fn resolve_entry(kind: SheetKind, raw: &str) -> String {
    if kind == SheetKind::Equipment {
        if let Ok(index) = raw.trim().parse::<usize>() {
            if (1..=session::EQUIPMENT_OPTIONS.len()).contains(&index) {
                return session::EQUIPMENT_OPTIONS[index - 1].to_string();
            }
        }
    }
    raw.to_string()
}
