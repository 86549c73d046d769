use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lecture-sorter",
    version,
    about = "Organize lecture material by owner, subject and week"
)]
pub struct Cli {
    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct StorageArgs {
    /// Storage root holding every owner namespace.
    #[arg(long, global = true, env = "LECTURE_SORTER_ROOT", default_value = "uploads")]
    pub root: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = Backend::Fs)]
    pub backend: Backend,

    /// Enables file logging into this directory.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Backend {
    Fs,
    Sqlite,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Checks core linkage.
    Ping,
    /// Stores files in a week bucket with derived summaries.
    Ingest(IngestArgs),
    /// Appends an assignment to an owner's registry.
    Assign(AssignArgs),
    /// Prints an owner's subject/week tree.
    List(ListArgs),
    /// Removes one stored file and its summary.
    Delete(DeleteArgs),
    /// Writes an owner's namespace as a .tar.gz archive.
    Export(ExportArgs),
    /// Prints assignments due on a date (tomorrow by default).
    Due(DueArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub week: String,
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub title: String,
    /// Deadline as YYYY-MM-DD.
    #[arg(long)]
    pub deadline: String,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long)]
    pub owner: String,
    /// Include derived summary files.
    #[arg(long, default_value_t = false)]
    pub raw: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    #[arg(long)]
    pub owner: String,
    #[arg(long)]
    pub subject: String,
    #[arg(long)]
    pub week: String,
    #[arg(long)]
    pub filename: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long)]
    pub owner: String,
    /// Output file; defaults to `<owner>.tar.gz` in the working directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DueArgs {
    #[arg(long)]
    pub owner: String,
    /// Target date as YYYY-MM-DD.
    #[arg(long)]
    pub date: Option<String>,
}
