//! Command-line front end over the lecture vault.
//!
//! # Responsibility
//! - Map subcommands onto vault operations.
//! - Print every result as JSON on stdout.
//!
//! Exit codes: `0` ok, `1` storage or I/O fault, `2` rejected input.

mod cli;

use chrono::{Days, Local, NaiveDate};
use clap::Parser;
use cli::{Backend, Cli, Commands, StorageArgs};
use lecture_sorter_core::{
    init_logging, ExportStats, ListingMode, ServiceError, ServiceResult, UploadFile, Vault,
    VaultConfig, DEADLINE_FORMAT,
};
use log::error;
use serde::Serialize;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            let client_error = err
                .downcast_ref::<ServiceError>()
                .is_some_and(ServiceError::is_client_error);
            ExitCode::from(if client_error { 2 } else { 1 })
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    start_logging(&cli.storage)?;
    match cli.command {
        Commands::Ping => {
            println!("lecture_sorter_core ping={}", lecture_sorter_core::ping());
            println!(
                "lecture_sorter_core version={}",
                lecture_sorter_core::core_version()
            );
            Ok(())
        }
        Commands::Ingest(args) => {
            let files = args
                .files
                .iter()
                .map(PathBuf::as_path)
                .map(read_upload)
                .collect::<CliResult<Vec<_>>>()?;
            let vault = open_vault(&cli.storage)?;
            print_json(&vault.ingest(&args.owner, &args.subject, &args.week, &files)?)
        }
        Commands::Assign(args) => print_json(&open_vault(&cli.storage)?.register_assignment(
            &args.owner,
            &args.subject,
            &args.title,
            &args.deadline,
        )?),
        Commands::List(args) => {
            let mode = if args.raw {
                ListingMode::Raw
            } else {
                ListingMode::Clean
            };
            print_json(&open_vault(&cli.storage)?.get_namespace(&args.owner, mode)?)
        }
        Commands::Delete(args) => print_json(&open_vault(&cli.storage)?.delete_file(
            &args.owner,
            &args.subject,
            &args.week,
            &args.filename,
        )?),
        Commands::Export(args) => {
            let export = open_vault(&cli.storage)?.export_archive(&args.owner)?;
            let out = args
                .out
                .unwrap_or_else(|| PathBuf::from(export.suggested_filename()));
            let file = File::create(&out)
                .map_err(|err| format!("cannot create `{}`: {err}", out.display()))?;
            let stats = write_or_discard(&out, |sink| export.write_to(sink), file)?;
            print_json(&serde_json::json!({
                "archive": out.display().to_string(),
                "entries": stats.entries,
                "skipped": stats.skipped,
                "bytes_in": stats.bytes_in,
            }))
        }
        Commands::Due(args) => {
            let date = match args.date.as_deref() {
                Some(raw) => NaiveDate::parse_from_str(raw.trim(), DEADLINE_FORMAT)
                    .map_err(|err| format!("invalid --date `{raw}`: {err}"))?,
                None => Local::now()
                    .date_naive()
                    .checked_add_days(Days::new(1))
                    .ok_or("date out of range")?,
            };
            print_json(&open_vault(&cli.storage)?.due_on(&args.owner, date)?)
        }
    }
}

/// Runs `write` into `file`; removes `out` when the archive is incomplete.
fn write_or_discard(
    out: &Path,
    write: impl FnOnce(BufWriter<File>) -> ServiceResult<ExportStats>,
    file: File,
) -> CliResult<ExportStats> {
    match write(BufWriter::new(file)) {
        Ok(stats) => Ok(stats),
        Err(err) => {
            if let Err(remove_err) = std::fs::remove_file(out) {
                error!(
                    "event=archive_cleanup module=cli status=error error={remove_err}"
                );
            }
            Err(err.into())
        }
    }
}

fn start_logging(storage: &StorageArgs) -> CliResult<()> {
    let Some(log_dir) = &storage.log_dir else {
        return Ok(());
    };
    let log_dir = absolute(log_dir)?;
    let level: &str = storage
        .log_level
        .as_deref()
        .unwrap_or_else(|| lecture_sorter_core::default_log_level());
    init_logging(level, &log_dir.to_string_lossy())?;
    Ok(())
}

fn open_vault(storage: &StorageArgs) -> CliResult<Vault> {
    let root = storage.root.to_string_lossy();
    let config = match storage.backend {
        Backend::Fs => VaultConfig::filesystem(&root)?,
        Backend::Sqlite => VaultConfig::sqlite(&root)?,
    };
    Ok(Vault::open(&config)?)
}

fn read_upload(path: &Path) -> CliResult<UploadFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("`{}` has no usable file name", path.display()))?;
    let bytes =
        std::fs::read(path).map_err(|err| format!("cannot read `{}`: {err}", path.display()))?;
    Ok(UploadFile::new(name, bytes))
}

fn absolute(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{run, write_or_discard};
    use crate::cli::Cli;
    use clap::Parser;
    use lecture_sorter_core::{ExportStats, ServiceError};
    use std::fs::File;
    use std::io::{self, Write};

    #[test]
    fn ping_does_not_open_storage() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("never-created");
        let cli = Cli::try_parse_from([
            "lecture-sorter",
            "--root",
            root.to_str().unwrap(),
            "ping",
        ])
        .unwrap();

        run(cli).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn failed_archive_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("u1.tar.gz");
        let file = File::create(&out).unwrap();

        let err = write_or_discard(
            &out,
            |mut sink| {
                sink.write_all(b"partial").unwrap();
                sink.flush().unwrap();
                Err(ServiceError::ArchiveStream(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "sink closed",
                )))
            },
            file,
        )
        .unwrap_err();

        assert!(err.downcast_ref::<ServiceError>().is_some());
        assert!(!out.exists());
    }

    #[test]
    fn successful_archive_write_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("u1.tar.gz");
        let file = File::create(&out).unwrap();

        let stats = write_or_discard(&out, |_| Ok(ExportStats::default()), file).unwrap();
        assert_eq!(stats, ExportStats::default());
        assert!(out.exists());
    }
}
