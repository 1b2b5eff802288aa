//! `rite-backup`: mirror and verify a ledger storage directory.
//!
//! Exit codes: 0 on verified success, 1 on integrity failure (manifest
//! and hash listings are left in the log directory), 2 on usage or I/O
//! errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rite_ledger_backup::{snapshot, BackupError};

#[derive(Debug, Parser)]
#[command(name = "rite-backup", about = "Integrity backup for the Rite Ledger")]
struct Args {
    /// Ledger storage directory to back up.
    #[arg(long)]
    source: PathBuf,

    /// Mirror destination directory (created if absent).
    #[arg(long)]
    destination: PathBuf,

    /// Directory receiving the manifest and pre-/post-image hash listings.
    #[arg(long)]
    log_dir: PathBuf,

    /// Fixed run seal; a random one is generated when omitted.
    #[arg(long)]
    seal: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match snapshot(&args.source, &args.destination, &args.log_dir, args.seal.as_deref()) {
        Ok(manifest) => {
            println!(
                "backup complete: {} file(s) verified, run {} sealed read-only",
                manifest.file_count, manifest.run_seal
            );
            ExitCode::SUCCESS
        }
        Err(BackupError::Integrity(manifest)) => {
            eprintln!(
                "backup FAILED: {} fault(s) in run {}; see manifest {} in {}",
                manifest.faults.len(),
                manifest.run_seal,
                manifest.file_name(),
                args.log_dir.display(),
            );
            for fault in &manifest.faults {
                eprintln!("  - {}", fault.relative());
            }
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("rite-backup: {err}");
            ExitCode::from(2)
        }
    }
}
