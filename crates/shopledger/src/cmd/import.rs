//! shopledger import - Replace the ledger with a backup.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use shopledger_store::StoreError;

use super::{confirm, fail, CmdContext};

/// Arguments for `shopledger import`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Backup file to load
    pub path: PathBuf,
}

/// Verify the backup, confirm, then replace the ledger wholesale.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let incoming = match shopledger_store::import(&args.path) {
        Ok(store) => store,
        Err(e @ (StoreError::InvalidBackup { .. } | StoreError::Parse { .. })) => {
            return fail(writer, e);
        }
        Err(e) => return Err(e.into()),
    };

    writeln!(
        writer,
        "backup contains {} products, {} purchases, {} sales",
        incoming.products.len(),
        incoming.purchases.len(),
        incoming.sales.len(),
    )?;
    writeln!(
        writer,
        "importing replaces the ledger at {}",
        ctx.ledger_path.display(),
    )?;

    if !confirm("replace the current ledger with this backup?", ctx.assume_yes)? {
        writeln!(writer, "aborted")?;
        return Ok(ExitCode::from(1));
    }
    ctx.store().save(&incoming)?;

    writeln!(writer, "imported {}", args.path.display())?;
    Ok(ExitCode::SUCCESS)
}
