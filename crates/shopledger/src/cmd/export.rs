//! shopledger export - Write the ledger to a backup file.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use shopledger_store::StoreError;

use super::{fail, CmdContext};

/// Arguments for `shopledger export`.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Destination file for the backup
    pub path: PathBuf,
}

/// Export the whole ledger as pretty-printed JSON.
pub fn run<W: Write>(ctx: &CmdContext, args: &Args, writer: &mut W) -> Result<ExitCode> {
    let store = ctx.store().load()?;

    match shopledger_store::export(&store, &args.path) {
        Ok(()) => {
            writeln!(
                writer,
                "exported {} products, {} purchases, {} sales to {}",
                store.products.len(),
                store.purchases.len(),
                store.sales.len(),
                args.path.display(),
            )?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ StoreError::NothingToExport) => fail(writer, e),
        Err(e) => Err(e.into()),
    }
}
