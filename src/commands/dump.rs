//! `dump`: write a transcript of every view in the schema to stdout.

use anyhow::Result;
use colored::*;
use tracing::warn;

use super::{stdout_transcript, Target};
use crate::ddl::Algorithm;

/// Dump each view's CREATE statement and, with `algorithm`, the ALTER that
/// would switch it. The output is what `scripts` reads back.
///
/// A view that cannot be read is logged and skipped.
pub async fn dump_views(target: &Target, algorithm: Option<Algorithm>) -> Result<()> {
    let database = target.require_database()?;
    let catalog = target.connect().await?;
    let mut out = stdout_transcript();

    out.connected(catalog.source(), catalog.hostname())?;
    out.server(catalog.source(), database)?;

    let views = catalog.view_names(database).await?;
    let mut skipped = 0usize;

    for view in &views {
        out.object(view)?;

        let statement = match catalog.show_create(database, view).await {
            Ok(statement) => statement,
            Err(e) => {
                warn!(database, view = %view, error = %e, "cannot read view");
                skipped += 1;
                continue;
            }
        };
        out.create_statement(&statement.name, statement.kind.as_str(), &statement.sql)?;

        if let Some(algorithm) = algorithm {
            match catalog.alter_view_statement(database, view, algorithm).await {
                Ok(alter) => out.alter_statement(&alter)?,
                Err(e) => {
                    warn!(database, view = %view, error = %e, "cannot build ALTER");
                    skipped += 1;
                }
            }
        }
    }
    out.flush()?;

    // Summary goes to stderr so stdout stays a clean transcript.
    eprintln!(
        "{} {} views dumped from {}",
        "✓".green(),
        views.len(),
        database.cyan()
    );
    if skipped > 0 {
        eprintln!("{} {} statements skipped (see log)", "!".yellow(), skipped);
    }

    catalog.close().await;
    Ok(())
}
