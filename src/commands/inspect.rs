//! Live inventory commands.

use std::io::Write;

use anyhow::{bail, Result};
use colored::*;

use super::{stdout_transcript, Target};
use crate::catalog::{Catalog, ObjectKind};
use crate::ddl::Algorithm;
use crate::error::DefinerError;
use crate::render;

async fn connect_announced(target: &Target) -> Result<Catalog> {
    let catalog = target.connect().await?;
    stdout_transcript().connected(catalog.source(), catalog.hostname())?;
    Ok(catalog)
}

/// List every schema on the server.
pub async fn list_databases(target: &Target) -> Result<()> {
    let catalog = connect_announced(target).await?;
    let databases = catalog.databases().await?;
    render::print_databases(&databases);
    catalog.close().await;
    Ok(())
}

/// Routines, views, triggers and events of the schema with their definer.
pub async fn list_objects(target: &Target, json: bool) -> Result<()> {
    let database = target.require_database()?;
    let catalog = if json {
        target.connect().await?
    } else {
        connect_announced(target).await?
    };

    let objects = catalog.definer_objects(database).await?;
    if json {
        println!("{}", render::objects_json(&objects)?);
    } else {
        render::print_objects(&objects);
    }

    catalog.close().await;
    Ok(())
}

/// Print an object's CREATE statement; for a view, optionally generate (and
/// run) the ALTER that switches its algorithm.
pub async fn show_create(
    target: &Target,
    name: &str,
    algorithm: Option<Algorithm>,
    execute: bool,
) -> Result<()> {
    let database = target.require_database()?;
    let catalog = connect_announced(target).await?;
    let mut out = stdout_transcript();

    let statement = catalog.show_create(database, name).await?;
    out.create_statement(&statement.name, statement.kind.as_str(), &statement.sql)?;

    let Some(algorithm) = algorithm else {
        catalog.close().await;
        return Ok(());
    };

    if statement.kind != ObjectKind::View && !catalog.is_view(database, name).await? {
        bail!(DefinerError::NotAView(name.to_string()));
    }

    let alter = catalog
        .alter_view_statement(database, name, algorithm)
        .await?;
    out.alter_statement(&alter)?;

    if execute {
        print!("Executing ALTER VIEW statement... ");
        std::io::stdout().flush()?;
        match catalog.execute(&alter).await {
            Ok(_) => println!("{}", "Success".green()),
            Err(e) => {
                println!("{}", "Failed".red());
                catalog.close().await;
                bail!("error executing ALTER VIEW statement: {}", e);
            }
        }
    }

    catalog.close().await;
    Ok(())
}
