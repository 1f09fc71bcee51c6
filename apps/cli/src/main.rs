//! Grantmap command-line front end for granular permission rows.

#![forbid(unsafe_code)]

mod cli_config;
mod commands;

use std::fs;
use std::sync::Arc;

use clap::Parser;
use grantmap_application::PermissionMapperRegistry;
use grantmap_core::AppError;
use grantmap_infrastructure::{InMemoryEntityPathLookup, InMemoryPathPermissionResolver};
use tracing::info;

use crate::cli_config::{Cli, CliCommand, init_tracing};
use crate::commands::{decode_input, encode_input, render};

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let input_path = cli.command.input_path();
    let registry = PermissionMapperRegistry::with_default_mappers(
        Arc::new(InMemoryEntityPathLookup::new()),
        Arc::new(InMemoryPathPermissionResolver::new()),
    )?;

    let input = fs::read_to_string(input_path).map_err(|error| {
        AppError::Internal(format!(
            "failed to read input file '{}': {error}",
            input_path.display()
        ))
    })?;

    let output = match cli.command {
        CliCommand::Decode { .. } => {
            let models = decode_input(&registry, &input, cli.context)?;
            info!(
                input_path = %input_path.display(),
                model_count = models.len(),
                "decoded granular permission rows"
            );
            render(&models, cli.pretty_output)?
        }
        CliCommand::Encode { .. } => {
            let grants = encode_input(&registry, &input)?;
            info!(
                input_path = %input_path.display(),
                grant_count = grants.len(),
                "encoded presentation models"
            );
            render(&grants, cli.pretty_output)?
        }
    };

    println!("{output}");
    Ok(())
}
