//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `public_dns` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use public_dns::initialization::{init_client, init_logger_with};
use public_dns::{
    init_db_pool_with_path, run_ingest, Cli, Command, ConflictPolicy, IngestSource, Nameserver,
    PublicDns,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("public_dns error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let pool = init_db_pool_with_path(&cli.db_path)
        .await
        .context("Failed to initialize database pool")?;

    match cli.command {
        Command::Ingest {
            file,
            url,
            download_to,
            ignore_duplicates,
        } => {
            let client = init_client(cli.timeout_seconds).context("Failed to build HTTP client")?;
            let source = IngestSource::resolve(file, url);
            let policy = if ignore_duplicates {
                ConflictPolicy::Ignore
            } else {
                ConflictPolicy::Abort
            };

            let report = run_ingest(&pool, &client, &source, &download_to, policy).await?;
            let stored = PublicDns::new(pool.clone()).count().await?;
            println!(
                "✅ Stored {} of {} nameserver{} in {:.1}s",
                report.persisted,
                report.decoded,
                if report.decoded == 1 { "" } else { "s" },
                report.elapsed_seconds
            );
            println!(
                "Results saved in {} ({stored} rows)",
                cli.db_path.display()
            );
        }
        Command::All { country } => {
            let servers = PublicDns::new(pool)
                .all_for_country(&country.to_uppercase())
                .await?;
            print_nameservers(&servers, cli.json)?;
        }
        Command::Best { country } => {
            let server = PublicDns::new(pool)
                .best_for_country(&country.to_uppercase())
                .await?;
            print_nameservers(std::slice::from_ref(&server), cli.json)?;
        }
        Command::BestPerCountry { countries } => {
            let countries: Vec<String> = countries.iter().map(|c| c.to_uppercase()).collect();
            let servers = PublicDns::new(pool).best_per_country(&countries).await?;
            print_nameservers(&servers, cli.json)?;
        }
        Command::Tally => {
            let tallies = PublicDns::new(pool).tally_good_per_country().await?;
            if cli.json {
                print_json_lines(&tallies)?;
            } else {
                for tally in &tallies {
                    println!("{}\t{}", tally.country, tally.total);
                }
            }
        }
    }

    Ok(())
}

fn print_nameservers(servers: &[Nameserver], json: bool) -> Result<()> {
    if json {
        return print_json_lines(servers);
    }
    for server in servers {
        println!(
            "{}\t{}\t{}\t{}\t{:.2}",
            server.ip_address, server.country, server.city, server.name, server.reliability
        );
    }
    Ok(())
}

fn print_json_lines<T: Serialize>(items: &[T]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}
