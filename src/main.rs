//! Entry point for the EPUB peek utility.
//!
//! Responsibilities here are intentionally minimal:
//! - Scan the current directory for the first `.epub` file.
//! - Extract its metadata and the opening text via `extractor`.
//! - Print the report to stdout.

mod extractor;
mod scanner;

use crate::extractor::extract_epub_data;
use crate::scanner::find_first_epub;
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let name = match find_first_epub(Path::new("."))? {
        Some(name) => name,
        None => {
            println!("No .epub file found in the current directory.");
            return Ok(());
        }
    };

    info!(file = %name.display(), "Processing EPUB");
    println!("Found EPUB file: {}\n", name.display());

    let (metadata, text) = extract_epub_data(&name)?;
    print_report(metadata.as_ref(), &text);
    Ok(())
}

fn print_report(metadata: Option<&HashMap<String, String>>, text: &str) {
    match metadata {
        Some(metadata) => {
            println!("--- Metadata ---");
            for (key, value) in metadata {
                println!("{key}: {value}");
            }
            println!("\n--- First 50kb of Text ---");
            println!("{text}");
        }
        // On a corrupted container the text slot carries the error line.
        None => println!("{text}"),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(env_filter),
        )
        .init();
}
