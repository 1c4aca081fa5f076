use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use ipcgen::{build, generate, load_document};

/// Generates IPC stub files from an interface schema.
///
/// Writes `<name>.gen.h` and `<name>.gen.cpp` to the current directory,
/// where `<name>` is the schema file's base name.
#[derive(Parser, Debug)]
#[command(name = "ipcgen", version, about)]
struct Cli {
    /// Path to the interface schema document.
    schema: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Some(base_name) = cli.schema.file_stem().and_then(|stem| stem.to_str()) else {
        bail!("schema path has no usable file name: {}", cli.schema.display());
    };

    let root = load_document(&cli.schema)?;
    let interface = build(&root, base_name)?;
    // Both artifacts are rendered fully before either file is written, so a
    // failed run never leaves partial output behind.
    let artifacts = generate(&interface);

    let header_path = format!("{base_name}.gen.h");
    let source_path = format!("{base_name}.gen.cpp");
    fs::write(&header_path, &artifacts.header)
        .with_context(|| format!("failed to write {header_path}"))?;
    fs::write(&source_path, &artifacts.source)
        .with_context(|| format!("failed to write {source_path}"))?;

    tracing::info!(header = %header_path, source = %source_path, "wrote stubs");
    Ok(())
}
