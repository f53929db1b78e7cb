//! fflink CLI - build and unpack fastfile archives.
//!
//! This is the main entry point for the fflink command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::{MatchOptions, Pattern};
use indicatif::{ProgressBar, ProgressStyle};

use fflink::assets::AssetPointer;
use fflink::prelude::*;

/// fflink - fastfile linker and unlinker
#[derive(Parser)]
#[command(name = "fflink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an archive from a mod directory
    Build {
        /// Mod directory containing zone_source/<name>.csv
        mod_dir: PathBuf,

        /// Keep the uncompressed asset list as <name>.ffraw
        #[arg(short, long)]
        keep_intermediate: bool,

        /// Write <name>.ffm instead of <name>.ff
        #[arg(short = 'm', long)]
        ffm: bool,

        /// zlib-compress raw file content
        #[arg(long)]
        compress_rawfiles: bool,

        /// Enable map entity and physics preset assets
        #[arg(long)]
        experimental_blobs: bool,
    },

    /// Extract the assets of an archive into a source tree
    Unpack {
        /// Path to the archive
        archive: PathBuf,

        /// Output directory (defaults to the archive path without extension)
        #[arg(short, long, env = "FFLINK_OUTPUT")]
        output: Option<PathBuf>,

        /// Largest asset list to inflate, in MiB
        #[arg(long, env = "FFLINK_MAX_ARCHIVE_MB", default_value_t = 50)]
        max_archive_mb: usize,

        /// Enable map entity and physics preset assets
        #[arg(long)]
        experimental_blobs: bool,
    },

    /// List the asset table of an archive
    List {
        /// Path to the archive
        archive: PathBuf,

        /// Filter pattern on the asset type name (glob-style)
        #[arg(short, long)]
        filter: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,

        /// Largest asset list to inflate, in MiB
        #[arg(long, env = "FFLINK_MAX_ARCHIVE_MB", default_value_t = 50)]
        max_archive_mb: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            mod_dir,
            keep_intermediate,
            ffm,
            compress_rawfiles,
            experimental_blobs,
        } => {
            let options = BuildOptions {
                keep_intermediate,
                extension: if ffm {
                    ArchiveExtension::Ffm
                } else {
                    ArchiveExtension::Ff
                },
                compress_rawfiles,
                experimental_blobs,
            };
            cmd_build(&mod_dir, &options)?;
        }
        Commands::Unpack {
            archive,
            output,
            max_archive_mb,
            experimental_blobs,
        } => {
            let options = UnpackOptions {
                output_dir: output,
                max_archive_size: mib(max_archive_mb),
                experimental_blobs,
            };
            cmd_unpack(&archive, &options)?;
        }
        Commands::List {
            archive,
            filter,
            json,
            max_archive_mb,
        } => {
            cmd_list(&archive, filter.as_deref(), json, mib(max_archive_mb))?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn mib(value: usize) -> usize {
    value.saturating_mul(1024 * 1024)
}

fn cmd_build(mod_dir: &Path, options: &BuildOptions) -> Result<()> {
    println!("Building: {}", mod_dir.display());

    let start = Instant::now();
    let report = fflink::build(mod_dir, options)
        .with_context(|| format!("Failed to build {}", mod_dir.display()))?;

    println!(
        "Linked {} assets from {} manifest rows in {:?}",
        report.asset_count,
        report.manifest_rows,
        start.elapsed()
    );
    if let Some(path) = &report.intermediate_path {
        println!("Asset list: {} ({} bytes)", path.display(), report.asset_list_len);
    }
    println!(
        "Archive written: {} ({} bytes)",
        report.archive_path.display(),
        report.archive_len
    );

    Ok(())
}

fn cmd_unpack(archive: &Path, options: &UnpackOptions) -> Result<()> {
    println!("Unpacking: {}", archive.display());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let report = fflink::unpack_with_progress(archive, options, |done, total| {
        pb.set_length(total as u64);
        pb.set_position(done as u64);
    })
    .with_context(|| format!("Failed to unpack {}", archive.display()));
    pb.finish_and_clear();
    let report = report?;

    let summary = &report.summary;
    println!(
        "Extracted {} of {} assets to {} in {:?}",
        summary.written,
        report.asset_count,
        report.output_dir.display(),
        start.elapsed()
    );
    if summary.skipped_unknown > 0 {
        println!("Skipped {} assets of unsupported types", summary.skipped_unknown);
    }
    if summary.skipped_empty + summary.skipped_self_reference > 0 {
        println!(
            "Skipped {} empty and {} self-referencing raw files",
            summary.skipped_empty, summary.skipped_self_reference
        );
    }
    println!("Manifest: {}", report.manifest_path.display());

    Ok(())
}

fn cmd_list(archive: &Path, filter: Option<&str>, json: bool, max_archive_size: usize) -> Result<()> {
    let mut listing = fflink::list(archive, max_archive_size)
        .with_context(|| format!("Failed to read {}", archive.display()))?;

    if let Some(pattern) = filter {
        let pattern = Pattern::new(pattern).context("Invalid filter pattern")?;
        let options = MatchOptions {
            case_sensitive: false,
            ..MatchOptions::new()
        };
        listing
            .entries
            .retain(|e| pattern.matches_with(e.type_name, options));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{}: stream at {:#x}, {} bytes compressed, {} bytes inflated",
        listing.name, listing.stream_offset, listing.compressed_len, listing.asset_list_len
    );
    for entry in &listing.entries {
        let pointer = match entry.pointer {
            AssetPointer::Follows => "follows".to_string(),
            AssetPointer::Offset(offset) => format!("{offset:#010x}"),
        };
        println!(
            "{:>6} {:#04x} {:<24} {}",
            entry.index, entry.type_tag, entry.type_name, pointer
        );
    }

    println!("\nTotal: {} entries", listing.entries.len());

    Ok(())
}
