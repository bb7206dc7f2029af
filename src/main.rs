use std::{
    fs::remove_dir_all,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use console::{style, Emoji, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cecab::{
    build_package,
    compress::{pack, stage, staging_directory, write_header},
    config::load_config,
};

mod args;
use args::*;

#[derive(Parser)]
#[command(about, version)]
pub struct Args {
    /// Directory to stage payload files in [default: a new temporary directory]
    #[arg(short = 's', long)]
    staging:            Option<PathBuf>,
    /// Keep the staging directory after packing
    #[arg(short = 'k', long)]
    keep:               bool,
    /// Only write the package header blob to the output path
    #[arg(long)]
    header_only:        bool,
    /// List the supported architectures
    #[arg(long)]
    list_architectures: bool,
    /// List the built-in path variables
    #[arg(long)]
    list_variables:     bool,
    /// Print debug diagnostics
    #[arg(short = 'v', long)]
    verbose:            bool,
    /// Path to the package manifest
    #[arg(required_unless_present_any = ["list_architectures", "list_variables"])]
    config:             Option<PathBuf>,
    /// Path of the output cabinet [default: inferred from the package name]
    output:             Option<PathBuf>,
}

fn step(current: u8, total: u8) -> StyledObject<String> {
    style(format!("[{}/{}]", current, total)).bold().black()
}

fn remove_staging(staging: &Path) {
    if let Err(e) = remove_dir_all(staging) {
        if e.kind() != ErrorKind::NotFound {
            println!(
                "      {}{}: {}",
                Emoji("⚠ ", ""),
                style("couldn't remove staging directory").red(),
                e
            );
        }
    }
}

fn main() {
    color_backtrace::install();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "warn" })),
        )
        .with_writer(std::io::stderr)
        .init();

    if args.list_architectures || args.list_variables {
        if args.list_architectures {
            list_architectures();
        }
        if args.list_variables {
            list_variables();
        }
        return;
    }

    let steps = if args.header_only { 3 } else { 4 };
    let config_path = get_config(args.config.as_deref());

    println!(
        "{} {}reading config {}…",
        step(1, steps),
        Emoji("🔍 ", ""),
        style(config_path.display()).blue()
    );
    let config = load_config(&config_path).unwrap_or_else(|e| fail("couldn't load config", e));

    println!(
        "{} {}building package header for {} files and {} links…",
        step(2, steps),
        Emoji("📃 ", ""),
        style(config.files.len()).magenta(),
        style(config.links.len()).magenta(),
    );
    let header = build_package(&config).unwrap_or_else(|e| fail("couldn't build package header", e));
    let output = get_output(args.output.as_deref(), header.stem(), args.header_only);

    if args.header_only {
        println!(
            "{} {}writing package header {}…",
            step(3, steps),
            Emoji("📃 ", ""),
            style(output.display()).blue()
        );
        write_header(&header, &output).unwrap_or_else(|e| fail("couldn't write package header", e));
        println!(
            "      {}{} {}",
            Emoji("✨ ", ""),
            style("wrote").green(),
            style(format!("{} bytes", header.total_length())).magenta()
        );
        println!("     {} {}", Emoji("✨ ", ""), style("done!").green());
        return;
    }

    let temporary = args.staging.is_none();
    let staging = get_staging(args.staging.as_deref()).unwrap_or_else(staging_directory);

    println!(
        "{} {}staging {} files in {}…",
        step(3, steps),
        Emoji("🚚 ", ""),
        style(config.files.len()).magenta(),
        style(staging.display()).blue()
    );
    let bar_progress = ProgressBar::new(config.files.len() as u64).with_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {elapsed_precise} [{wide_bar:.green}] {pos}/{len}\n{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar_progress.enable_steady_tick(Duration::from_millis(12));
    let staged = stage(&config, &header, &staging, |message| {
        bar_progress.inc(1);
        bar_progress.set_message(style(message).blue().to_string());
    })
    .unwrap_or_else(|e| {
        bar_progress.finish_and_clear();
        if temporary && !args.keep {
            remove_staging(&staging);
        }
        fail("couldn't stage files", e)
    });
    bar_progress.finish_and_clear();

    println!(
        "{} {}packing cabinet {}…",
        step(4, steps),
        Emoji("📦 ", ""),
        style(output.display()).blue()
    );
    let packed = pack(&staged, &output);
    if temporary && !args.keep {
        remove_staging(&staging);
    } else {
        println!(
            "      {}{} {}",
            Emoji("📁 ", ""),
            style("staged files kept in").green(),
            style(staging.display()).blue()
        );
    }
    packed.unwrap_or_else(|e| fail("couldn't pack cabinet", e));

    println!("     {} {}", Emoji("✨ ", ""), style("done!").green());
}
