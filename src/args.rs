use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use cecab::{expand::PATH_VARIABLES, types::ARCHITECTURES};
use console::style;

pub fn fail(message: &str, error: impl Display) -> ! {
    println!("{}: {}", style(message).red(), style(error).red());
    std::process::exit(-1);
}

pub fn list_architectures() {
    println!("{}:", style("available architectures").blue().bright());
    for (name, code) in ARCHITECTURES {
        println!("  {} {}", name, style(format!("({})", code)).bold().dim());
    }
}

pub fn list_variables() {
    println!("{}:", style("available path variables").blue().bright());
    for (name, _, root) in PATH_VARIABLES {
        println!("  $({}) {}", name, style(root).bold().dim());
    }
}

pub fn get_config(config: Option<&Path>) -> PathBuf {
    let config = config.unwrap_or_else(|| {
        println!("{}", style("no config path given").red());
        std::process::exit(-1);
    });
    let current_dir = std::env::current_dir().unwrap_or_else(|e| fail("couldn't get current directory", e));
    let config = current_dir.join(config);
    let config = std::fs::canonicalize(&config).unwrap_or_else(|_| {
        println!(
            "{}: {}",
            style("config path does not exist").red(),
            config.display()
        );
        std::process::exit(-1);
    });
    if !config.is_file() {
        println!(
            "{}: {}",
            style("config path is not a file").red(),
            config.display()
        );
        std::process::exit(-1);
    }
    config
}

pub fn get_output(output: Option<&Path>, stem: &str, header_only: bool) -> PathBuf {
    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        PathBuf::from(if header_only {
            format!("{}.000", stem)
        } else {
            format!("{}.cab", stem)
        })
    });
    let current_dir = std::env::current_dir().unwrap_or_else(|e| fail("couldn't get current directory", e));
    let output = current_dir.join(output);
    let (Some(parent), Some(name)) = (output.parent(), output.file_name()) else {
        println!(
            "{}: {}",
            style("output path is invalid").red(),
            output.display()
        );
        std::process::exit(-1);
    };
    if !parent.is_dir() {
        println!(
            "{}: {}",
            style("output path has no parent directory").red(),
            parent.display()
        );
        std::process::exit(-1);
    }
    if output.is_dir() {
        println!(
            "{}: {}",
            style("output path is a directory").red(),
            output.display()
        );
        std::process::exit(-1);
    }
    std::fs::canonicalize(parent)
        .unwrap_or_else(|_| {
            println!(
                "{}: {}",
                style("output path is invalid").red(),
                output.display()
            );
            std::process::exit(-1);
        })
        .join(name)
}

pub fn get_staging(staging: Option<&Path>) -> Option<PathBuf> {
    let staging = staging?;
    let current_dir = std::env::current_dir().unwrap_or_else(|e| fail("couldn't get current directory", e));
    let staging = current_dir.join(staging);
    if staging.exists() && !staging.is_dir() {
        println!(
            "{}: {}",
            style("staging path is not a directory").red(),
            staging.display()
        );
        std::process::exit(-1);
    }
    Some(staging)
}
