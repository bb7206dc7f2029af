use std::{
    env::temp_dir,
    fs::{copy, create_dir_all, write},
    io::{Error as IoError, ErrorKind},
    path::{Path, PathBuf},
    process::Command,
};

use rand::{
    distr::{Alphanumeric, SampleString},
    rng,
};
use tracing::debug;
use which::which;

use crate::{config::PackageConfig, error::Error, header::PackageHeader};

pub const CAB_TOOL: &str = "lcab";

/// A fresh, randomly named directory path under the system temp directory.
pub fn staging_directory() -> PathBuf {
    temp_dir().join(format!("cecab-{}", Alphanumeric.sample_string(&mut rng(), 16)))
}

/// Serializes `header` into the file at `target`. Nothing is created at
/// `target` unless the whole header serialized.
pub fn write_header(header: &PackageHeader, target: &Path) -> crate::Result<()> {
    let bytes = header.to_bytes()?;
    write(target, bytes)?;
    Ok(())
}

/// Stage the header and every payload in `directory` under their short names.
/// The header blob comes first, followed by the payloads in file order.
pub fn stage<P: Fn(&str)>(
    config: &PackageConfig, header: &PackageHeader, directory: &Path, progress_callback: P,
) -> crate::Result<Vec<PathBuf>> {
    create_dir_all(directory)?;

    let header_path = directory.join(header.header_name());
    write_header(header, &header_path)?;
    let mut staged = vec![header_path];

    for (name, payload) in header.payload_names() {
        let source = config.payload_source(payload).ok_or_else(|| {
            IoError::new(
                ErrorKind::NotFound,
                format!("no source file for payload {}", payload),
            )
        })?;
        progress_callback(&source.display().to_string());
        let target = directory.join(&name);
        copy(source, &target).map_err(|e| {
            IoError::new(
                e.kind(),
                format!("couldn't copy {}: {}", source.display(), e),
            )
        })?;
        debug!(source = %source.display(), name = name.as_str(), "staged payload");
        staged.push(target);
    }
    Ok(staged)
}

/// Runs the cabinet tool over the staged files, writing the cabinet to `output`.
pub fn pack(staged: &[PathBuf], output: &Path) -> crate::Result<()> {
    let tool = which(CAB_TOOL).map_err(|_| Error::ToolNotFound(CAB_TOOL.to_owned()))?;
    debug!(tool = %tool.display(), files = staged.len(), "running cabinet tool");
    let status = Command::new(tool)
        .arg("-n")
        .arg("-q")
        .args(staged)
        .arg(output)
        .status()?;
    if !status.success() {
        return Err(Error::ToolFailed(status));
    }
    Ok(())
}
