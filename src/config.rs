use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use path_slash::PathBufExt;
use serde::Deserialize;
use tracing::debug;

use crate::{error::Error, expand::PathExpander};

/// A package manifest as written, before path variables are expanded.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub package:   PackageSection,
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub files:     IndexMap<String, FileSource>,
    #[serde(default)]
    pub links:     IndexMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub name:         Option<String>,
    pub provider:     Option<String>,
    pub architecture: Option<String>,
    #[serde(default)]
    pub unsupported:  String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FileSource {
    Path(String),
    Detailed {
        source: String,
        #[serde(default)]
        flags:  u32,
    },
}

impl FileSource {
    pub fn source(&self) -> &str {
        match self {
            FileSource::Path(source) | FileSource::Detailed { source, .. } => source,
        }
    }

    pub fn flags(&self) -> u32 {
        match self {
            FileSource::Path(_) => 0,
            FileSource::Detailed { flags, .. } => *flags,
        }
    }
}

/// Resolved package configuration with device paths fully expanded.
#[derive(Debug, Default)]
pub struct PackageConfig {
    pub architecture: String,
    pub app_name:     String,
    pub provider:     String,
    pub unsupported:  String,
    pub files:        Vec<InstallFile>,
    pub links:        Vec<InstallLink>,
}

#[derive(Debug)]
pub struct InstallFile {
    pub destination: String,
    pub source:      PathBuf,
    pub flags:       u32,
}

#[derive(Debug)]
pub struct InstallLink {
    pub destination: String,
    pub target:      String,
}

impl PackageConfig {
    /// Source file carrying payload `payload`. Payloads are numbered from 1 in file order.
    pub fn payload_source(&self, payload: u16) -> Option<&Path> {
        let index = usize::from(payload).checked_sub(1)?;
        self.files.get(index).map(|file| file.source.as_path())
    }
}

impl Manifest {
    pub fn parse(text: &str, path: &Path) -> crate::Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path:    path.to_owned(),
            message: e.message().to_owned(),
        })
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let text = read_to_string(path).map_err(|e| Error::Config {
            path:    path.to_owned(),
            message: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Expands path variables and resolves source paths against `base`.
    pub fn resolve(&self, base: &Path) -> crate::Result<PackageConfig> {
        let package = &self.package;
        let app_name = package
            .name
            .clone()
            .ok_or(Error::MissingRequiredMetadata("name"))?;
        let provider = package
            .provider
            .clone()
            .ok_or(Error::MissingRequiredMetadata("provider"))?;
        let architecture = package
            .architecture
            .clone()
            .ok_or(Error::MissingRequiredMetadata("architecture"))?;

        let mut expander = PathExpander::new();
        for (name, value) in &self.variables {
            expander.define(name, value)?;
        }

        let files = self
            .files
            .iter()
            .map(|(destination, source)| {
                Ok(InstallFile {
                    destination: expander.expand(destination)?,
                    source:      base.join(PathBuf::from_slash(source.source())),
                    flags:       source.flags(),
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let links = self
            .links
            .iter()
            .map(|(destination, target)| {
                Ok(InstallLink {
                    destination: expander.expand(destination)?,
                    target:      expander.expand(target)?,
                })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        debug!(
            app_name = app_name.as_str(),
            files = files.len(),
            links = links.len(),
            "resolved package config"
        );
        Ok(PackageConfig {
            architecture,
            app_name,
            provider,
            unsupported: package.unsupported.clone(),
            files,
            links,
        })
    }
}

/// Loads the manifest at `path` and resolves it relative to its directory.
pub fn load_config(path: &Path) -> crate::Result<PackageConfig> {
    let manifest = Manifest::load(path)?;
    manifest.resolve(path.parent().unwrap_or_else(|| Path::new("")))
}
