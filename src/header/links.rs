use std::{
    io::{Result, Write},
    sync::LazyLock,
};

use regex::Regex;
use tracing::trace;
use zerocopy::byteorder::little_endian::U16;

use super::{directories::DirectoryTable, files::FileTable, strings::StringTable};
use crate::{
    error::Error,
    types::{id_list_len, write_id_list, IntoBytes, LinkRecord, PATH_SEPARATOR, ROOT_VARIABLE_PREFIX},
};

static ROOT_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^%{}(\d+)%$", regex::escape(ROOT_VARIABLE_PREFIX)))
        .expect("root variable pattern is valid")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u16)]
pub enum LinkTarget {
    Directory = 0,
    File = 1,
}

pub struct LinkEntry {
    pub id:          u16,
    pub target_kind: LinkTarget,
    pub target:      u16,
    pub base:        u16,
    pub components:  Vec<u16>,
}

/// Root variable index of a `%CE<N>%` token, if `component` is one.
/// Index 0 means "no root" in a link record, so `%CE0%` is not a token.
pub fn root_variable(component: &str) -> Option<u16> {
    ROOT_VARIABLE
        .captures(component)
        .and_then(|captures| captures[1].parse().ok())
        .filter(|&index| index > 0)
}

#[derive(Default)]
pub struct LinkTable {
    entries:      Vec<LinkEntry>,
    destinations: Vec<String>,
    length:       u32,
}

impl LinkTable {
    pub fn new() -> Self { Self::default() }

    /// Registers a shortcut at `destination` pointing at `target`.
    ///
    /// `target` is matched against installed files first and install
    /// directories second.
    pub fn add(
        &mut self, target: &str, destination: &str, files: &FileTable,
        directories: &DirectoryTable, strings: &mut StringTable,
    ) -> crate::Result<u16> {
        let (target_kind, target_id) = if let Some(payload) = files.find(target, directories) {
            (LinkTarget::File, payload)
        } else if let Some(directory) = directories.find(target) {
            (LinkTarget::Directory, directory)
        } else {
            return Err(Error::LinkTargetNotFound(target.to_owned()));
        };
        if self
            .destinations
            .iter()
            .any(|existing| existing == destination)
        {
            return Err(Error::DuplicateLink(destination.to_owned()));
        }
        let id = u16::try_from(self.entries.len() + 1).map_err(|_| Error::TableFull("link"))?;

        let mut parts = destination.split(PATH_SEPARATOR).peekable();
        if parts.peek() == Some(&"") {
            parts.next();
        }
        let base = match parts.peek().and_then(|first| root_variable(first)) {
            Some(base) => {
                parts.next();
                base
            }
            None => 0,
        };
        let components = parts
            .map(|part| strings.intern(part))
            .collect::<crate::Result<Vec<_>>>()?;

        self.length += 12 + id_list_len(&components) as u32;
        trace!(id, ?target_kind, target_id, base, destination, "added link");
        self.entries.push(LinkEntry {
            id,
            target_kind,
            target: target_id,
            base,
            components,
        });
        self.destinations.push(destination.to_owned());
        Ok(id)
    }

    pub fn entries(&self) -> &[LinkEntry] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn length(&self) -> u32 { self.length }

    pub fn write<W: Write>(&self, sink: &mut W) -> Result<()> {
        for entry in &self.entries {
            let record = LinkRecord {
                id:          U16::new(entry.id),
                reserved:    U16::new(0),
                base:        U16::new(entry.base),
                target:      U16::new(entry.target),
                kind:        U16::new(entry.target_kind as u16),
                path_length: U16::new(id_list_len(&entry.components) as u16),
            };
            sink.write_all(record.as_bytes())?;
            write_id_list(sink, &entry.components)?;
        }
        Ok(())
    }
}
