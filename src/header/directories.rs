use std::io::{Result, Write};

use indexmap::IndexMap;
use tracing::trace;
use zerocopy::byteorder::little_endian::U16;

use super::strings::StringTable;
use crate::{
    error::Error,
    types::{id_list_len, write_id_list, DirectoryRecord, IntoBytes, PATH_SEPARATOR},
};

/// How install directories are broken into string table components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectoryLayout {
    /// The whole directory path is a single component. Matches what existing
    /// device installers were built against.
    #[default]
    Flat,
    /// One component per non-empty path segment. Not used by `build_package`.
    Hierarchical,
}

pub struct DirectoryEntry {
    pub id:         u16,
    pub components: Vec<u16>,
}

/// Install directories keyed by their lowercased path.
#[derive(Default)]
pub struct DirectoryTable {
    entries: IndexMap<String, DirectoryEntry>,
    layout:  DirectoryLayout,
    length:  u32,
}

impl DirectoryTable {
    pub fn new(layout: DirectoryLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> DirectoryLayout { self.layout }

    pub fn get_or_create(&mut self, path: &str, strings: &mut StringTable) -> crate::Result<u16> {
        let key = path.to_lowercase();
        if let Some(entry) = self.entries.get(&key) {
            return Ok(entry.id);
        }
        let id = u16::try_from(self.entries.len() + 1).map_err(|_| Error::TableFull("directory"))?;
        let components = match self.layout {
            DirectoryLayout::Flat => vec![strings.intern(path)?],
            DirectoryLayout::Hierarchical => path
                .split(PATH_SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(|segment| strings.intern(segment))
                .collect::<crate::Result<Vec<_>>>()?,
        };
        self.length += 4 + id_list_len(&components) as u32;
        trace!(id, path, ?components, "created directory");
        self.entries.insert(key, DirectoryEntry { id, components });
        Ok(id)
    }

    pub fn find(&self, path: &str) -> Option<u16> {
        self.entries
            .get(&path.to_lowercase())
            .map(|entry| entry.id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> { self.entries.values() }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn length(&self) -> u32 { self.length }

    pub fn write<W: Write>(&self, sink: &mut W) -> Result<()> {
        for entry in self.entries.values() {
            let record = DirectoryRecord {
                id:     U16::new(entry.id),
                length: U16::new(id_list_len(&entry.components) as u16),
            };
            sink.write_all(record.as_bytes())?;
            write_id_list(sink, &entry.components)?;
        }
        Ok(())
    }
}
