use std::io::{Result, Write};

use tracing::trace;
use zerocopy::byteorder::little_endian::{U16, U32};

use super::{directories::DirectoryTable, strings::StringTable};
use crate::{
    error::Error,
    types::{padded, FileRecord, IntoBytes, PATH_SEPARATOR},
};

pub struct FileEntry {
    pub id:        u16,
    pub directory: u16,
    pub name:      Vec<u8>,
    pub payload:   u16,
    pub flags:     u32,
}

/// Splits an install path at its last separator into directory and file name.
pub fn split_destination(path: &str) -> Option<(&str, &str)> { path.rsplit_once(PATH_SEPARATOR) }

#[derive(Default)]
pub struct FileTable {
    entries: Vec<FileEntry>,
    length:  u32,
}

impl FileTable {
    pub fn new() -> Self { Self::default() }

    /// Registers a file installed at `destination`, backed by payload `payload`.
    ///
    /// Installing two files at the same destination is rejected rather than
    /// emitting a second entry.
    pub fn add(
        &mut self, destination: &str, payload: u16, flags: u32, directories: &mut DirectoryTable,
        strings: &mut StringTable,
    ) -> crate::Result<u16> {
        let (directory, name) = split_destination(destination)
            .ok_or_else(|| Error::InvalidDestination(destination.to_owned()))?;
        let name = padded(name);
        if name.len() > u16::MAX as usize {
            return Err(Error::FieldOverflow {
                field: "file name length",
                value: name.len() as u64,
            });
        }
        if let Some(existing) = directories.find(directory) {
            if self.position(existing, &name).is_some() {
                return Err(Error::DuplicateFile(destination.to_owned()));
            }
        }
        let id = u16::try_from(self.entries.len() + 1).map_err(|_| Error::TableFull("file"))?;
        let directory = directories.get_or_create(directory, strings)?;
        self.length += 12 + name.len() as u32;
        trace!(id, directory, payload, destination, "added file");
        self.entries.push(FileEntry {
            id,
            directory,
            name,
            payload,
            flags,
        });
        Ok(id)
    }

    /// Payload reference of the file installed at `destination`.
    pub fn find(&self, destination: &str, directories: &DirectoryTable) -> Option<u16> {
        let (directory, name) = split_destination(destination)?;
        let directory = directories.find(directory)?;
        self.position(directory, &padded(name))
            .map(|index| self.entries[index].payload)
    }

    fn position(&self, directory: u16, name: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.directory == directory && entry.name == name)
    }

    pub fn entries(&self) -> &[FileEntry] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn length(&self) -> u32 { self.length }

    pub fn write<W: Write>(&self, sink: &mut W) -> Result<()> {
        for entry in &self.entries {
            let record = FileRecord {
                id:          U16::new(entry.id),
                directory:   U16::new(entry.directory),
                payload:     U16::new(entry.payload),
                flags:       U32::new(entry.flags),
                name_length: U16::new(entry.name.len() as u16),
            };
            sink.write_all(record.as_bytes())?;
            sink.write_all(&entry.name)?;
        }
        Ok(())
    }
}
