use std::io::{Result, Write};

use indexmap::IndexMap;
use tracing::trace;
use zerocopy::byteorder::little_endian::U16;

use crate::{
    error::Error,
    types::{padded, IntoBytes, StringRecord},
};

pub struct StringEntry {
    pub id:     u16,
    pub offset: u32,
    pub data:   Vec<u8>,
}

/// Interned strings in first-seen order.
///
/// Every entry is laid out as `{id: u16, length: u16}` followed by the
/// NUL-padded text, so each entry occupies `4 + padded length` bytes.
#[derive(Default)]
pub struct StringTable {
    entries: IndexMap<String, StringEntry>,
    length:  u32,
}

impl StringTable {
    pub fn new() -> Self { Self::default() }

    /// Returns the id of `text`, adding it on first use.
    pub fn intern(&mut self, text: &str) -> crate::Result<u16> {
        if let Some(entry) = self.entries.get(text) {
            return Ok(entry.id);
        }
        let id = u16::try_from(self.entries.len() + 1).map_err(|_| Error::TableFull("string"))?;
        let data = padded(text);
        if data.len() > u16::MAX as usize {
            return Err(Error::FieldOverflow {
                field: "string length",
                value: data.len() as u64,
            });
        }
        let offset = self.length;
        self.length += data.len() as u32 + 4;
        trace!(id, offset, text, "interned string");
        self.entries
            .insert(text.to_owned(), StringEntry { id, offset, data });
        Ok(id)
    }

    pub fn get(&self, text: &str) -> Option<u16> { self.entries.get(text).map(|entry| entry.id) }

    /// Offset of the text bytes of `text` within this table, past the entry prefix.
    pub fn offset_of(&self, text: &str) -> Option<u32> {
        self.entries.get(text).map(|entry| entry.offset + 4)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &StringEntry)> {
        self.entries.iter().map(|(text, entry)| (text.as_str(), entry))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn length(&self) -> u32 { self.length }

    pub fn write<W: Write>(&self, sink: &mut W) -> Result<()> {
        for entry in self.entries.values() {
            let record = StringRecord {
                id:     U16::new(entry.id),
                length: U16::new(entry.data.len() as u16),
            };
            sink.write_all(record.as_bytes())?;
            sink.write_all(&entry.data)?;
        }
        Ok(())
    }
}
