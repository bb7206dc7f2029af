use std::io::Write;

use tracing::debug;
use zerocopy::byteorder::little_endian::{U16, U32};

use super::strings::StringTable;
use crate::{
    error::Error,
    types::{architecture_code, HeaderFields, IntoBytes, CE_SIGNATURE, HEADER_SIZE},
};

/// Sections of a package header, in on-disk order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Header,
    Strings,
    Directories,
    Files,
    RegistryHives,
    RegistryKeys,
    Links,
}

impl Section {
    pub const ORDER: [Section; 7] = [
        Section::Header,
        Section::Strings,
        Section::Directories,
        Section::Files,
        Section::RegistryHives,
        Section::RegistryKeys,
        Section::Links,
    ];

    /// Registry sections are never populated and take up no space.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Section::RegistryHives | Section::RegistryKeys)
    }
}

/// A metadata string, addressed relative to the start of the string table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StringRef {
    pub offset: u32,
    pub length: u16,
}

impl StringRef {
    fn intern(text: &str, strings: &mut StringTable) -> crate::Result<Self> {
        strings.intern(text)?;
        let offset = strings.offset_of(text).unwrap_or_default();
        let length = u16::try_from(text.len() + 1).map_err(|_| Error::FieldOverflow {
            field: "string length",
            value: text.len() as u64 + 1,
        })?;
        Ok(StringRef { offset, length })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeaderMeta {
    pub architecture: u32,
    pub app_name:     StringRef,
    pub provider:     StringRef,
    pub unsupported:  StringRef,
}

/// Counts and absolute offsets of the sections following the header.
pub struct SectionTable {
    pub total_length: u32,
    pub counts:       [u16; 6],
    pub offsets:      [u32; 6],
}

/// The fixed-size leading section.
#[derive(Default)]
pub struct HeaderSection {
    meta: HeaderMeta,
}

impl HeaderSection {
    pub fn new() -> Self { Self::default() }

    pub fn meta(&self) -> &HeaderMeta { &self.meta }

    pub fn set_meta(
        &mut self, architecture: &str, app_name: &str, provider: &str, unsupported: &str,
        strings: &mut StringTable,
    ) -> crate::Result<()> {
        let architecture = architecture_code(architecture)
            .ok_or_else(|| Error::UnknownArchitecture(architecture.to_owned()))?;
        self.meta = HeaderMeta {
            architecture,
            app_name: StringRef::intern(app_name, strings)?,
            provider: StringRef::intern(provider, strings)?,
            unsupported: StringRef::intern(unsupported, strings)?,
        };
        debug!(architecture, app_name, provider, "set package metadata");
        Ok(())
    }

    pub fn length(&self) -> u32 { HEADER_SIZE }

    /// Lays out the header fields. Metadata strings are addressed from the
    /// start of the package, through the string table's own offset.
    pub fn fields(&self, sections: &SectionTable) -> crate::Result<HeaderFields> {
        let strings_offset = sections.offsets[0];
        let absolute = |field: &'static str, string: StringRef| {
            let value = u64::from(strings_offset) + u64::from(string.offset);
            u16::try_from(value)
                .map(U16::new)
                .map_err(|_| Error::FieldOverflow { field, value })
        };
        let [string_count, directory_count, file_count, hive_count, key_count, link_count] =
            sections.counts.map(U16::new);
        let [string_offset, directory_offset, file_offset, hive_offset, key_offset, link_offset] =
            sections.offsets.map(U32::new);
        Ok(HeaderFields {
            signature: CE_SIGNATURE,
            reserved_1: U32::new(0),
            total_length: U32::new(sections.total_length),
            reserved_2: U32::new(0),
            format_marker: U32::new(1),
            architecture: U32::new(self.meta.architecture),
            min_version_major: U32::new(0),
            min_version_minor: U32::new(0),
            max_version_major: U32::new(0),
            max_version_minor: U32::new(0),
            min_build: U32::new(0),
            max_build: U32::new(0),
            string_count,
            directory_count,
            file_count,
            hive_count,
            key_count,
            link_count,
            string_offset,
            directory_offset,
            file_offset,
            hive_offset,
            key_offset,
            link_offset,
            app_name_offset: absolute("app name offset", self.meta.app_name)?,
            app_name_length: U16::new(self.meta.app_name.length),
            provider_offset: absolute("provider offset", self.meta.provider)?,
            provider_length: U16::new(self.meta.provider.length),
            unsupported_offset: absolute("unsupported text offset", self.meta.unsupported)?,
            unsupported_length: U16::new(self.meta.unsupported.length),
            reserved_3: U16::new(0),
            reserved_4: U16::new(0),
        })
    }

    pub fn write<W: Write>(&self, sink: &mut W, sections: &SectionTable) -> crate::Result<()> {
        let fields = self.fields(sections)?;
        sink.write_all(fields.as_bytes())?;
        Ok(())
    }
}
