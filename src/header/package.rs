use std::io::{Cursor, Seek, Write};

use tracing::{debug, info};

use super::{
    directories::{DirectoryLayout, DirectoryTable},
    files::FileTable,
    links::LinkTable,
    section::{HeaderSection, Section, SectionTable},
    strings::StringTable,
};
use crate::{config::PackageConfig, error::Error};

pub const SHORT_STEM_SIZE: usize = 8;

/// Reduces `name` to the eight character stem used for payload file names.
pub fn short_stem(name: &str) -> String {
    let stem = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(SHORT_STEM_SIZE)
        .collect::<String>();
    format!("{:0>width$}", stem, width = SHORT_STEM_SIZE)
}

/// Payload file name for `ordinal`. Ordinal 0 is the package header itself.
pub fn short_name(stem: &str, ordinal: u16) -> String { format!("{}.{:03}", stem, ordinal) }

/// Owns every table of one package header and lays them out in section order.
///
/// All registration has to happen before [`PackageHeader::serialize`], since
/// the header section embeds the final length of every other section.
#[derive(Default)]
pub struct PackageHeader {
    header:      HeaderSection,
    strings:     StringTable,
    directories: DirectoryTable,
    files:       FileTable,
    links:       LinkTable,
    stem:        String,
}

impl PackageHeader {
    pub fn new() -> Self { Self::with_directory_layout(DirectoryLayout::Flat) }

    pub fn with_directory_layout(layout: DirectoryLayout) -> Self {
        Self {
            directories: DirectoryTable::new(layout),
            stem: short_stem(""),
            ..Self::default()
        }
    }

    pub fn set_meta(
        &mut self, architecture: &str, app_name: &str, provider: &str, unsupported: &str,
    ) -> crate::Result<()> {
        self.header
            .set_meta(architecture, app_name, provider, unsupported, &mut self.strings)?;
        self.stem = short_stem(app_name);
        Ok(())
    }

    pub fn add_directory(&mut self, path: &str) -> crate::Result<u16> {
        self.directories.get_or_create(path, &mut self.strings)
    }

    pub fn add_file(&mut self, destination: &str, payload: u16, flags: u32) -> crate::Result<u16> {
        self.files.add(
            destination,
            payload,
            flags,
            &mut self.directories,
            &mut self.strings,
        )
    }

    pub fn add_link(&mut self, target: &str, destination: &str) -> crate::Result<u16> {
        self.links.add(
            target,
            destination,
            &self.files,
            &self.directories,
            &mut self.strings,
        )
    }

    pub fn header(&self) -> &HeaderSection { &self.header }

    pub fn strings(&self) -> &StringTable { &self.strings }

    pub fn directories(&self) -> &DirectoryTable { &self.directories }

    pub fn files(&self) -> &FileTable { &self.files }

    pub fn links(&self) -> &LinkTable { &self.links }

    pub fn stem(&self) -> &str { &self.stem }

    pub fn length(&self, section: Section) -> u32 {
        match section {
            Section::Header => self.header.length(),
            Section::Strings => self.strings.length(),
            Section::Directories => self.directories.length(),
            Section::Files => self.files.length(),
            Section::RegistryHives | Section::RegistryKeys => 0,
            Section::Links => self.links.length(),
        }
    }

    pub fn count(&self, section: Section) -> u16 {
        let count = match section {
            Section::Header => 1,
            Section::Strings => self.strings.len(),
            Section::Directories => self.directories.len(),
            Section::Files => self.files.len(),
            Section::RegistryHives | Section::RegistryKeys => 0,
            Section::Links => self.links.len(),
        };
        count as u16
    }

    /// Absolute offset of `section`, the combined length of every section before it.
    pub fn offset_of(&self, section: Section) -> u32 {
        Section::ORDER
            .iter()
            .take_while(|&&preceding| preceding != section)
            .map(|&preceding| self.length(preceding))
            .sum()
    }

    pub fn total_length(&self) -> u32 {
        Section::ORDER
            .iter()
            .map(|&section| self.length(section))
            .sum()
    }

    pub fn section_table(&self) -> SectionTable {
        let following = &Section::ORDER[1..];
        SectionTable {
            total_length: self.total_length(),
            counts:       std::array::from_fn(|index| self.count(following[index])),
            offsets:      std::array::from_fn(|index| self.offset_of(following[index])),
        }
    }

    /// Writes every section in order, checking each against its declared length.
    pub fn serialize<W: Write + Seek>(&self, sink: &mut W) -> crate::Result<()> {
        let sections = self.section_table();
        for section in Section::ORDER {
            write_section(sink, section, self.length(section), |sink| {
                match section {
                    Section::Header => self.header.write(sink, &sections)?,
                    Section::Strings => self.strings.write(sink)?,
                    Section::Directories => self.directories.write(sink)?,
                    Section::Files => self.files.write(sink)?,
                    Section::RegistryHives | Section::RegistryKeys => {}
                    Section::Links => self.links.write(sink)?,
                }
                Ok(())
            })?;
        }
        info!(
            length = sections.total_length,
            files = self.files.len(),
            links = self.links.len(),
            "serialized package header"
        );
        Ok(())
    }

    pub fn to_bytes(&self) -> crate::Result<Vec<u8>> {
        let mut sink = Cursor::new(Vec::with_capacity(self.total_length() as usize));
        self.serialize(&mut sink)?;
        Ok(sink.into_inner())
    }

    pub fn header_name(&self) -> String { short_name(&self.stem, 0) }

    /// Short payload names paired with the payload they carry, in file order.
    pub fn payload_names(&self) -> Vec<(String, u16)> {
        self.files
            .entries()
            .iter()
            .map(|entry| (short_name(&self.stem, entry.payload), entry.payload))
            .collect()
    }
}

/// Runs `write` for `section` and fails unless it wrote exactly `declared` bytes.
pub fn write_section<W, F>(sink: &mut W, section: Section, declared: u32, write: F) -> crate::Result<()>
where
    W: Write + Seek,
    F: FnOnce(&mut W) -> crate::Result<()>,
{
    let start = sink.stream_position()?;
    write(sink)?;
    let written = sink.stream_position()? - start;
    debug!(?section, start, written, "wrote section");
    if written != u64::from(declared) {
        return Err(Error::SectionLengthMismatch {
            section,
            declared,
            written,
        });
    }
    Ok(())
}

/// Registers everything in `config` and returns the finished header.
pub fn build_package(config: &PackageConfig) -> crate::Result<PackageHeader> {
    let mut package = PackageHeader::new();
    package.set_meta(
        &config.architecture,
        &config.app_name,
        &config.provider,
        &config.unsupported,
    )?;
    for (index, file) in config.files.iter().enumerate() {
        let payload = u16::try_from(index + 1).map_err(|_| Error::TableFull("file"))?;
        package.add_file(&file.destination, payload, file.flags)?;
    }
    for link in &config.links {
        package.add_link(&link.target, &link.destination)?;
    }
    debug!(
        strings = package.strings.len(),
        directories = package.directories.len(),
        files = package.files.len(),
        links = package.links.len(),
        "built package header"
    );
    Ok(package)
}
