//! Package header layout.
//!
//! A package header is a fixed sequence of sections: the 100 byte header,
//! string table, directory table, file table, two registry sections that are
//! always empty, and the link table. Tables refer to each other by 1-based id
//! and the header refers to every section by absolute offset.

mod directories;
mod files;
mod links;
mod package;
mod section;
mod strings;

#[cfg(test)]
mod directories_tests;
#[cfg(test)]
mod section_tests;

pub use directories::{DirectoryEntry, DirectoryLayout, DirectoryTable};
pub use files::{split_destination, FileEntry, FileTable};
pub use links::{root_variable, LinkEntry, LinkTable, LinkTarget};
pub use package::{build_package, short_name, short_stem, write_section, PackageHeader};
pub use section::{HeaderMeta, HeaderSection, Section, SectionTable, StringRef};
pub use strings::{StringEntry, StringTable};
