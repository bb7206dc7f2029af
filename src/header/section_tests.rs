use super::{HeaderSection, Section, SectionTable, StringRef, StringTable};
use crate::{types::IntoBytes, Error};

#[test]
fn order_is_fixed() {
    assert_eq!(
        Section::ORDER,
        [
            Section::Header,
            Section::Strings,
            Section::Directories,
            Section::Files,
            Section::RegistryHives,
            Section::RegistryKeys,
            Section::Links,
        ]
    );
    let placeholders = Section::ORDER
        .iter()
        .filter(|section| section.is_placeholder())
        .count();
    assert_eq!(placeholders, 2);
}

#[test]
fn set_meta_interns_metadata_strings() {
    let mut strings = StringTable::new();
    let mut header = HeaderSection::new();

    header
        .set_meta("StrongARM", "Demo", "Acme", "", &mut strings)
        .unwrap();

    let meta = header.meta();
    assert_eq!(meta.architecture, 2577);
    assert_eq!(meta.app_name, StringRef { offset: 4, length: 5 });
    assert_eq!(meta.provider, StringRef { offset: 16, length: 5 });
    assert_eq!(meta.unsupported, StringRef { offset: 28, length: 1 });
    assert_eq!(strings.len(), 3);
}

#[test]
fn metadata_strings_share_entries() {
    let mut strings = StringTable::new();
    let mut header = HeaderSection::new();

    header
        .set_meta("SH3", "Acme", "Acme", "", &mut strings)
        .unwrap();

    assert_eq!(header.meta().app_name, header.meta().provider);
    assert_eq!(strings.len(), 2);
}

#[test]
fn unknown_architecture_interns_nothing() {
    let mut strings = StringTable::new();
    let mut header = HeaderSection::new();

    let err = header
        .set_meta("Z80", "Demo", "Acme", "", &mut strings)
        .unwrap_err();

    assert!(matches!(err, Error::UnknownArchitecture(name) if name == "Z80"));
    assert!(strings.is_empty());
}

#[test]
fn fields_address_strings_from_package_start() {
    let mut strings = StringTable::new();
    let mut header = HeaderSection::new();
    header
        .set_meta("MIPS", "Demo", "Acme", "", &mut strings)
        .unwrap();
    let sections = SectionTable {
        total_length: 200,
        counts:       [3, 0, 0, 0, 0, 0],
        offsets:      [100, 132, 132, 132, 132, 132],
    };

    let fields = header.fields(&sections).unwrap();

    assert_eq!(fields.architecture.get(), 4000);
    assert_eq!(fields.total_length.get(), 200);
    assert_eq!(fields.app_name_offset.get(), 104);
    assert_eq!(fields.provider_offset.get(), 116);
    assert_eq!(fields.unsupported_offset.get(), 128);
    assert_eq!(fields.as_bytes().len(), header.length() as usize);
    assert_eq!(&fields.as_bytes()[0..4], b"MSCE");
}

#[test]
fn string_offset_must_fit_sixteen_bits() {
    let mut strings = StringTable::new();
    let mut header = HeaderSection::new();
    header
        .set_meta("MIPS", "Demo", "Acme", "", &mut strings)
        .unwrap();
    let sections = SectionTable {
        total_length: 70_000,
        counts:       [3, 0, 0, 0, 0, 0],
        offsets:      [65_534, 0, 0, 0, 0, 0],
    };

    let err = header.fields(&sections).err().unwrap();

    assert!(matches!(err, Error::FieldOverflow { field: "app name offset", .. }));
}
