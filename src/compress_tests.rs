use std::fs::{read, write};

use tempfile::tempdir;

use crate::{
    build_package,
    compress::{stage, staging_directory, write_header},
    config::{InstallFile, PackageConfig},
    Error,
};

#[test]
fn stage_writes_header_and_payloads_under_short_names() {
    let sources = tempdir().unwrap();
    write(sources.path().join("demo.exe"), b"executable").unwrap();
    write(sources.path().join("demo.dll"), b"library").unwrap();
    let config = PackageConfig {
        architecture: "ARM920".to_owned(),
        app_name: "Demo App".to_owned(),
        provider: "Acme".to_owned(),
        unsupported: "Not supported".to_owned(),
        files: vec![
            InstallFile {
                destination: "%CE1%\\Demo\\demo.exe".to_owned(),
                source:      sources.path().join("demo.exe"),
                flags:       0,
            },
            InstallFile {
                destination: "%CE2%\\demo.dll".to_owned(),
                source:      sources.path().join("demo.dll"),
                flags:       0,
            },
        ],
        links: Vec::new(),
    };
    let header = build_package(&config).unwrap();
    let staging = tempdir().unwrap();
    let directory = staging.path().join("stage");
    let progress = std::cell::Cell::new(0);

    let staged = stage(&config, &header, &directory, |_| progress.set(progress.get() + 1)).unwrap();

    let names = staged
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["0DemoApp.000", "0DemoApp.001", "0DemoApp.002"]);
    assert_eq!(read(&staged[0]).unwrap(), header.to_bytes().unwrap());
    assert_eq!(read(&staged[1]).unwrap(), b"executable");
    assert_eq!(read(&staged[2]).unwrap(), b"library");
    assert_eq!(progress.get(), 2);
}

#[test]
fn stage_fails_on_missing_source() {
    let config = PackageConfig {
        architecture: "SH3".to_owned(),
        app_name: "Demo".to_owned(),
        provider: "Acme".to_owned(),
        files: vec![InstallFile {
            destination: "%CE1%\\demo.exe".to_owned(),
            source:      "does/not/exist.exe".into(),
            flags:       0,
        }],
        ..PackageConfig::default()
    };
    let header = build_package(&config).unwrap();
    let staging = tempdir().unwrap();

    assert!(stage(&config, &header, staging.path(), |_| {}).is_err());
}

#[test]
fn write_header_matches_serialization() {
    let config = PackageConfig {
        architecture: "SH4".to_owned(),
        app_name: "Demo".to_owned(),
        provider: "Acme".to_owned(),
        ..PackageConfig::default()
    };
    let header = build_package(&config).unwrap();
    let directory = tempdir().unwrap();
    let target = directory.path().join("demo.000");

    write_header(&header, &target).unwrap();

    assert_eq!(read(&target).unwrap(), header.to_bytes().unwrap());
    assert_eq!(read(&target).unwrap().len(), 100 + 32);
}

#[test]
fn failed_header_leaves_no_file_behind() {
    // the provider string lands past the 16-bit offset range
    let config = PackageConfig {
        architecture: "SH4".to_owned(),
        app_name: "A".repeat(65_531),
        provider: "Acme".to_owned(),
        ..PackageConfig::default()
    };
    let header = build_package(&config).unwrap();
    let directory = tempdir().unwrap();
    let target = directory.path().join("demo.000");

    let err = write_header(&header, &target).err().unwrap();

    assert!(matches!(err, Error::FieldOverflow { field: "provider offset", .. }));
    assert!(!target.exists());
}

#[test]
fn failed_header_is_not_staged() {
    let config = PackageConfig {
        architecture: "SH4".to_owned(),
        app_name: "B".repeat(65_531),
        provider: "Acme".to_owned(),
        ..PackageConfig::default()
    };
    let header = build_package(&config).unwrap();
    let staging = tempdir().unwrap();

    assert!(stage(&config, &header, staging.path(), |_| {}).is_err());
    assert!(!staging.path().join(header.header_name()).exists());
}

#[test]
fn staging_directories_are_unique() {
    let first = staging_directory();
    let second = staging_directory();

    assert_ne!(first, second);
    assert!(first.starts_with(std::env::temp_dir()));
}
