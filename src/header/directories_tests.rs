use super::{DirectoryLayout, DirectoryTable, StringTable};

#[test]
fn lookup_ignores_case() {
    let mut strings = StringTable::new();
    let mut directories = DirectoryTable::new(DirectoryLayout::Flat);

    let id = directories.get_or_create("A\\B", &mut strings).unwrap();

    assert_eq!(directories.find("A\\B"), Some(id));
    assert_eq!(directories.find("a\\b"), Some(id));
    assert_eq!(directories.get_or_create("a\\B", &mut strings).unwrap(), id);
    assert_eq!(directories.len(), 1);
    assert_eq!(directories.find("A\\C"), None);
}

#[test]
fn flat_layout_interns_whole_path() {
    let mut strings = StringTable::new();
    let mut directories = DirectoryTable::new(DirectoryLayout::Flat);

    directories
        .get_or_create("%CE1%\\Demo", &mut strings)
        .unwrap();

    let entry = directories.entries().next().unwrap();
    assert_eq!(entry.components, vec![strings.get("%CE1%\\Demo").unwrap()]);
    assert_eq!(strings.len(), 1);
    assert_eq!(directories.length(), 8);
}

#[test]
fn hierarchical_layout_interns_each_segment() {
    let mut strings = StringTable::new();
    let mut directories = DirectoryTable::new(DirectoryLayout::Hierarchical);

    directories
        .get_or_create("\\Program Files\\Demo", &mut strings)
        .unwrap();

    let entry = directories.entries().next().unwrap();
    assert_eq!(entry.components, vec![1, 2]);
    assert_eq!(strings.get("Program Files"), Some(1));
    assert_eq!(strings.get("Demo"), Some(2));
    assert_eq!(directories.length(), 10);
}

#[test]
fn first_created_directory_keeps_its_spelling() {
    let mut strings = StringTable::new();
    let mut directories = DirectoryTable::new(DirectoryLayout::Flat);

    directories.get_or_create("ROOT", &mut strings).unwrap();
    directories.get_or_create("root", &mut strings).unwrap();

    assert_eq!(strings.get("ROOT"), Some(1));
    assert_eq!(strings.get("root"), None);
}

#[test]
fn write_emits_component_list() {
    let mut strings = StringTable::new();
    strings.intern("unrelated").unwrap();
    let mut directories = DirectoryTable::new(DirectoryLayout::Flat);
    directories.get_or_create("ROOT", &mut strings).unwrap();

    let mut bytes = Vec::new();
    directories.write(&mut bytes).unwrap();

    assert_eq!(bytes, [1, 0, 4, 0, 2, 0, 0, 0]);
    assert_eq!(bytes.len(), directories.length() as usize);
}

#[test]
fn ids_are_dense_from_one() {
    let mut strings = StringTable::new();
    let mut directories = DirectoryTable::new(DirectoryLayout::Flat);

    let ids = ["%CE1%\\Demo", "%CE2%", "%ce1%\\DEMO", "%CE1%\\Demo\\Data"]
        .iter()
        .map(|path| directories.get_or_create(path, &mut strings).unwrap())
        .collect::<Vec<_>>();

    assert_eq!(ids, vec![1, 2, 1, 3]);
    assert_eq!(
        directories.entries().map(|entry| entry.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}
