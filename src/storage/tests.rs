use super::*;
use std::fs;
use tempfile::tempdir;

fn exts(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn enumerate_filters_by_extension_allow_list() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();
    fs::write(dir.path().join("b.MP3"), b"x").unwrap();
    fs::write(dir.path().join("c.flac"), b"x").unwrap();
    fs::write(dir.path().join("d.txt"), b"x").unwrap();

    let storage = LocalStorage::new(dir.path(), &exts(&["mp3"]));
    let objects = storage.enumerate().unwrap();
    let paths: Vec<&str> = objects.iter().map(|o| o.relpath.as_str()).collect();
    assert_eq!(paths, vec!["a.mp3", "b.MP3"]);

    let storage = LocalStorage::new(dir.path(), &exts(&["mp3", "flac"]));
    assert_eq!(storage.enumerate().unwrap().len(), 3);
}

#[test]
fn enumerate_yields_relative_slash_paths_in_lexicographic_order() {
    let dir = tempdir().unwrap();
    let zeta = dir.path().join("Zeta");
    let alpha = dir.path().join("Alpha").join("Remasters");
    fs::create_dir_all(&zeta).unwrap();
    fs::create_dir_all(&alpha).unwrap();
    fs::write(zeta.join("one.mp3"), b"x").unwrap();
    fs::write(alpha.join("two.mp3"), b"x").unwrap();
    fs::write(dir.path().join("Alpha").join("aaa.mp3"), b"x").unwrap();

    let storage = LocalStorage::new(dir.path(), &exts(&["mp3"]));
    let objects = storage.enumerate().unwrap();
    let paths: Vec<&str> = objects.iter().map(|o| o.relpath.as_str()).collect();
    assert_eq!(
        paths,
        vec!["Alpha/Remasters/two.mp3", "Alpha/aaa.mp3", "Zeta/one.mp3"]
    );
}

#[test]
fn enumerate_reports_sizes_and_tolerates_missing_root() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"12345").unwrap();

    let storage = LocalStorage::new(dir.path(), &exts(&["mp3"]));
    let objects = storage.enumerate().unwrap();
    assert_eq!(objects[0].size, 5);

    // A missing root yields an empty listing, not an error: the worst
    // outcome of a scan is an empty catalog.
    let storage = LocalStorage::new(dir.path().join("nope"), &exts(&["mp3"]));
    assert!(storage.enumerate().unwrap().is_empty());

    // A root that is a file is a configuration mistake, not a scan result.
    let storage = LocalStorage::new(dir.path().join("a.mp3"), &exts(&["mp3"]));
    assert!(matches!(
        storage.enumerate(),
        Err(StorageError::RootNotADirectory { .. })
    ));
}

#[test]
fn locator_resolves_direct_paths_by_default() {
    let dir = tempdir().unwrap();
    let storage = LocalStorage::new(dir.path(), &exts(&["mp3"]));
    let loc = storage.locator("Artist/Song A.mp3");
    assert_eq!(
        loc,
        dir.path().join("Artist").join("Song A.mp3").display().to_string()
    );
}

#[test]
fn locator_percent_encodes_against_base_url() {
    let storage = LocalStorage::new("/music", &exts(&["mp3"]))
        .with_base_url("https://cdn.example.net/media/");
    assert_eq!(
        storage.locator("JuiceWrld/LEAKED/Song A.mp3"),
        "https://cdn.example.net/media/JuiceWrld/LEAKED/Song%20A.mp3"
    );
}

#[test]
fn extension_list_entries_are_normalized() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.mp3"), b"x").unwrap();

    // Dots and surrounding whitespace in configured extensions are tolerated.
    let storage = LocalStorage::new(dir.path(), &exts(&[" .MP3 "]));
    assert_eq!(storage.enumerate().unwrap().len(), 1);
}
