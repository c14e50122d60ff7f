use super::model::{RawEntry, UNSORTED_ARTIST};

/// Classify a storage-relative path into artist, subfolder chain and title.
///
/// Pure and total over every non-degenerate path: a lone filename gets the
/// [`UNSORTED_ARTIST`] sentinel, anything else takes its first segment as
/// the artist and keeps the segments between artist and filename as the
/// subfolder chain. A path with no usable segments yields `None` and is
/// skipped by the scanner.
pub fn classify(path: &str) -> Option<RawEntry> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let (artist, subfolders, filename) = match segments.as_slice() {
        [] => return None,
        [only] => (UNSORTED_ARTIST, &[] as &[&str], *only),
        [first, middle @ .., last] => (*first, middle, *last),
    };

    Some(RawEntry {
        path: path.to_string(),
        artist: artist.to_string(),
        subfolders: subfolders.iter().map(|s| s.to_string()).collect(),
        title: strip_extension(filename).to_string(),
    })
}

/// Strip the final `.ext` from a filename. Dotfiles keep their name.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_extension_removes_only_the_last_component() {
        assert_eq!(strip_extension("Song A.mp3"), "Song A");
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
        assert_eq!(strip_extension(".hidden"), ".hidden");
    }
}
