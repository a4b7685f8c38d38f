use std::path::{Path, PathBuf};

use url::Url;

/// Build an XSPF document with one `<track>` per location.
/// Locations are inserted verbatim, so callers escape them as needed.
pub fn xspf_document(locations: &[&str]) -> String {
    let tracks: String = locations
        .iter()
        .map(|location| {
            format!(
                "    <track>\n      <location>{}</location>\n    </track>\n",
                location
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <playlist version=\"1\" xmlns=\"http://xspf.org/ns/0/\">\n\
         \x20 <trackList>\n{}  </trackList>\n</playlist>\n",
        tracks
    )
}

/// Write a fake media file and return its path
pub fn write_media(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
    path
}

pub fn file_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .unwrap_or_else(|_| panic!("Not an absolute path: {}", path.display()))
        .to_string()
}

/// File names in a directory, sorted
pub fn list_file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
