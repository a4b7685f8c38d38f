mod types;

use std::path::{Path, PathBuf};

use xml::reader::{EventReader, XmlEvent};

pub use types::{PlaylistDocument, Track, TrackList};

const ROOT_ELEMENT: &str = "playlist";

#[derive(Debug, thiserror::Error)]
pub enum PlaylistError {
    #[error("Failed to read playlist file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Playlist is not well-formed XML: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("Failed to parse playlist: {0}")]
    Parse(#[from] serde_xml_rs::Error),

    #[error("Playlist is not in XSPF format.")]
    MissingPlaylist,

    #[error("Track list is missing from playlist.")]
    MissingTrackList,
}

/// Raw parse result, before any structural checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: String,
    /// Only deserialized when the root element is `<playlist>`
    pub playlist: Option<PlaylistDocument>,
}

/// Decode raw XSPF bytes into a [`Document`].
///
/// Character and entity escapes are decoded by the XML reader, so `&amp;` in a
/// location arrives here as `&`.
pub fn parse_document(raw: &[u8]) -> Result<Document, PlaylistError> {
    let root = root_element_name(raw)?;
    let playlist = if root == ROOT_ELEMENT {
        Some(serde_xml_rs::from_reader(raw)?)
    } else {
        None
    };

    Ok(Document { root, playlist })
}

fn root_element_name(raw: &[u8]) -> Result<String, PlaylistError> {
    for event in EventReader::new(raw) {
        if let XmlEvent::StartElement { name, .. } = event? {
            return Ok(name.local_name);
        }
    }
    // EventReader reports a missing root element as an error before we get here
    Err(PlaylistError::MissingPlaylist)
}

/// Minimal structural validation: a `<playlist>` root holding a `<trackList>`.
/// Individual tracks are not inspected.
pub fn validate(document: &Document) -> Result<(), PlaylistError> {
    let playlist = match &document.playlist {
        Some(playlist) if document.root == ROOT_ELEMENT => playlist,
        _ => return Err(PlaylistError::MissingPlaylist),
    };

    if playlist.track_list.is_none() {
        return Err(PlaylistError::MissingTrackList);
    }

    Ok(())
}

/// A loaded and validated XSPF playlist
#[derive(Debug, Clone)]
pub struct Playlist {
    source: PathBuf,
    document: PlaylistDocument,
}

impl Playlist {
    pub async fn from_file(path: &Path) -> Result<Self, PlaylistError> {
        log::debug!("Reading playlist: {}", path.display());
        let raw = tokio::fs::read(path)
            .await
            .map_err(|source| PlaylistError::Read {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_bytes(path, &raw)
    }

    pub fn from_bytes(source: impl Into<PathBuf>, raw: &[u8]) -> Result<Self, PlaylistError> {
        let document = parse_document(raw)?;
        validate(&document)?;

        let document = document.playlist.ok_or(PlaylistError::MissingPlaylist)?;
        let playlist = Self {
            source: source.into(),
            document,
        };
        log::debug!(
            "Loaded playlist {} with {} tracks",
            playlist.source.display(),
            playlist.tracks().len()
        );
        Ok(playlist)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn document(&self) -> &PlaylistDocument {
        &self.document
    }

    /// Tracks in playlist order
    pub fn tracks(&self) -> &[Track] {
        self.document
            .track_list
            .as_ref()
            .map(|list| list.tracks.as_slice())
            .unwrap_or(&[])
    }
}
