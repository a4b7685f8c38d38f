use serde::{Deserialize, Serialize};

/// Root `<playlist>` element of an XSPF document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub annotation: Option<String>,
    pub info: Option<String>,
    pub location: Option<String>,
    pub identifier: Option<String>,
    pub image: Option<String>,
    pub date: Option<String>,
    pub license: Option<String>,
    #[serde(rename = "trackList")]
    pub track_list: Option<TrackList>,
}

/// `<trackList>` element, tracks kept in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackList {
    #[serde(rename = "track", default)]
    pub tracks: Vec<Track>,
}

/// `<track>` element.
///
/// Only `location` matters for exporting. The rest is carried along as text
/// so unusual values never fail the whole load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "location", default)]
    pub locations: Vec<String>,
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub annotation: Option<String>,
    pub info: Option<String>,
    pub image: Option<String>,
    pub album: Option<String>,
    #[serde(rename = "trackNum")]
    pub track_num: Option<String>,
    pub duration: Option<String>,
}

impl Track {
    #[cfg(test)]
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            locations: vec![location.into()],
            ..Default::default()
        }
    }

    /// First non-blank `<location>` of the track
    pub fn location(&self) -> Option<&str> {
        self.locations
            .iter()
            .map(|location| location.trim())
            .find(|location| !location.is_empty())
    }
}
