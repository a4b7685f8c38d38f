use std::path::{Path, PathBuf};

use url::{ParseError, Url};

const LOCAL_SCHEME: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "Unsupported protocol \"{scheme}\". Only files on the local file system can be exported."
    )]
    UnsupportedProtocol { scheme: String },

    #[error("Unsupported host \"{host}\". Only files on the local file system can be exported.")]
    UnsupportedHost { host: String },

    #[error("Cannot turn \"{reference}\" into a local file path")]
    InvalidPath { reference: String },
}

/// Resolve a track location into a path on the local file system.
///
/// References without a scheme are taken as plain local paths and returned
/// untouched. `file` URIs must not name a host; their path is percent-decoded.
/// Nothing here touches the file system, so a missing file only shows up when
/// it is copied.
pub fn resolve(reference: &str) -> Result<PathBuf, ResolveError> {
    let url = match Url::parse(reference) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => return Ok(PathBuf::from(reference)),
        Err(_) => {
            return Err(ResolveError::InvalidPath {
                reference: reference.to_string(),
            });
        }
    };

    if url.scheme() != LOCAL_SCHEME {
        return Err(ResolveError::UnsupportedProtocol {
            scheme: url.scheme().to_string(),
        });
    }

    if let Some(host) = url.host_str()
        && !host.is_empty()
    {
        return Err(ResolveError::UnsupportedHost {
            host: host.to_string(),
        });
    }

    url.to_file_path().map_err(|_| ResolveError::InvalidPath {
        reference: reference.to_string(),
    })
}

/// Final path segment of a reference, read the same way [`resolve`] reads it.
pub fn reference_basename(reference: &str) -> String {
    match Url::parse(reference) {
        Ok(url) => {
            let segment = url
                .path_segments()
                .and_then(|segments| segments.last())
                .unwrap_or("");
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        }
        Err(_) => Path::new(reference)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_file_uri() {
        let path = resolve("file:///music/album/01.mp3").unwrap();
        assert_eq!(path, PathBuf::from("/music/album/01.mp3"));
    }

    #[test]
    fn test_resolve_decodes_percent_escapes() {
        let path = resolve("file:///music/My%20Song%20%231.mp3").unwrap();
        assert_eq!(path, PathBuf::from("/music/My Song #1.mp3"));
    }

    #[test]
    fn test_resolve_uppercase_scheme() {
        let path = resolve("FILE:///music/a.mp3").unwrap();
        assert_eq!(path, PathBuf::from("/music/a.mp3"));
    }

    #[test]
    fn test_resolve_localhost_is_local() {
        let path = resolve("file://localhost/music/a.mp3").unwrap();
        assert_eq!(path, PathBuf::from("/music/a.mp3"));
    }

    #[test]
    fn test_resolve_bare_paths_are_local() {
        assert_eq!(
            resolve("/music/a b.mp3").unwrap(),
            PathBuf::from("/music/a b.mp3")
        );
        assert_eq!(
            resolve("relative/dir/a.mp3").unwrap(),
            PathBuf::from("relative/dir/a.mp3")
        );
    }

    #[test]
    fn test_resolve_rejects_remote_scheme() {
        let err = resolve("http://example.com/a.mp3").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedProtocol {
                scheme: "http".to_string()
            }
        );
        assert!(err.to_string().contains("\"http\""));
    }

    #[test]
    fn test_resolve_rejects_host() {
        let err = resolve("file://nas.local/share/a.mp3").unwrap_err();
        assert_eq!(
            err,
            ResolveError::UnsupportedHost {
                host: "nas.local".to_string()
            }
        );
    }

    #[test]
    fn test_reference_basename() {
        assert_eq!(reference_basename("file:///music/test-1.mp3"), "test-1.mp3");
        assert_eq!(
            reference_basename("file:///music/My%20Song.flac"),
            "My Song.flac"
        );
        assert_eq!(reference_basename("http://example.com/x/y.ogg"), "y.ogg");
        assert_eq!(reference_basename("music/z.wav"), "z.wav");
        assert_eq!(reference_basename(""), "");
    }
}
