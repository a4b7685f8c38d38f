use std::path::{Path, PathBuf};

use futures::future::join_all;

use crate::resolve::{ResolveError, reference_basename, resolve};
use crate::xspf::{Playlist, PlaylistError, Track};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportMode {
    /// One track at a time, in playlist order
    #[default]
    Sequential,
    /// Every track copied at once; returns when all have settled
    Concurrent,
}

impl ExportMode {
    pub fn from_concurrent(concurrent: bool) -> Self {
        if concurrent {
            Self::Concurrent
        } else {
            Self::Sequential
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub mode: ExportMode,
}

/// Failures that abort the whole export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Playlist(#[from] PlaylistError),

    #[error("Failed to create destination directory {}: {source}", .path.display())]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures confined to a single track
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Track has no location")]
    MissingLocation,

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(
        "Failed to copy {} to {}: {source}",
        .source_path.display(),
        .destination.display()
    )]
    CopyFailure {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Copy task failed: {message}")]
    TaskFailed { message: String },
}

#[derive(Debug)]
pub struct TrackOutcome {
    /// 1-based position in the playlist
    pub position: usize,
    pub file_name: Option<String>,
    /// Destination path of the copy
    pub result: Result<PathBuf, TrackError>,
}

impl TrackOutcome {
    pub fn is_copied(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-track outcomes, always in playlist order
#[derive(Debug, Default)]
pub struct ExportReport {
    pub outcomes: Vec<TrackOutcome>,
}

impl ExportReport {
    pub fn copied(&self) -> impl Iterator<Item = &TrackOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_copied())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &TrackOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_copied())
    }

    pub fn copied_count(&self) -> usize {
        self.copied().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// Digits used for the position prefix, never fewer than two
pub fn zero_pad_width(track_count: usize) -> usize {
    track_count.to_string().len().max(2)
}

/// `<zero-padded position>. <basename>`, e.g. `03. song.mp3`
pub fn destination_file_name(position: usize, width: usize, reference: &str) -> String {
    format!(
        "{:0width$}. {}",
        position,
        reference_basename(reference),
        width = width
    )
}

/// A planned copy. Names are fixed here, before anything is copied.
#[derive(Debug)]
struct CopyJob {
    position: usize,
    location: Option<String>,
    file_name: Option<String>,
    destination_dir: PathBuf,
}

impl CopyJob {
    fn label(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("track {}", self.position))
    }

    async fn run(self) -> TrackOutcome {
        log::info!("Copying file {}", self.label());
        let result = self.copy().await;
        if let Err(e) = &result {
            log::warn!("Skipping file \"{}\": {}", self.label(), e);
        }

        TrackOutcome {
            position: self.position,
            file_name: self.file_name,
            result,
        }
    }

    async fn copy(&self) -> Result<PathBuf, TrackError> {
        let (Some(location), Some(file_name)) = (&self.location, &self.file_name) else {
            return Err(TrackError::MissingLocation);
        };

        let source_path = resolve(location)?;
        let destination = self.destination_dir.join(file_name);
        tokio::fs::copy(&source_path, &destination)
            .await
            .map_err(|source| TrackError::CopyFailure {
                source_path: source_path.clone(),
                destination: destination.clone(),
                source,
            })?;

        log::debug!(
            "Copied {} -> {}",
            source_path.display(),
            destination.display()
        );
        Ok(destination)
    }
}

fn plan_jobs(tracks: &[Track], destination_dir: &Path) -> Vec<CopyJob> {
    let width = zero_pad_width(tracks.len());
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let position = index + 1;
            let location = track.location().map(str::to_string);
            let file_name = location
                .as_deref()
                .map(|location| destination_file_name(position, width, location));
            CopyJob {
                position,
                location,
                file_name,
                destination_dir: destination_dir.to_path_buf(),
            }
        })
        .collect()
}

/// Copy every track into `destination_dir`, prefixing names with the track's
/// playlist position. Existing files with the same name are overwritten.
///
/// Only failing to create the destination directory is an error. A track that
/// cannot be resolved or copied is logged and recorded in the report, and the
/// remaining tracks are still exported.
pub async fn export_tracks(
    tracks: &[Track],
    destination_dir: &Path,
    mode: ExportMode,
) -> Result<ExportReport, ExportError> {
    tokio::fs::create_dir_all(destination_dir)
        .await
        .map_err(|source| ExportError::CreateDestination {
            path: destination_dir.to_path_buf(),
            source,
        })?;

    let jobs = plan_jobs(tracks, destination_dir);
    log::debug!(
        "Exporting {} tracks to {} ({:?})",
        jobs.len(),
        destination_dir.display(),
        mode
    );

    let outcomes = match mode {
        ExportMode::Sequential => {
            let mut outcomes = Vec::with_capacity(jobs.len());
            for job in jobs {
                outcomes.push(job.run().await);
            }
            outcomes
        }
        ExportMode::Concurrent => {
            let tasks: Vec<_> = jobs
                .into_iter()
                .map(|job| {
                    let position = job.position;
                    let file_name = job.file_name.clone();
                    (position, file_name, tokio::spawn(job.run()))
                })
                .collect();

            join_all(
                tasks
                    .into_iter()
                    .map(|(position, file_name, handle)| async move {
                        match handle.await {
                            Ok(outcome) => outcome,
                            Err(e) => {
                                log::error!("Copy task for track {} failed: {}", position, e);
                                TrackOutcome {
                                    position,
                                    file_name,
                                    result: Err(TrackError::TaskFailed {
                                        message: e.to_string(),
                                    }),
                                }
                            }
                        }
                    }),
            )
            .await
        }
    };

    let report = ExportReport { outcomes };
    log::info!(
        "Export complete: {} copied, {} skipped, {} total",
        report.copied_count(),
        report.skipped_count(),
        report.total()
    );
    Ok(report)
}

/// Load the playlist at `options.input` and export its tracks.
/// Fails only if the playlist cannot be loaded or the destination cannot be
/// created.
pub async fn export_playlist(options: &ExportOptions) -> Result<ExportReport, ExportError> {
    let playlist = Playlist::from_file(&options.input).await?;
    if let Some(title) = &playlist.document().title {
        log::info!("Exporting playlist \"{}\"", title);
    }
    export_tracks(playlist.tracks(), &options.output_dir, options.mode).await
}
