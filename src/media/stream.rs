//! Streams and tracks returned by an access grant.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::MediaDeviceKind;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocate a process-unique identifier such as `track-7`.
pub(crate) fn next_id(prefix: &str) -> String {
    format!("{}-{}", prefix, NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Whatever holds the underlying hardware for a track.
pub trait TrackSource: Send + fmt::Debug {
    /// Release the hardware. Called at most once per track.
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackState {
    Live,
    Ended,
}

/// A single live media track. Dropping a live track stops it.
#[derive(Debug)]
pub struct MediaStreamTrack {
    id: String,
    kind: MediaDeviceKind,
    label: String,
    state: TrackState,
    source: Box<dyn TrackSource>,
}

impl MediaStreamTrack {
    pub fn new(kind: MediaDeviceKind, label: impl Into<String>, source: Box<dyn TrackSource>) -> Self {
        Self {
            id: next_id("track"),
            kind,
            label: label.into(),
            state: TrackState::Live,
            source,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> MediaDeviceKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ready_state(&self) -> TrackState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == TrackState::Live
    }

    /// Stop the track and release its device. Repeated calls do nothing.
    pub fn stop(&mut self) {
        if self.state == TrackState::Ended {
            return;
        }
        self.source.stop();
        self.state = TrackState::Ended;
        log::debug!("Stopped {} track {} ({})", self.kind, self.id, self.label);
    }
}

impl Drop for MediaStreamTrack {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A set of tracks obtained from one access grant.
#[derive(Debug)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaStreamTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaStreamTrack>) -> Self {
        Self {
            id: next_id("stream"),
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaStreamTrack] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaStreamTrack> {
        self.tracks
            .iter()
            .filter(|t| t.kind() == MediaDeviceKind::VideoInput)
    }

    /// True while any track is live.
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(MediaStreamTrack::is_live)
    }

    /// Stop every video track, returning how many were live.
    pub fn stop_video_tracks(&mut self) -> usize {
        let mut stopped = 0;
        for track in self
            .tracks
            .iter_mut()
            .filter(|t| t.kind() == MediaDeviceKind::VideoInput)
        {
            if track.is_live() {
                track.stop();
                stopped += 1;
            }
        }
        stopped
    }
}
