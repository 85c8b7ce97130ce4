//! In-process media platform with scripted devices and failures.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::error::PlatformError;
use super::select::select_video_device;
use super::stream::{MediaStream, MediaStreamTrack, TrackSource};
use super::{MediaDeviceInfo, MediaDeviceKind, MediaDevices};
use crate::camera::MediaStreamConstraints;

/// A platform that lives entirely in memory.
///
/// Mirrors browser behavior where labels stay empty until the first
/// successful access grant. Tracks report back when stopped, so tests can
/// check that nothing is left holding a device.
#[derive(Debug, Default)]
pub struct MemoryMediaDevices {
    state: Mutex<State>,
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct State {
    devices: Vec<MediaDeviceInfo>,
    granted: bool,
    access_failures: VecDeque<PlatformError>,
    enumerate_failures: VecDeque<PlatformError>,
    requests: Vec<MediaStreamConstraints>,
}

#[derive(Debug, Default)]
struct Counters {
    live: AtomicUsize,
    stopped: AtomicUsize,
}

#[derive(Debug)]
struct MemoryTrack {
    counters: Arc<Counters>,
}

impl TrackSource for MemoryTrack {
    fn stop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
        self.counters.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

impl MemoryMediaDevices {
    pub fn new(devices: Vec<MediaDeviceInfo>) -> Self {
        Self {
            state: Mutex::new(State {
                devices,
                ..Default::default()
            }),
            counters: Arc::default(),
        }
    }

    /// Start with access already granted, so labels are visible.
    pub fn granted(self) -> Self {
        self.lock().granted = true;
        self
    }

    /// Fail the next access request with `err`.
    pub fn fail_next_access(&self, err: PlatformError) {
        self.lock().access_failures.push_back(err);
    }

    /// Fail the next enumeration with `err`.
    pub fn fail_next_enumerate(&self, err: PlatformError) {
        self.lock().enumerate_failures.push_back(err);
    }

    pub fn add_device(&self, device: MediaDeviceInfo) {
        self.lock().devices.push(device);
    }

    /// Number of tracks currently holding a device.
    pub fn live_tracks(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    /// Number of track stops observed so far.
    pub fn stopped_tracks(&self) -> usize {
        self.counters.stopped.load(Ordering::SeqCst)
    }

    /// Every constraint object passed to `get_user_media`, in order.
    pub fn requests(&self) -> Vec<MediaStreamConstraints> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn track(&self, kind: MediaDeviceKind, label: &str) -> MediaStreamTrack {
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        MediaStreamTrack::new(
            kind,
            label,
            Box::new(MemoryTrack {
                counters: self.counters.clone(),
            }),
        )
    }
}

#[async_trait]
impl MediaDevices for MemoryMediaDevices {
    async fn get_user_media(
        &self,
        constraints: &MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError> {
        let mut state = self.lock();
        state.requests.push(constraints.clone());

        if let Some(err) = state.access_failures.pop_front() {
            return Err(err);
        }

        let mut tracks = Vec::new();
        if constraints.video.is_requested() {
            let device = select_video_device(constraints, &state.devices)?;
            tracks.push(self.track(MediaDeviceKind::VideoInput, &device.label));
        }
        if constraints.audio {
            if let Some(mic) = state
                .devices
                .iter()
                .find(|d| d.kind == MediaDeviceKind::AudioInput)
            {
                tracks.push(self.track(MediaDeviceKind::AudioInput, &mic.label));
            }
        }
        if tracks.is_empty() {
            return Err(PlatformError::Other(
                "At least one of audio and video must be requested".to_string(),
            ));
        }

        state.granted = true;
        Ok(MediaStream::new(tracks))
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        let mut state = self.lock();
        if let Some(err) = state.enumerate_failures.pop_front() {
            return Err(err);
        }

        let granted = state.granted;
        Ok(state
            .devices
            .iter()
            .map(|d| MediaDeviceInfo {
                label: if granted { d.label.clone() } else { String::new() },
                ..d.clone()
            })
            .collect())
    }
}
