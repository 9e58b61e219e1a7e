#![allow(dead_code)]

use std::sync::Mutex;

use musichub_core::domain::{Isrc, SourceType, TrackWasRegistered};
use musichub_core::ports::{ExternalTrackMetadata, MessageChannel, PortError, TrackMetadataPort};
use musichub_storage::{SqliteStore, StorageConfig};
use tempfile::TempDir;

/// Plataforma falsa que conoce cualquier ISRC y lo acredita a `artists`.
pub struct StaticMetadata {
  pub artists: Vec<String>,
}

impl StaticMetadata {
  pub fn crediting(artists: &[&str]) -> Self {
    StaticMetadata { artists: artists.iter().map(|a| a.to_string()).collect() }
  }
}

#[async_trait::async_trait]
impl TrackMetadataPort for StaticMetadata {
  async fn find_track_by_isrc(&self, isrc: &Isrc) -> Result<Option<ExternalTrackMetadata>, PortError> {
    Ok(Some(ExternalTrackMetadata {
      isrc: isrc.clone(),
      title: format!("Song {isrc}"),
      artist_names: self.artists.clone(),
      platform: SourceType::Spotify,
      external_id: format!("sp-{isrc}"),
    }))
  }
}

#[derive(Default)]
pub struct RecordingChannel {
  pub events: Mutex<Vec<TrackWasRegistered>>,
}

impl RecordingChannel {
  pub fn take(&self) -> Vec<TrackWasRegistered> {
    std::mem::take(&mut *self.events.lock().unwrap())
  }
}

#[async_trait::async_trait]
impl MessageChannel for RecordingChannel {
  async fn publish(&self, event: TrackWasRegistered) -> Result<(), PortError> {
    self.events.lock().unwrap().push(event);
    Ok(())
  }
}

pub fn sqlite_store() -> (TempDir, SqliteStore) {
  let tmp = tempfile::tempdir().unwrap();
  let store = SqliteStore::open(&StorageConfig::in_dir(tmp.path())).unwrap();
  (tmp, store)
}
