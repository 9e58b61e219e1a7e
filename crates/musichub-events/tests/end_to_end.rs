use std::sync::Arc;
use std::time::Duration;

use musichub_core::domain::{ArtistName, ExternalArtist, Isrc, Source, SourceType, VerificationStatus};
use musichub_core::ports::{
  ArtistReconciliationPort, ArtistRepository, ExternalTrackMetadata, PortError, TrackMetadataPort,
};
use musichub_core::services::{ArtistEnrichmentService, ArtistTrackingService, ProducerService};
use musichub_events::{ArtistEventConsumer, BroadcastChannel, EventsConfig};
use musichub_storage::{SqliteStore, StorageConfig};
use tempfile::tempdir;

struct Catalog {
  artists: Vec<&'static str>,
}

#[async_trait::async_trait]
impl TrackMetadataPort for Catalog {
  async fn find_track_by_isrc(&self, isrc: &Isrc) -> Result<Option<ExternalTrackMetadata>, PortError> {
    Ok(Some(ExternalTrackMetadata {
      isrc: isrc.clone(),
      title: format!("Song {isrc}"),
      artist_names: self.artists.iter().map(|a| a.to_string()).collect(),
      platform: SourceType::Tidal,
      external_id: format!("td-{isrc}"),
    }))
  }
}

/// Spotify conoce a todo el mundo y lo da por verificado.
struct SpotifyDirectory;

#[async_trait::async_trait]
impl ArtistReconciliationPort for SpotifyDirectory {
  fn supports(&self, source_type: SourceType) -> bool {
    source_type == SourceType::Spotify
  }

  async fn find_artist_by_name(
    &self,
    name: &ArtistName,
    source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError> {
    Ok(Some(ExternalArtist {
      name: name.clone(),
      status: VerificationStatus::Verified,
      sources: vec![Source::new(source_type, "sp-artist-1").unwrap()],
    }))
  }

  async fn find_artist_by_external_id(
    &self,
    _external_id: &str,
    _source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError> {
    Ok(None)
  }
}

#[tokio::test]
async fn registered_track_reaches_the_artist_context() {
  let tmp = tempdir().unwrap();
  let store = Arc::new(SqliteStore::open(&StorageConfig::in_dir(tmp.path())).unwrap());
  let config = EventsConfig::default();
  let channel = Arc::new(BroadcastChannel::from_config(&config).unwrap());

  let ports: Vec<Arc<dyn ArtistReconciliationPort>> = vec![Arc::new(SpotifyDirectory)];
  let consumer = ArtistEventConsumer::new(ArtistTrackingService::new(store.clone()))
    .with_enrichment(ArtistEnrichmentService::new(store.clone(), ports).unwrap(), &config);
  let handle = consumer.spawn(channel.subscribe());

  let producers = ProducerService::new(store.clone(), Catalog { artists: vec!["The Testers"] }, channel.clone());
  producers.register_track("DEU630901306", Some("e2e")).await.unwrap();
  producers.register_track("DEU630901306", None).await.unwrap();
  drop(producers);
  drop(channel);

  let report = handle.await.unwrap();
  assert_eq!(report.events, 1);
  assert_eq!(report.artists_created, 1);
  assert_eq!(report.enrichments, 1);

  let artist = store.find_by_name(&ArtistName::new("The Testers").unwrap()).unwrap().unwrap();
  assert_eq!(artist.status(), VerificationStatus::Verified);
  assert!(artist.has_source(SourceType::Spotify));
  assert!(artist.track_references().contains(&Isrc::new("DEU630901306").unwrap()));
  assert_eq!(artist.contributions()[0].title, "Song DEU630901306");
}

/// Spotify que nunca contesta.
struct SilentDirectory;

#[async_trait::async_trait]
impl ArtistReconciliationPort for SilentDirectory {
  fn supports(&self, source_type: SourceType) -> bool {
    source_type == SourceType::Spotify
  }

  async fn find_artist_by_name(
    &self,
    _name: &ArtistName,
    _source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Ok(None)
  }

  async fn find_artist_by_external_id(
    &self,
    _external_id: &str,
    _source_type: SourceType,
  ) -> Result<Option<ExternalArtist>, PortError> {
    Ok(None)
  }
}

#[tokio::test]
async fn configured_lookup_timeout_bounds_enrichment() {
  let tmp = tempdir().unwrap();
  let store = Arc::new(SqliteStore::open(&StorageConfig::in_dir(tmp.path())).unwrap());
  let config = EventsConfig { lookup_timeout_ms: Some(50), ..EventsConfig::default() };
  let channel = Arc::new(BroadcastChannel::from_config(&config).unwrap());

  let ports: Vec<Arc<dyn ArtistReconciliationPort>> = vec![Arc::new(SilentDirectory)];
  let consumer = ArtistEventConsumer::new(ArtistTrackingService::new(store.clone()))
    .with_enrichment(ArtistEnrichmentService::new(store.clone(), ports).unwrap(), &config);
  let handle = consumer.spawn(channel.subscribe());

  let producers = ProducerService::new(store.clone(), Catalog { artists: vec!["The Testers"] }, channel.clone());
  producers.register_track("DEU630901306", None).await.unwrap();
  drop(producers);
  drop(channel);

  let report = tokio::time::timeout(Duration::from_secs(10), handle).await.unwrap().unwrap();
  assert_eq!(report.enrichments, 1);

  let artist = store.find_by_name(&ArtistName::new("The Testers").unwrap()).unwrap().unwrap();
  assert_eq!(artist.status(), VerificationStatus::Provisional);
  assert!(artist.sources().is_empty());
}

#[tokio::test]
async fn credits_are_tracked_without_enrichment() {
  let tmp = tempdir().unwrap();
  let store = Arc::new(SqliteStore::open(&StorageConfig::in_dir(tmp.path())).unwrap());
  let channel = Arc::new(BroadcastChannel::new(8).unwrap());
  let handle = ArtistEventConsumer::new(ArtistTrackingService::new(store.clone())).spawn(channel.subscribe());

  let catalog = Catalog { artists: vec!["The Testers", "  ", "Guest Star"] };
  let producers = ProducerService::new(store.clone(), catalog, channel.clone());
  producers.register_track("DEU630901306", None).await.unwrap();
  producers.register_track("DEU630901307", None).await.unwrap();
  drop(producers);
  drop(channel);

  let report = handle.await.unwrap();
  assert_eq!(report.events, 2);
  assert_eq!(report.artists_created, 2);
  assert_eq!(report.artists_updated, 2);
  assert_eq!(report.enrichments, 0);

  let guest = store.find_by_name(&ArtistName::new("Guest Star").unwrap()).unwrap().unwrap();
  assert_eq!(guest.status(), VerificationStatus::Provisional);
  assert_eq!(guest.track_references().len(), 2);
}
