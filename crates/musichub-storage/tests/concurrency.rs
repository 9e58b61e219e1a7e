mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use common::{RecordingChannel, StaticMetadata, sqlite_store};
use musichub_core::domain::{
  Artist, ArtistId, ArtistName, Isrc, Producer, ProducerCode, ProducerSnapshot, Source, Track, TrackInfo,
};
use musichub_core::ports::{ArtistRepository, ProducerRepository, RepoError};
use musichub_core::services::{ArtistTrackingService, ProducerService};
use musichub_storage::InMemoryStore;

/// Hace que las dos primeras lecturas esperen la una a la otra, así ambos
/// escritores parten de la misma foto antes de que nadie guarde.
struct Racing<R> {
  inner: R,
  barrier: Barrier,
  reads: AtomicUsize,
}

impl<R> Racing<R> {
  fn new(inner: R) -> Self {
    Racing { inner, barrier: Barrier::new(2), reads: AtomicUsize::new(0) }
  }

  fn wait_on_first_reads(&self) {
    if self.reads.fetch_add(1, Ordering::SeqCst) < 2 {
      self.barrier.wait();
    }
  }
}

impl<R: ProducerRepository> ProducerRepository for Racing<R> {
  fn find_by_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    let found = self.inner.find_by_code(code)?;
    self.wait_on_first_reads();
    Ok(found)
  }

  fn save(&self, producer: &Producer) -> Result<Producer, RepoError> {
    self.inner.save(producer)
  }

  fn find_recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    self.inner.find_recent_tracks(limit)
  }
}

impl<R: ArtistRepository> ArtistRepository for Racing<R> {
  fn find_by_name(&self, name: &ArtistName) -> Result<Option<Artist>, RepoError> {
    let found = self.inner.find_by_name(name)?;
    self.wait_on_first_reads();
    Ok(found)
  }

  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    self.inner.find_by_id(id)
  }

  fn save(&self, artist: &Artist) -> Result<Artist, RepoError> {
    self.inner.save(artist)
  }
}

fn race<R>(repo: R, first: &'static str, second: &'static str) -> (Arc<RecordingChannel>, Vec<ProducerSnapshot>)
where
  R: ProducerRepository + 'static,
{
  let channel = Arc::new(RecordingChannel::default());
  let service =
    Arc::new(ProducerService::new(Racing::new(repo), StaticMetadata::crediting(&["The Testers"]), channel.clone()));

  let handles: Vec<_> = [first, second]
    .into_iter()
    .map(|isrc| {
      let service = service.clone();
      thread::spawn(move || futures::executor::block_on(service.register_track(isrc, None)))
    })
    .collect();

  let snapshots = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
  (channel, snapshots)
}

fn assert_same_isrc_publishes_once<R>(repo: Arc<R>)
where
  R: ProducerRepository + 'static,
{
  let (channel, snapshots) = race(repo.clone(), "DEU630901306", "DEU630901306");

  assert_eq!(snapshots[0].id, snapshots[1].id);
  assert_eq!(channel.take().len(), 1);

  let producer = repo.find_by_code(&ProducerCode::new("DEU63").unwrap()).unwrap().unwrap();
  assert_eq!(producer.tracks().len(), 1);
}

fn assert_known_producer_publishes_once<R>(repo: Arc<R>)
where
  R: ProducerRepository + 'static,
{
  let code = ProducerCode::new("DEU63").unwrap();
  let mut seeded = Producer::create(code.clone());
  let seed = Track::new(Isrc::new("DEU630901300").unwrap(), "Seed", vec![], vec![Source::manual("m-1").unwrap()], 1);
  seeded.add_track(seed.unwrap()).unwrap();
  repo.save(&seeded).unwrap();

  let (channel, snapshots) = race(repo.clone(), "DEU630901306", "DEU630901306");

  assert!(snapshots.iter().all(|s| s.id == seeded.id()));
  assert_eq!(channel.take().len(), 1);
  assert_eq!(repo.find_by_code(&code).unwrap().unwrap().tracks().len(), 2);
}

fn assert_distinct_isrcs_both_land<R>(repo: Arc<R>)
where
  R: ProducerRepository + 'static,
{
  let (channel, _) = race(repo.clone(), "DEU630901306", "DEU630901307");

  let mut published: Vec<_> = channel.take().into_iter().map(|e| e.isrc).collect();
  published.sort();
  assert_eq!(published, ["DEU630901306", "DEU630901307"]);

  let producer = repo.find_by_code(&ProducerCode::new("DEU63").unwrap()).unwrap().unwrap();
  assert_eq!(producer.tracks().len(), 2);
}

#[test]
fn in_memory_same_isrc_publishes_once() {
  assert_same_isrc_publishes_once(Arc::new(InMemoryStore::new()));
}

#[test]
fn sqlite_same_isrc_publishes_once() {
  let (_tmp, store) = sqlite_store();
  assert_same_isrc_publishes_once(Arc::new(store));
}

#[test]
fn in_memory_distinct_isrcs_both_land() {
  assert_distinct_isrcs_both_land(Arc::new(InMemoryStore::new()));
}

#[test]
fn sqlite_distinct_isrcs_both_land() {
  let (_tmp, store) = sqlite_store();
  assert_distinct_isrcs_both_land(Arc::new(store));
}

#[test]
fn in_memory_known_producer_publishes_once() {
  assert_known_producer_publishes_once(Arc::new(InMemoryStore::new()));
}

#[test]
fn sqlite_known_producer_publishes_once() {
  let (_tmp, store) = sqlite_store();
  assert_known_producer_publishes_once(Arc::new(store));
}

/// Dos créditos simultáneos para un artista que aún no existe.
fn assert_new_artist_converges<R>(repo: Arc<R>)
where
  R: ArtistRepository + 'static,
{
  let service = Arc::new(ArtistTrackingService::new(Racing::new(repo.clone())));
  let name = ArtistName::new("The Testers").unwrap();

  let handles: Vec<_> = ["DEU630901306", "DEU630901307"]
    .into_iter()
    .map(|raw| {
      let (service, name) = (service.clone(), name.clone());
      thread::spawn(move || service.record_track(&name, &Isrc::new(raw).unwrap(), "Test Song"))
    })
    .collect();
  let created: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap().unwrap().1).collect();

  assert_eq!(created.iter().filter(|c| **c).count(), 1);
  let artist = repo.find_by_name(&name).unwrap().unwrap();
  let references: Vec<_> = artist.track_references().iter().map(Isrc::as_str).collect();
  assert_eq!(references, ["DEU630901306", "DEU630901307"]);
  assert_eq!(artist.contributions().len(), 2);
}

#[test]
fn in_memory_new_artist_converges() {
  assert_new_artist_converges(Arc::new(InMemoryStore::new()));
}

#[test]
fn sqlite_new_artist_converges() {
  let (_tmp, store) = sqlite_store();
  assert_new_artist_converges(Arc::new(store));
}
