use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use musichub_core::domain::{Artist, ArtistId, ArtistName, Producer, ProducerCode, ProducerId, Track, TrackInfo};

use crate::merge;
use musichub_core::ports::{ArtistRepository, MAX_RECENT_TRACKS, ProducerRepository, RepoError};

/// Pista almacenada junto a su número de inserción, que desempata el orden
/// de "recientes" dentro del mismo segundo.
#[derive(Debug, Clone)]
struct StoredTrack {
  seq: u64,
  track: Track,
}

#[derive(Debug, Clone)]
struct StoredProducer {
  code: ProducerCode,
  name: Option<String>,
  tracks: Vec<StoredTrack>,
}

#[derive(Default)]
struct State {
  producers: HashMap<ProducerId, StoredProducer>,
  producer_by_code: HashMap<ProducerCode, ProducerId>,
  artists: HashMap<ArtistId, Artist>,
  artist_by_name: BTreeMap<ArtistName, ArtistId>,
  next_seq: u64,
}

/// Repositorios en memoria con la misma semántica que [`crate::SqliteStore`].
///
/// Útil en tests y para ejecuciones efímeras. Un único mutex serializa todas
/// las escrituras.
#[derive(Default)]
pub struct InMemoryStore {
  state: Mutex<State>,
}

impl InMemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> Result<MutexGuard<'_, State>, RepoError> {
    self.state.lock().map_err(|_| RepoError::Storage("in-memory store lock poisoned".into()))
  }
}

fn rebuild_producer(id: ProducerId, stored: &StoredProducer) -> Result<Producer, RepoError> {
  let tracks = stored.tracks.iter().map(|t| t.track.clone()).collect();
  Producer::restore(id, stored.code.clone(), stored.name.clone(), tracks).map_err(|e| RepoError::Storage(e.to_string()))
}

impl ProducerRepository for InMemoryStore {
  fn find_by_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    let state = self.lock()?;
    state
      .producer_by_code
      .get(code)
      .and_then(|id| state.producers.get(id).map(|stored| (*id, stored)))
      .map(|(id, stored)| rebuild_producer(id, stored))
      .transpose()
  }

  fn save(&self, producer: &Producer) -> Result<Producer, RepoError> {
    let mut state = self.lock()?;
    let id = producer.id();
    let code = producer.producer_code().clone();

    if let Some(owner) = state.producer_by_code.get(&code).filter(|owner| **owner != id) {
      return Err(RepoError::Conflict(format!("producer code {code} already belongs to {owner}")));
    }

    // Se valida todo antes de tocar el estado: un conflicto no deja escrituras a medias.
    let current = state.producers.get(&id);
    let stored_track = |track: &Track| current.and_then(|c| c.tracks.iter().find(|s| s.track == *track));
    if let Some(track) = producer.added_tracks().find(|t| stored_track(*t).is_some()) {
      return Err(RepoError::Conflict(format!("track {} is already registered", track.isrc())));
    }
    let updated = producer
      .changed_tracks()
      .map(|track| {
        let existing = stored_track(track)
          .ok_or_else(|| RepoError::Storage(format!("updated track {} is not stored", track.isrc())))?;
        merge::track(&existing.track, track).map_err(|e| RepoError::Storage(e.to_string()))
      })
      .collect::<Result<Vec<_>, _>>()?;

    let mut next_seq = state.next_seq;
    let stored = state
      .producers
      .entry(id)
      .or_insert_with(|| StoredProducer { code: code.clone(), name: None, tracks: Vec::new() });
    stored.name = producer.name().map(str::to_string);

    for track in updated {
      if let Some(existing) = stored.tracks.iter_mut().find(|s| s.track == track) {
        existing.track = track;
      }
    }
    for track in producer.added_tracks() {
      next_seq += 1;
      stored.tracks.push(StoredTrack { seq: next_seq, track: track.clone() });
    }
    let saved = rebuild_producer(id, stored)?;

    state.next_seq = next_seq;
    state.producer_by_code.insert(code, id);
    Ok(saved)
  }

  fn find_recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    let state = self.lock()?;
    let mut all: Vec<&StoredTrack> = state.producers.values().flat_map(|p| p.tracks.iter()).collect();
    all.sort_by(|a, b| (b.track.registered_at(), b.seq).cmp(&(a.track.registered_at(), a.seq)));
    Ok(all.into_iter().take(limit.min(MAX_RECENT_TRACKS)).map(|s| TrackInfo::from_track(&s.track)).collect())
  }
}

impl ArtistRepository for InMemoryStore {
  fn find_by_name(&self, name: &ArtistName) -> Result<Option<Artist>, RepoError> {
    let state = self.lock()?;
    Ok(state.artist_by_name.get(name).and_then(|id| state.artists.get(id)).cloned())
  }

  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    Ok(self.lock()?.artists.get(&id).cloned())
  }

  fn save(&self, artist: &Artist) -> Result<Artist, RepoError> {
    let mut state = self.lock()?;
    let id = artist.id();

    let merged = match state.artists.get(&id) {
      Some(current) => merge::artist(current, artist),
      None => Artist::restore(
        id,
        artist.name().clone(),
        artist.status(),
        artist.track_references().clone(),
        artist.sources().to_vec(),
        artist.contributions().to_vec(),
      ),
    };

    if let Some(owner) = state.artist_by_name.get(merged.name()).filter(|owner| **owner != id) {
      let name = merged.name().as_str();
      return Err(RepoError::Conflict(format!("artist name {name:?} already belongs to {owner}")));
    }

    if let Some(previous) = state.artists.get(&id).map(|a| a.name().clone()) {
      state.artist_by_name.remove(&previous);
    }
    state.artist_by_name.insert(merged.name().clone(), id);
    state.artists.insert(id, merged.clone());
    Ok(merged)
  }
}
