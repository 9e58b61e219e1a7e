use std::collections::BTreeSet;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};
use uuid::Uuid;

use musichub_core::domain::{
  Artist, ArtistCredit, ArtistId, ArtistName, Contribution, Isrc, Producer, ProducerCode, ProducerId, Source,
  SourceType, Track, TrackId, TrackInfo, VerificationStatus,
};
use musichub_core::ports::{ArtistRepository, MAX_RECENT_TRACKS, ProducerRepository, RepoError};

use crate::config::StorageConfig;
use crate::error::StorageError;
use crate::merge;
use crate::models::{
  ArtistRow, ArtistSourceRow, ContributionRow, NewArtistRow, NewProducerRow, NewTrackRow, ProducerRow,
  TrackReferenceRow, TrackRow,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const JOURNAL_MODES: [&str; 6] = ["DELETE", "TRUNCATE", "PERSIST", "MEMORY", "WAL", "OFF"];

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Pragmas aplicados a cada conexión que entra al pool.
#[derive(Debug)]
struct Pragmas {
  busy_timeout_ms: u32,
  journal_mode: Option<&'static str>,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for Pragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    let mut sql = format!("PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON;", self.busy_timeout_ms);
    if let Some(mode) = self.journal_mode {
      sql.push_str(&format!(" PRAGMA journal_mode = {mode};"));
    }
    conn.batch_execute(&sql).map_err(diesel::r2d2::Error::QueryError)
  }
}

fn journal_mode(raw: Option<&str>) -> Result<Option<&'static str>, StorageError> {
  let Some(raw) = raw else { return Ok(None) };
  JOURNAL_MODES
    .iter()
    .copied()
    .find(|m| m.eq_ignore_ascii_case(raw.trim()))
    .map(Some)
    .ok_or_else(|| StorageError::InvalidConfig(format!("unknown journal_mode {raw:?}")))
}

/// Repositorios de productores y artistas sobre un único archivo SQLite.
///
/// Cada `save` corre en una transacción `IMMEDIATE`, así que dos escritores
/// concurrentes se serializan y el segundo ve lo que escribió el primero.
#[derive(Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
}

impl SqliteStore {
  /// Abre (o crea) la base de datos y aplica las migraciones pendientes.
  pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
    let pragmas = Pragmas {
      busy_timeout_ms: config.busy_timeout_ms,
      journal_mode: journal_mode(config.journal_mode.as_deref())?,
    };
    if config.max_connections == 0 {
      return Err(StorageError::InvalidConfig("max_connections must be at least 1".into()));
    }
    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)
        .map_err(|e| StorageError::InvalidConfig(format!("create {}: {e}", parent.display())))?;
    }

    let url = config.db_path.to_string_lossy().into_owned();
    let manager = ConnectionManager::<SqliteConnection>::new(url);
    let pool = Pool::builder()
      .max_size(config.max_connections)
      .connection_customizer(Box::new(pragmas))
      .build(manager)?;

    let store = SqliteStore { pool };
    let mut conn = store.conn()?;
    let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| StorageError::Migration(e.to_string()))?;
    info!(db = %config.db_path.display(), migrations = applied.len(), "sqlite store ready");
    Ok(store)
  }

  fn conn(&self) -> Result<Conn, StorageError> {
    Ok(self.pool.get()?)
  }

  fn save_producer(&self, producer: &Producer) -> Result<Producer, StorageError> {
    let mut conn = self.conn()?;
    conn.immediate_transaction(|conn| {
      write_producer(conn, producer)?;
      load_producer(conn, producer.id())?
        .ok_or_else(|| StorageError::corrupt(format!("producer {} vanished after save", producer.id())))
    })
  }

  fn save_artist(&self, artist: &Artist) -> Result<Artist, StorageError> {
    let mut conn = self.conn()?;
    conn.immediate_transaction(|conn| {
      write_artist(conn, artist)?;
      load_artist(conn, artist.id())?
        .ok_or_else(|| StorageError::corrupt(format!("artist {} vanished after save", artist.id())))
    })
  }
}

// ---------------------------------------------------------------------------
// Productores
// ---------------------------------------------------------------------------

fn write_producer(conn: &mut SqliteConnection, producer: &Producer) -> Result<(), StorageError> {
  use crate::schema::producer_tracks::dsl as t;
  use crate::schema::producers::dsl as p;

  let id = producer.id().to_string();
  let owner: Option<String> = p::producers
    .filter(p::producer_code.eq(producer.producer_code().as_str()))
    .select(p::id)
    .first(conn)
    .optional()?;
  if let Some(owner) = owner.filter(|o| *o != id) {
    return Err(StorageError::Conflict(format!(
      "producer code {} already belongs to {owner}",
      producer.producer_code()
    )));
  }

  diesel::insert_into(p::producers)
    .values(&NewProducerRow { id: id.clone(), producer_code: producer.producer_code().as_str(), name: producer.name() })
    .on_conflict(p::id)
    .do_update()
    .set(p::name.eq(producer.name()))
    .execute(conn)?;

  // Sólo se escriben las pistas que el agregado tocó; nunca se borra ninguna.
  let mut written = 0;
  for track in producer.changed_tracks() {
    let stored: Option<TrackRow> = t::producer_tracks
      .filter(t::producer_id.eq(&id))
      .filter(t::isrc.eq(track.isrc().as_str()))
      .select(TrackRow::as_select())
      .first(conn)
      .optional()?;
    let Some(stored) = stored else {
      return Err(StorageError::corrupt(format!("updated track {} is not stored", track.isrc())));
    };

    let merged = merge::track(&track_from_row(stored)?, track).map_err(StorageError::corrupt)?;
    diesel::update(t::producer_tracks.filter(t::producer_id.eq(&id)).filter(t::isrc.eq(merged.isrc().as_str())))
      .set((
        t::title.eq(merged.title()),
        t::artist_credits.eq(serde_json::to_string(merged.artist_credits())?),
        t::sources.eq(serde_json::to_string(merged.sources())?),
        t::status.eq(merged.status().as_str()),
      ))
      .execute(conn)?;
    written += 1;
  }

  for track in producer.added_tracks() {
    let taken = diesel::select(diesel::dsl::exists(
      t::producer_tracks.filter(t::producer_id.eq(&id)).filter(t::isrc.eq(track.isrc().as_str())),
    ))
    .get_result::<bool>(conn)?;
    if taken {
      return Err(StorageError::Conflict(format!("track {} is already registered", track.isrc())));
    }
    diesel::insert_into(t::producer_tracks).values(&new_track_row(&id, track)?).execute(conn)?;
    written += 1;
  }

  debug!(producer_id = %id, tracks = written, "producer written");
  Ok(())
}

fn new_track_row<'a>(producer_id: &'a str, track: &'a Track) -> Result<NewTrackRow<'a>, StorageError> {
  Ok(NewTrackRow {
    producer_id,
    isrc: track.isrc().as_str(),
    title: track.title(),
    artist_credits: serde_json::to_string(track.artist_credits())?,
    sources: serde_json::to_string(track.sources())?,
    status: track.status().as_str(),
    registered_at: i64::try_from(track.registered_at())
      .map_err(|_| StorageError::corrupt(format!("registered_at out of range for {}", track.isrc())))?,
  })
}

fn load_producer(conn: &mut SqliteConnection, id: ProducerId) -> Result<Option<Producer>, StorageError> {
  use crate::schema::producers::dsl as p;

  let row = p::producers
    .filter(p::id.eq(id.to_string()))
    .select(ProducerRow::as_select())
    .first(conn)
    .optional()?;
  row.map(|row| producer_from_row(conn, row)).transpose()
}

fn producer_from_row(conn: &mut SqliteConnection, row: ProducerRow) -> Result<Producer, StorageError> {
  use crate::schema::producer_tracks::dsl as t;

  let track_rows: Vec<TrackRow> = t::producer_tracks
    .filter(t::producer_id.eq(&row.id))
    .select(TrackRow::as_select())
    .order(t::seq.asc())
    .load(conn)?;
  let tracks = track_rows.into_iter().map(track_from_row).collect::<Result<Vec<_>, _>>()?;

  let id = ProducerId::from_uuid(parse_uuid(&row.id)?);
  let code = ProducerCode::new(&row.producer_code).map_err(StorageError::corrupt)?;
  Producer::restore(id, code, row.name, tracks).map_err(StorageError::corrupt)
}

fn track_from_row(row: TrackRow) -> Result<Track, StorageError> {
  let isrc = Isrc::new(&row.isrc).map_err(StorageError::corrupt)?;
  let credits: Vec<ArtistCredit> = serde_json::from_str(&row.artist_credits)?;
  let sources: Vec<Source> = serde_json::from_str(&row.sources)?;
  let status: VerificationStatus = row.status.parse().map_err(StorageError::corrupt)?;
  let registered_at = u64::try_from(row.registered_at)
    .map_err(|_| StorageError::corrupt(format!("negative registered_at for {}", row.isrc)))?;

  let track = Track::new(isrc, &row.title, credits, sources, registered_at).map_err(StorageError::corrupt)?;
  Ok(track.with_status(status))
}

impl ProducerRepository for SqliteStore {
  fn find_by_code(&self, code: &ProducerCode) -> Result<Option<Producer>, RepoError> {
    use crate::schema::producers::dsl as p;

    let mut conn = self.conn()?;
    let row = p::producers
      .filter(p::producer_code.eq(code.as_str()))
      .select(ProducerRow::as_select())
      .first(&mut *conn)
      .optional()
      .map_err(StorageError::from)?;
    Ok(row.map(|row| producer_from_row(&mut conn, row)).transpose()?)
  }

  fn save(&self, producer: &Producer) -> Result<Producer, RepoError> {
    Ok(self.save_producer(producer)?)
  }

  fn find_recent_tracks(&self, limit: usize) -> Result<Vec<TrackInfo>, RepoError> {
    use crate::schema::producer_tracks::dsl as t;

    let limit = limit.min(MAX_RECENT_TRACKS) as i64;
    let mut conn = self.conn()?;
    let rows: Vec<TrackRow> = t::producer_tracks
      .select(TrackRow::as_select())
      .order((t::registered_at.desc(), t::seq.desc()))
      .limit(limit)
      .load(&mut *conn)
      .map_err(StorageError::from)?;

    let tracks = rows.into_iter().map(track_from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(tracks.iter().map(TrackInfo::from_track).collect())
  }
}

// ---------------------------------------------------------------------------
// Artistas
// ---------------------------------------------------------------------------

fn write_artist(conn: &mut SqliteConnection, artist: &Artist) -> Result<(), StorageError> {
  use crate::schema::artist_contributions::dsl as c;
  use crate::schema::artist_sources::dsl as s;
  use crate::schema::artist_track_references::dsl as r;
  use crate::schema::artists::dsl as a;

  let id = artist.id().to_string();
  let stored = load_artist(conn, artist.id())?;
  let merged = match &stored {
    Some(stored) => merge::artist(stored, artist),
    None => artist.clone(),
  };

  let name = merged.name().as_str();
  let owner: Option<String> = a::artists.filter(a::name.eq(name)).select(a::id).first(conn).optional()?;
  if let Some(owner) = owner.filter(|o| *o != id) {
    return Err(StorageError::Conflict(format!("artist name {name:?} already belongs to {owner}")));
  }

  if stored.is_some() {
    diesel::update(a::artists.filter(a::id.eq(&id)))
      .set((a::name.eq(name), a::status.eq(merged.status().as_str())))
      .execute(conn)?;
  } else {
    diesel::insert_into(a::artists)
      .values(&NewArtistRow { id: id.clone(), name, status: merged.status().as_str() })
      .execute(conn)?;
  }

  for isrc in artist.track_references() {
    diesel::insert_or_ignore_into(r::artist_track_references)
      .values(&TrackReferenceRow { artist_id: &id, isrc: isrc.as_str() })
      .execute(conn)?;
  }

  for contribution in artist.contributions() {
    diesel::insert_or_ignore_into(c::artist_contributions)
      .values(&ContributionRow {
        artist_id: id.clone(),
        isrc: contribution.isrc.to_string(),
        track_id: contribution.track_id.to_string(),
        title: contribution.title.clone(),
      })
      .execute(conn)?;
  }

  // Las fuentes almacenadas conservan su posición; las nuevas van detrás.
  let kept = stored.as_ref().map_or(0, |stored| stored.sources().len());
  for (position, source) in merged.sources().iter().enumerate().skip(kept) {
    diesel::insert_into(s::artist_sources)
      .values(&ArtistSourceRow {
        artist_id: id.clone(),
        position: position as i32,
        source_type: source.source_type().as_str().to_string(),
        source_id: source.source_id().to_string(),
      })
      .execute(conn)?;
  }

  debug!(artist_id = %id, name, "artist written");
  Ok(())
}

fn load_artist(conn: &mut SqliteConnection, id: ArtistId) -> Result<Option<Artist>, StorageError> {
  use crate::schema::artists::dsl as a;

  let row =
    a::artists.filter(a::id.eq(id.to_string())).select(ArtistRow::as_select()).first(conn).optional()?;
  row.map(|row| artist_from_row(conn, row)).transpose()
}

fn artist_from_row(conn: &mut SqliteConnection, row: ArtistRow) -> Result<Artist, StorageError> {
  use crate::schema::artist_contributions::dsl as c;
  use crate::schema::artist_sources::dsl as s;
  use crate::schema::artist_track_references::dsl as r;

  let references: Vec<String> = r::artist_track_references.filter(r::artist_id.eq(&row.id)).select(r::isrc).load(conn)?;
  let references = references
    .iter()
    .map(|raw| Isrc::new(raw).map_err(StorageError::corrupt))
    .collect::<Result<BTreeSet<_>, _>>()?;

  let source_rows: Vec<ArtistSourceRow> = s::artist_sources
    .filter(s::artist_id.eq(&row.id))
    .select(ArtistSourceRow::as_select())
    .order(s::position.asc())
    .load(conn)?;
  let sources = source_rows
    .iter()
    .map(|src| {
      let source_type: SourceType = src.source_type.parse().map_err(StorageError::corrupt)?;
      Source::new(source_type, &src.source_id).map_err(StorageError::corrupt)
    })
    .collect::<Result<Vec<_>, _>>()?;

  let contribution_rows: Vec<ContributionRow> = c::artist_contributions
    .filter(c::artist_id.eq(&row.id))
    .select(ContributionRow::as_select())
    .order(c::isrc.asc())
    .load(conn)?;
  let contributions = contribution_rows
    .into_iter()
    .map(|contribution| {
      let isrc = Isrc::new(&contribution.isrc).map_err(StorageError::corrupt)?;
      let track_id = TrackId::from_uuid(parse_uuid(&contribution.track_id)?);
      Ok(Contribution { track_id, title: contribution.title, isrc })
    })
    .collect::<Result<Vec<_>, StorageError>>()?;

  let id = ArtistId::from_uuid(parse_uuid(&row.id)?);
  let name = ArtistName::new(&row.name).map_err(StorageError::corrupt)?;
  let status: VerificationStatus = row.status.parse().map_err(StorageError::corrupt)?;
  Ok(Artist::restore(id, name, status, references, sources, contributions))
}

impl ArtistRepository for SqliteStore {
  fn find_by_name(&self, name: &ArtistName) -> Result<Option<Artist>, RepoError> {
    use crate::schema::artists::dsl as a;

    let mut conn = self.conn()?;
    let row = a::artists
      .filter(a::name.eq(name.as_str()))
      .select(ArtistRow::as_select())
      .first(&mut *conn)
      .optional()
      .map_err(StorageError::from)?;
    Ok(row.map(|row| artist_from_row(&mut conn, row)).transpose()?)
  }

  fn find_by_id(&self, id: ArtistId) -> Result<Option<Artist>, RepoError> {
    let mut conn = self.conn()?;
    Ok(load_artist(&mut conn, id)?)
  }

  fn save(&self, artist: &Artist) -> Result<Artist, RepoError> {
    Ok(self.save_artist(artist)?)
  }
}

fn parse_uuid(raw: &str) -> Result<Uuid, StorageError> {
  Uuid::parse_str(raw).map_err(|e| StorageError::corrupt(format!("invalid uuid {raw:?}: {e}")))
}
