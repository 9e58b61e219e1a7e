use crate::schema::{artist_contributions, artist_sources, artist_track_references, artists, producer_tracks, producers};

use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = producers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProducerRow {
  pub id: String,
  pub producer_code: String,
  pub name: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = producers)]
pub struct NewProducerRow<'a> {
  pub id: String,
  pub producer_code: &'a str,
  pub name: Option<&'a str>,
}

/// Una pista de productor. Créditos y fuentes van serializados en JSON.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = producer_tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackRow {
  pub seq: i64,
  pub producer_id: String,
  pub isrc: String,
  pub title: String,
  pub artist_credits: String,
  pub sources: String,
  pub status: String,
  pub registered_at: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = producer_tracks)]
pub struct NewTrackRow<'a> {
  pub producer_id: &'a str,
  pub isrc: &'a str,
  pub title: &'a str,
  pub artist_credits: String,
  pub sources: String,
  pub status: &'static str,
  pub registered_at: i64,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistRow {
  pub id: String,
  pub name: String,
  pub status: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = artists)]
pub struct NewArtistRow<'a> {
  pub id: String,
  pub name: &'a str,
  pub status: &'static str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = artist_track_references)]
pub struct TrackReferenceRow<'a> {
  pub artist_id: &'a str,
  pub isrc: &'a str,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = artist_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ArtistSourceRow {
  pub artist_id: String,
  pub position: i32,
  pub source_type: String,
  pub source_id: String,
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = artist_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContributionRow {
  pub artist_id: String,
  pub isrc: String,
  pub track_id: String,
  pub title: String,
}
