use serde::{Deserialize, Serialize};

use crate::domain::{ids::ProducerId, track::Track};

/// Crédito tal como viaja en el evento.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPayload {
  pub name: String,
  pub id: Option<String>,
}

/// Fuente tal como viaja en el evento: `name` es el tipo (`"SPOTIFY"`…).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePayload {
  pub name: String,
  pub id: String,
}

/// Hecho inmutable: una pista se registró por primera vez.
///
/// Se publica como mucho una vez por ISRC distinto, y siempre después de que
/// el productor se haya guardado. Sólo lleva tipos planos para que cualquier
/// contexto pueda consumirlo sin depender del modelo del productor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackWasRegistered {
  pub isrc: String,
  pub title: String,
  pub producer_id: String,
  pub artist_credits: Vec<CreditPayload>,
  pub sources: Vec<SourcePayload>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub correlation_id: Option<String>,
}

impl TrackWasRegistered {
  pub fn from_track(track: &Track, producer_id: ProducerId, correlation_id: Option<&str>) -> Self {
    TrackWasRegistered {
      isrc: track.isrc().to_string(),
      title: track.title().to_string(),
      producer_id: producer_id.to_string(),
      artist_credits: track
        .artist_credits()
        .iter()
        .map(|c| CreditPayload { name: c.name.to_string(), id: c.artist_id.map(|id| id.to_string()) })
        .collect(),
      sources: track
        .sources()
        .iter()
        .map(|s| SourcePayload { name: s.source_type().to_string(), id: s.source_id().to_string() })
        .collect(),
      correlation_id: correlation_id.map(str::to_string),
    }
  }

  pub fn artist_names(&self) -> impl Iterator<Item = &str> {
    self.artist_credits.iter().map(|c| c.name.as_str())
  }
}
