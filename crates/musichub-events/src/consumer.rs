use std::sync::Arc;

use musichub_core::domain::{ArtistId, TrackWasRegistered};
use musichub_core::ports::ArtistRepository;
use musichub_core::services::{ArtistEnrichmentService, ArtistTrackingService};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::channel::Subscription;
use crate::config::EventsConfig;

/// Resumen de una ejecución del consumidor, devuelto cuando el canal se cierra.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsumerReport {
  pub events: usize,
  pub artists_created: usize,
  pub artists_updated: usize,
  pub credits_skipped: usize,
  pub enrichments: usize,
  pub enrichment_failures: usize,
}

/// Consumidor del contexto de artistas para `track-registered`.
///
/// Por cada evento anota la pista en sus artistas y, si hay un servicio de
/// enriquecimiento, lanza en segundo plano el enriquecimiento de cada
/// artista recién creado. Un fallo nunca detiene el bucle.
pub struct ArtistEventConsumer<R>
where
  R: ArtistRepository + 'static,
{
  tracking: Arc<ArtistTrackingService<R>>,
  enrichment: Option<Arc<ArtistEnrichmentService<R>>>,
}

impl<R> ArtistEventConsumer<R>
where
  R: ArtistRepository + 'static,
{
  pub fn new(tracking: ArtistTrackingService<R>) -> Self {
    Self { tracking: Arc::new(tracking), enrichment: None }
  }

  /// Activa el enriquecimiento de artistas nuevos, con el límite por
  /// consulta de `config.lookup_timeout_ms` si lo hay.
  pub fn with_enrichment(mut self, enrichment: ArtistEnrichmentService<R>, config: &EventsConfig) -> Self {
    let enrichment = match config.lookup_timeout() {
      Some(limit) => enrichment.with_lookup_timeout(limit),
      None => enrichment,
    };
    self.enrichment = Some(Arc::new(enrichment));
    self
  }

  pub fn spawn(self, subscription: Subscription) -> JoinHandle<ConsumerReport> {
    tokio::spawn(self.run(subscription).instrument(info_span!("artist_event_consumer")))
  }

  /// Procesa eventos hasta que el canal se cierra y espera a que terminen
  /// los enriquecimientos pendientes.
  pub async fn run(self, mut subscription: Subscription) -> ConsumerReport {
    let mut report = ConsumerReport::default();
    let mut pending: JoinSet<bool> = JoinSet::new();

    while let Some(event) = subscription.recv().await {
      report.events += 1;
      for id in self.handle(&event, &mut report).await {
        self.schedule_enrichment(id, &mut pending);
      }
      while let Some(done) = pending.try_join_next() {
        record_enrichment(done, &mut report);
      }
    }

    while let Some(done) = pending.join_next().await {
      record_enrichment(done, &mut report);
    }
    info!(
      events = report.events,
      created = report.artists_created,
      enrichments = report.enrichments,
      "track-registered channel closed"
    );
    report
  }

  async fn handle(&self, event: &TrackWasRegistered, report: &mut ConsumerReport) -> Vec<ArtistId> {
    match self.tracking.handle_track_registered(event).await {
      Ok(outcome) => {
        report.artists_created += outcome.created.len();
        report.artists_updated += outcome.updated.len();
        report.credits_skipped += outcome.skipped;
        outcome.created
      }
      Err(e) => {
        warn!(isrc = %event.isrc, error = %e, "dropping track-registered event");
        Vec::new()
      }
    }
  }

  fn schedule_enrichment(&self, id: ArtistId, pending: &mut JoinSet<bool>) {
    let Some(enrichment) = self.enrichment.clone() else {
      return;
    };
    debug!(artist_id = %id, "scheduling enrichment for new artist");
    pending.spawn(
      async move {
        match enrichment.enrich_by_id(id).await {
          Ok(artist) => {
            debug!(artist_id = %id, status = %artist.status(), "enrichment finished");
            true
          }
          Err(e) => {
            warn!(artist_id = %id, error = %e, "enrichment failed");
            false
          }
        }
      }
      .in_current_span(),
    );
  }
}

fn record_enrichment(done: Result<bool, tokio::task::JoinError>, report: &mut ConsumerReport) {
  match done {
    Ok(true) => report.enrichments += 1,
    Ok(false) => report.enrichment_failures += 1,
    Err(e) => {
      warn!(error = %e, "enrichment task aborted");
      report.enrichment_failures += 1;
    }
  }
}
