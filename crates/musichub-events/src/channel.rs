use std::sync::Arc;

use musichub_core::domain::TrackWasRegistered;
use musichub_core::ports::{MessageChannel, PortError, TRACK_REGISTERED_CHANNEL};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::config::EventsConfig;
use crate::error::EventsError;

/// Canal `track-registered` en proceso, sobre `tokio::sync::broadcast`.
///
/// Cada suscriptor recibe todos los eventos publicados después de
/// suscribirse. Publicar sin suscriptores no es un error: el evento se
/// descarta.
#[derive(Debug, Clone)]
pub struct BroadcastChannel {
  sender: broadcast::Sender<Arc<TrackWasRegistered>>,
}

impl BroadcastChannel {
  pub fn new(capacity: usize) -> Result<Self, EventsError> {
    if capacity == 0 {
      return Err(EventsError::InvalidCapacity(capacity));
    }
    let (sender, _) = broadcast::channel(capacity);
    Ok(Self { sender })
  }

  pub fn from_config(config: &EventsConfig) -> Result<Self, EventsError> {
    Self::new(config.capacity)
  }

  pub fn subscribe(&self) -> Subscription {
    Subscription { receiver: self.sender.subscribe() }
  }

  pub fn subscriber_count(&self) -> usize {
    self.sender.receiver_count()
  }
}

#[async_trait::async_trait]
impl MessageChannel for BroadcastChannel {
  async fn publish(&self, event: TrackWasRegistered) -> Result<(), PortError> {
    let isrc = event.isrc.clone();
    match self.sender.send(Arc::new(event)) {
      Ok(receivers) => trace!(channel = TRACK_REGISTERED_CHANNEL, %isrc, receivers, "event dispatched"),
      Err(_) => trace!(channel = TRACK_REGISTERED_CHANNEL, %isrc, "event dropped: no active subscribers"),
    }
    Ok(())
  }
}

/// Extremo receptor de un [`BroadcastChannel`].
#[derive(Debug)]
pub struct Subscription {
  receiver: broadcast::Receiver<Arc<TrackWasRegistered>>,
}

impl Subscription {
  /// Siguiente evento, o `None` cuando todos los emisores se cerraron.
  ///
  /// Si el suscriptor se quedó atrás, los eventos perdidos se cuentan y se
  /// sigue desde el más antiguo que aún está en el buffer.
  pub async fn recv(&mut self) -> Option<Arc<TrackWasRegistered>> {
    let mut skipped = 0u64;

    loop {
      match self.receiver.recv().await {
        Ok(event) => {
          if skipped > 0 {
            warn!(channel = TRACK_REGISTERED_CHANNEL, skipped, "subscriber lagged; events were lost");
          }
          return Some(event);
        }
        Err(broadcast::error::RecvError::Lagged(n)) => {
          skipped = skipped.saturating_add(n);
          debug!(channel = TRACK_REGISTERED_CHANNEL, skipped = n, total_skipped = skipped, "subscriber lagged");
        }
        Err(broadcast::error::RecvError::Closed) => return None,
      }
    }
  }
}
