use crate::domain::TrackWasRegistered;
use crate::ports::PortError;

/// Nombre lógico del canal de pistas registradas.
pub const TRACK_REGISTERED_CHANNEL: &str = "track-registered";

/// Canal de salida de eventos de dominio, independiente del transporte.
///
/// Publicar sin suscriptores no es un error.
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
  async fn publish(&self, event: TrackWasRegistered) -> Result<(), PortError>;
}

#[async_trait::async_trait]
impl<T: MessageChannel + ?Sized> MessageChannel for std::sync::Arc<T> {
  async fn publish(&self, event: TrackWasRegistered) -> Result<(), PortError> {
    (**self).publish(event).await
  }
}
