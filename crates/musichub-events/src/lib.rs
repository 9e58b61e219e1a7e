pub mod channel;
pub mod config;
pub mod consumer;
pub mod error;

pub use channel::{BroadcastChannel, Subscription};
pub use config::EventsConfig;
pub use consumer::{ArtistEventConsumer, ConsumerReport};
pub use error::EventsError;
