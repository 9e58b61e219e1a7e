pub mod artist_enrichment_service;
pub mod artist_tracking_service;
pub mod producer_service;

pub use artist_enrichment_service::ArtistEnrichmentService;
pub use artist_tracking_service::{ArtistTrackingService, TrackingOutcome};
pub use producer_service::{MAX_SAVE_ATTEMPTS, ProducerService};
