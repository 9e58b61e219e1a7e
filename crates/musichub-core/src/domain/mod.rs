pub mod artist;
pub mod artist_name;
pub mod events;
pub mod ids;
pub mod isrc;
pub mod producer;
pub mod producer_code;
pub mod source;
pub mod status;
pub mod track;

pub use artist::{Artist, Contribution, ExternalArtist};
pub use artist_name::ArtistName;
pub use events::{CreditPayload, SourcePayload, TrackWasRegistered};
pub use ids::{ArtistId, ProducerId, TrackId};
pub use isrc::Isrc;
pub use producer::{Producer, ProducerSnapshot};
pub use producer_code::ProducerCode;
pub use source::{Source, SourceType};
pub use status::VerificationStatus;
pub use track::{ArtistCredit, Track, TrackInfo, TrackUpdate};
