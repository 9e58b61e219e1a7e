use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventsError {
  #[error("channel capacity must be at least 1 (got {0})")]
  InvalidCapacity(usize),
}
