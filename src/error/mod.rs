use crate::config::ConfigError;
use crate::state::StateError;
use thiserror::Error;

pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

#[derive(Debug, Error)]
pub enum OverlayError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
