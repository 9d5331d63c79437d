use thiserror::Error;

#[derive(Debug, Error)]
pub enum RankError {
    #[error("Unknown identity '{0}': it was never observed")]
    UnknownIdentity(String),

    #[error("Identity capacity of {capacity} exhausted, cannot register '{id}'")]
    CapacityExceeded { capacity: usize, id: String },

    #[error("Invalid ranking configuration: {0}")]
    InvalidConfig(String),

    #[error("Model failure: {0}")]
    Model(#[from] candle_core::Error),

    #[error("Ranking engine lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, RankError>;
