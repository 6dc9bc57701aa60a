// Simulation error types: configuration, input validation, map loading

use thiserror::Error;

/// Errors raised by the agent core and its environment collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Occupancy surface has no pixels ({width}x{height})")]
    InvalidSurface { width: u32, height: u32 },
    #[error("Failed to load map: {0}")]
    MapLoad(String),
    #[error("Agent {0} is destroyed")]
    AgentDestroyed(u32),
}

pub type Result<T> = std::result::Result<T, SimError>;
