use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown scene id '{0}'")]
    UnknownScene(String),

    #[error("a path needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("flow field resolution must be positive and finite, got {0}")]
    InvalidResolution(f64),

    #[error("flow field of {cols}x{rows}x{layers} cells exceeds the {max} cell limit")]
    FieldTooLarge {
        cols: usize,
        rows: usize,
        layers: usize,
        max: usize,
    },

    #[error("extent components must be positive and finite")]
    InvalidExtent,

    #[error("radius must be non-negative and finite, got {0}")]
    InvalidRadius(f64),

    #[error("vehicle index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("scene '{scene}' does not take these parameters")]
    ParamsMismatch { scene: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
