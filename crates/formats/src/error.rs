use foundation::position::Position;

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("invalid map config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("map config zoom range {min}..={max} is empty")]
    ZoomRange { min: i32, max: i32 },
    #[error("selection size must be positive and finite, got {0}")]
    SelectionSize(f64),
    #[error("default centre {0} lies outside the world")]
    DefaultCentre(Position),
}
