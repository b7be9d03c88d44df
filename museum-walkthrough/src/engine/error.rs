use thiserror::Error;

/// Content errors found while validating a layout manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout does not name a model file")]
    MissingModel,
    #[error("door id `{0}` is declared more than once")]
    DuplicateDoor(String),
    #[error("trigger `{trigger}` references unknown door `{door}`")]
    UnknownTriggerDoor { trigger: String, door: String },
    #[error("exhibit mesh `{0}` is declared more than once")]
    DuplicateExhibit(String),
    #[error("variant name `{0}` contains characters outside [a-z0-9_-]")]
    InvalidVariant(String),
}

/// Failures that stop the museum scene from being wired up.
#[derive(Debug, Error)]
pub enum SceneSetupError {
    #[error("mesh `{0}` not found in scene")]
    MissingMesh(String),
    #[error("material `{0}` not found in scene")]
    MissingMaterial(String),
    #[error("model `{0}` contains no scene")]
    NoScene(String),
    #[error("door animation `{clip}` could not be built: {reason}")]
    DoorAnimation { clip: String, reason: String },
    #[error("failed to load `{path}`: {reason}")]
    AssetLoad { path: String, reason: String },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
