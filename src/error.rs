use thiserror::Error;

/// Failures while bringing up or tearing down the audio output.
///
/// Nothing on the render path returns an error: bad parameters are clamped
/// at the store and bad samples are replaced by silence.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no default audio output device")]
    NoOutputDevice,

    #[error("output device does not support {0}")]
    UnsupportedConfig(String),

    #[error("failed to query output configurations")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error("failed to build output stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to pause output stream")]
    PauseStream(#[from] cpal::PauseStreamError),
}
