pub type ChoreoResult<T> = Result<T, ChoreoError>;

#[derive(thiserror::Error, Debug)]
pub enum ChoreoError {
    #[error("config error: {0}")]
    Config(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("evaluation error: {0}")]
    Evaluation(String),

    #[error("scene error: {0}")]
    Scene(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChoreoError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }
}
