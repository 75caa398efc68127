use std::fmt;

/// Initialization step that failed while opening a [`crate::Shim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStage {
    Options,
    Window,
    Renderer,
    Texture,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InitStage::Options => "validate options",
            InitStage::Window => "create window",
            InitStage::Renderer => "create renderer",
            InitStage::Texture => "create texture",
        })
    }
}

/// Fatal initialization failure. There is no retry path.
#[derive(Debug)]
pub struct InitError {
    pub stage: InitStage,
    pub source: anyhow::Error,
}

impl InitError {
    pub fn new(stage: InitStage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to {}: {:#}", self.stage, self.source)
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}
