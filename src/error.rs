use thiserror::Error;

use crate::flow::FlowError;
use crate::prefetch::PrefetchError;
use crate::wizard::WizardError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid flow: {0}")]
    Flow(#[from] FlowError),

    #[error("Prefetch setup failed: {0}")]
    Prefetch(#[from] PrefetchError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
