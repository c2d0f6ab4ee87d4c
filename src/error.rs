use thiserror::Error;

#[derive(Error, Debug)]
pub enum StargridError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StargridError>;

/// Turn any failure into the text shown in the error alert.
pub fn error_message(err: &StargridError) -> String {
    let message = err.to_string();
    let message = message.trim();
    // `Api("")` and friends still render their prefix, so check the payload too
    let payload_empty = match err {
        StargridError::Api(m) | StargridError::Auth(m) | StargridError::Config(m) => {
            m.trim().is_empty()
        }
        StargridError::Io(_) => false,
    };

    if message.is_empty() || payload_empty {
        "Erro desconhecido".to_string()
    } else {
        message.to_string()
    }
}
