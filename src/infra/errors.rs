// src/infra/errors.rs — Error types for kotoba

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KotobaError {
    // Anything that goes wrong talking to the model gateway: transport
    // failure, non-success status, or output that fails to parse. The
    // message is for operator logs only, never for API responses.
    #[error("Gateway error: {message}")]
    Gateway { message: String },
}

impl KotobaError {
    pub fn gateway(message: impl Into<String>) -> Self {
        KotobaError::Gateway {
            message: message.into(),
        }
    }
}
