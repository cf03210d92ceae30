//! Study session: the inbound side of the gateway.
//!
//! A session forwards a learner's prompt (and optional image) to the shared
//! [`Gateway`], turns failures into user-facing messages, and applies the
//! cooldown after the provider reports rate limiting so the learner does not
//! hammer the API.

mod cooldown;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

use crate::gateway::{Gateway, GatewayError};

pub use cooldown::{Cooldown, DEFAULT_COOLDOWN, MAX_COOLDOWN};

/// Session errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Prompt is empty")]
    EmptyPrompt,
    #[error("Rate limited, retry in {wait_secs}s")]
    CoolingDown { wait_secs: u64 },
    /// Gateway failure other than rate limiting; [`StudySession::ask`]
    /// reports rate limiting as `CoolingDown` with the session's window.
    #[error(transparent)]
    Gateway(GatewayError),
}

impl From<GatewayError> for SessionError {
    /// Rate limiting outside a session maps to the default cooldown.
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RateLimited => SessionError::CoolingDown {
                wait_secs: DEFAULT_COOLDOWN.as_secs(),
            },
            other => SessionError::Gateway(other),
        }
    }
}

impl SessionError {
    /// Message suitable for showing to the learner as-is.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::EmptyPrompt => "Please enter a question first.".to_string(),
            SessionError::CoolingDown { wait_secs } => rate_limit_message(*wait_secs),
            SessionError::Gateway(GatewayError::RateLimited) => {
                rate_limit_message(DEFAULT_COOLDOWN.as_secs())
            }
            SessionError::Gateway(GatewayError::Unavailable) => {
                "No model is currently available. Please try again later.".to_string()
            }
            SessionError::Gateway(GatewayError::Unknown { message }) => {
                format!("Error: {}", message)
            }
        }
    }
}

fn rate_limit_message(wait_secs: u64) -> String {
    format!(
        "Rate limit reached. Please wait {} seconds before trying again.",
        wait_secs
    )
}

/// One learner's conversation with the gateway.
pub struct StudySession {
    id: Uuid,
    gateway: Arc<Gateway>,
    cooldown: Cooldown,
}

impl StudySession {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self::with_cooldown(gateway, DEFAULT_COOLDOWN)
    }

    pub fn with_cooldown(gateway: Arc<Gateway>, cooldown: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            gateway,
            cooldown: Cooldown::new(cooldown),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Ask the model and return its text.
    ///
    /// While the cooldown is running nothing is sent and the remaining wait
    /// is reported instead.
    pub async fn ask(
        &mut self,
        prompt: &str,
        image: Option<Vec<u8>>,
    ) -> Result<String, SessionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }

        if let Some(wait_secs) = self.cooldown.remaining_secs() {
            tracing::debug!(session = %self.id, wait_secs, "Request refused during cooldown");
            return Err(SessionError::CoolingDown { wait_secs });
        }

        match self.gateway.ask(prompt, image).await {
            Ok(response) => Ok(response.text),
            Err(GatewayError::RateLimited) => {
                self.cooldown.trigger();
                let wait_secs = cooldown::ceil_secs(self.cooldown.window());
                tracing::warn!(session = %self.id, wait_secs, "Rate limited, cooling down");
                Err(SessionError::CoolingDown { wait_secs })
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "Request failed: {}", e);
                Err(e.into())
            }
        }
    }
}
