//! Joke API client.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const FALLBACK_SETUP: &str = "Oops!";
pub const FALLBACK_PUNCHLINE: &str = "Failed to fetch a joke.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub setup: String,
    pub punchline: String,
}

impl Joke {
    pub fn new(setup: impl Into<String>, punchline: impl Into<String>) -> Self {
        Self {
            setup: setup.into(),
            punchline: punchline.into(),
        }
    }

    /// Shown in place of a real joke whenever fetching fails.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SETUP, FALLBACK_PUNCHLINE)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JokeError {
    #[error("joke request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("joke API returned status: {0}")]
    Status(StatusCode),
    #[error("joke API response is not a joke: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One GET per call, no retry, no caching.
#[derive(Clone)]
pub struct JokeFetcher {
    client: reqwest::Client,
    endpoint: String,
}

impl JokeFetcher {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn try_fetch(&self) -> Result<Joke, JokeError> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(JokeError::Status(response.status()));
        }

        let body = response.text().await?;
        let joke: Joke = serde_json::from_str(&body)?;
        debug!("[joke] fetched {:?}", joke.setup);
        Ok(joke)
    }

    /// Never fails: any error becomes [`Joke::fallback`].
    pub async fn fetch(&self) -> Joke {
        match self.try_fetch().await {
            Ok(joke) => joke,
            Err(e) => {
                warn!("[joke] {} ({})", e, self.endpoint);
                Joke::fallback()
            }
        }
    }
}
