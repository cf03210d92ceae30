//! Model selection with ordered fallback.

use std::sync::Arc;

use crate::model::ModelProvider;

use super::error::GatewayError;

/// Default candidates, primary first.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "gemini-1.5-flash",
    "gemini-1.5-flash-latest",
    "gemini-pro",
];

/// Ordered, non-empty list of candidate model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    candidates: Vec<String>,
}

impl ModelChoice {
    /// Build a choice from candidates in preference order.
    ///
    /// Blank identifiers are dropped. Returns `None` if nothing remains.
    pub fn new<I, S>(candidates: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let candidates: Vec<String> = candidates
            .into_iter()
            .map(Into::into)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if candidates.is_empty() {
            None
        } else {
            Some(Self { candidates })
        }
    }

    pub fn primary(&self) -> &str {
        &self.candidates[0]
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }
}

impl Default for ModelChoice {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Picks the first candidate whose probe call succeeds.
pub struct ModelSelector {
    provider: Arc<dyn ModelProvider>,
    choice: ModelChoice,
}

impl ModelSelector {
    pub fn new(provider: Arc<dyn ModelProvider>, choice: ModelChoice) -> Self {
        Self { provider, choice }
    }

    pub fn choice(&self) -> &ModelChoice {
        &self.choice
    }

    /// Probe candidates in order, once each.
    ///
    /// Every probe spends a little quota. Returns `Unavailable` when all fail.
    pub async fn select(&self) -> Result<String, GatewayError> {
        for candidate in self.choice.candidates() {
            match self.provider.probe(candidate).await {
                Ok(()) => {
                    tracing::info!(
                        provider = self.provider.name(),
                        model = %candidate,
                        "Selected model"
                    );
                    return Ok(candidate.clone());
                }
                Err(e) => {
                    tracing::warn!(
                        provider = self.provider.name(),
                        model = %candidate,
                        "Model probe failed: {}",
                        e
                    );
                }
            }
        }

        tracing::error!(
            provider = self.provider.name(),
            candidates = ?self.choice.candidates(),
            "No candidate model is available"
        );
        Err(GatewayError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeProvider;

    #[test]
    fn test_model_choice_rejects_empty() {
        assert!(ModelChoice::new(Vec::<String>::new()).is_none());
        assert!(ModelChoice::new(["", "  "]).is_none());

        let choice = ModelChoice::new([" primary ", "", "fallback"]).unwrap();
        assert_eq!(choice.primary(), "primary");
        assert_eq!(choice.candidates(), ["primary", "fallback"]);
    }

    #[tokio::test]
    async fn test_primary_selected_when_healthy() {
        let provider = Arc::new(FakeProvider::new());
        let selector = ModelSelector::new(
            provider.clone(),
            ModelChoice::new(["primary", "fallback"]).unwrap(),
        );

        assert_eq!(selector.select().await.unwrap(), "primary");
        assert_eq!(provider.probed(), ["primary"]);
    }

    #[tokio::test]
    async fn test_falls_through_to_fallback() {
        let provider = Arc::new(FakeProvider::new().failing_probe("primary"));
        let selector = ModelSelector::new(
            provider.clone(),
            ModelChoice::new(["primary", "fallback"]).unwrap(),
        );

        assert_eq!(selector.select().await.unwrap(), "fallback");
        assert_eq!(provider.probed(), ["primary", "fallback"]);
    }

    #[tokio::test]
    async fn test_all_candidates_fail() {
        let provider = Arc::new(
            FakeProvider::new()
                .failing_probe("primary")
                .failing_probe("fallback"),
        );
        let selector = ModelSelector::new(
            provider.clone(),
            ModelChoice::new(["primary", "fallback"]).unwrap(),
        );

        assert_eq!(selector.select().await, Err(GatewayError::Unavailable));
        assert_eq!(provider.probed(), ["primary", "fallback"]);
        assert_eq!(provider.generate_calls(), 0);
    }
}
