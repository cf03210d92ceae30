//! Basic usage example for Study Gateway.

use std::sync::Arc;

use study_gateway::{Gateway, GatewayConfig, ModelChoice, ModelConfig, StudySession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt::init();

    // Configure the provider
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    let provider = ModelConfig::default().with_api_key(api_key).build_provider();

    // Primary model first, then fallbacks
    let candidates = ModelChoice::new(["gemini-1.5-flash", "gemini-pro"])
        .ok_or_else(|| anyhow::anyhow!("no candidate models"))?;
    let gateway = Gateway::new(provider, GatewayConfig::default().with_candidates(candidates));

    let mut session = StudySession::new(Arc::new(gateway));

    let prompt = "Generate a 5-question multiple choice quiz on photosynthesis. \
                  Include answers at the end.";
    println!("📝 Prompt: {}\n", prompt);

    match session.ask(prompt, None).await {
        Ok(text) => println!("✅ {}", text),
        Err(e) => eprintln!("❌ {}", e.user_message()),
    }

    Ok(())
}
