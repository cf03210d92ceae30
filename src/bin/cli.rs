//! Study Gateway - AI study assistant in the terminal
//!
//! This is the CLI entry point for the study-gateway tool.
//! Run with: cargo run --bin study-gateway

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use study_gateway::{AppSettings, Gateway, ImagePayload, StudySession};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so answers on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = AppSettings::load();
    if settings.api_key.is_empty() {
        tracing::warn!("No API key configured; set GEMINI_API_KEY or MODEL_API_KEY");
    }

    let gateway = Gateway::new(
        settings.model_config().build_provider(),
        settings.gateway_config(),
    );
    let mut session = StudySession::with_cooldown(Arc::new(gateway), settings.cooldown());

    let args: Vec<String> = std::env::args().skip(1).collect();

    // One-shot mode: answer the prompt given on the command line
    if !args.is_empty() {
        let prompt = args.join(" ");
        answer(&mut session, &prompt, None).await;
        return Ok(());
    }

    println!("🎓 Study Gateway - AI Study Companion");
    println!("================================================");
    println!("Provider: {} @ {}", settings.provider, settings.base_url);
    println!("Candidates: {}", settings.candidates.join(", "));
    println!(
        "Cache TTL: {}s, cooldown: {}s",
        settings.cache_ttl_secs, settings.cooldown_secs
    );
    println!("================================================");
    println!("Type a question and press Enter.");
    println!("  /image <path> [prompt]  attach a photo of your notes");
    println!("  /model                  show the selected model");
    println!("Type 'quit' or 'exit' to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("📝 You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "exit" {
            println!("Goodbye! 👋");
            break;
        }

        if input == "/model" {
            match session.gateway().model().await {
                Ok(model) => println!("🤖 Model: {}\n", model),
                Err(e) => eprintln!("❌ {}\n", e),
            }
            continue;
        }

        if let Some(rest) = image_command(input) {
            let (path, prompt) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if path.is_empty() {
                eprintln!("❌ Usage: /image <path> [prompt]\n");
                continue;
            }
            let prompt = match prompt.trim() {
                "" => "Read this image. Transcribe the text and summarize the key points.",
                p => p,
            };
            match ImagePayload::from_file(path) {
                Ok(image) => answer(&mut session, prompt, Some(image.bytes().to_vec())).await,
                Err(e) => eprintln!("❌ {}\n", e),
            }
            continue;
        }

        answer(&mut session, input, None).await;
    }

    Ok(())
}

/// Arguments of `/image`, if `input` is that command.
fn image_command(input: &str) -> Option<&str> {
    let rest = input.strip_prefix("/image")?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

async fn answer(session: &mut StudySession, prompt: &str, image: Option<Vec<u8>>) {
    match session.ask(prompt, image).await {
        Ok(text) => println!("\n🤖 {}\n", text),
        Err(e) => eprintln!("\n⚠️  {}\n", e.user_message()),
    }
}
