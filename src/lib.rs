// Copyright 2025 ModerRAS
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Study Gateway
//!
//! Model gateway for an AI study assistant.
//!
//! Tutoring questions, photographed notes and quiz requests all end up as a
//! single call to a hosted generative model. This crate owns that call:
//! it picks a servable model from a preference list, classifies quota
//! errors, memoizes text answers for a while, and lets a session back off
//! after the provider starts rate limiting.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use study_gateway::{AppSettings, Gateway, StudySession};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = AppSettings::load();
//!     let gateway = Gateway::new(
//!         settings.model_config().build_provider(),
//!         settings.gateway_config(),
//!     );
//!
//!     let mut session = StudySession::with_cooldown(Arc::new(gateway), settings.cooldown());
//!     match session.ask("What is a catalyst?", None).await {
//!         Ok(text) => println!("{}", text),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

pub mod gateway;
pub mod model;
pub mod session;
pub mod settings;

pub use gateway::{Gateway, GatewayConfig, GatewayError, ModelChoice};
pub use model::{
    ImagePayload, ModelConfig, ModelProvider, ModelRequest, ModelResponse, ProviderKind,
};
pub use session::{Cooldown, SessionError, StudySession};
pub use settings::AppSettings;
