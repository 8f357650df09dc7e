//! The `familia chat` command.

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use familia_chat::{ChatSession, OllamaChat};

use super::App;

pub async fn send(app: &App, message: &str) -> Result<()> {
    let settings = app.settings.chat(&app.config.chat.settings());
    let backend = OllamaChat::with_timeout(&settings.endpoint, app.config.chat.timeout_secs)?;
    let session = ChatSession::from_settings(Arc::new(backend), &settings);

    match session
        .send(message)
        .await
        .with_context(|| format!("chat request to {} failed", settings.endpoint))?
    {
        Some(reply) => println!("{}", reply.content),
        None => println!("Nothing to send."),
    }
    Ok(())
}

pub fn config(app: &App, endpoint: Option<&str>, model: Option<&str>) -> Result<()> {
    if (endpoint.is_some() || model.is_some()) && !app.settings.set_chat(endpoint, model) {
        bail!("failed to save chat settings");
    }

    let settings = app.settings.chat(&app.config.chat.settings());
    println!("Endpoint: {}", settings.endpoint);
    println!("Model:    {}", settings.model);
    Ok(())
}
