// SPDX-FileCopyrightText: 2025 FastOpp contributors
//
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const CHAT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";
const SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Provide clear, concise, \
    and accurate responses. Be friendly and engaging in your communication style.";

pub struct OpenRouterClient {
    client: Client,
    api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub model: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Send one user message to the free Llama 3.3 70B model and return
    /// the assistant's reply.
    pub async fn chat(&self, user_message: &str) -> Result<ChatReply> {
        if user_message.is_empty() {
            anyhow::bail!("message empty");
        }

        let payload = json!({
            "model": CHAT_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_message }
            ],
            "temperature": 0.7,
            "max_tokens": 1000
        });

        let response = self
            .client
            .post(OPENROUTER_URL)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", "https://fastopp.local")
            .header("X-Title", "FastOpp AI Demo")
            .json(&payload)
            .send()
            .await
            .context("Failed to send request to OpenRouter")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenRouter API error ({}): {}", status, body);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenRouter response")?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(ChatReply {
            response: content,
            model: CHAT_MODEL.to_string(),
        })
    }
}
