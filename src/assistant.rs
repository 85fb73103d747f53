use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

const EXCERPT_CHARS: usize = 50;

/// Assistant persona the prompt is addressed to. Only one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Core {
    Gemini,
    ChatGpt,
    Claude,
    Copilot,
}

impl Core {
    pub const ALL: [Core; 4] = [Core::Gemini, Core::ChatGpt, Core::Claude, Core::Copilot];

    pub fn name(self) -> &'static str {
        match self {
            Core::Gemini => "Gemini",
            Core::ChatGpt => "ChatGPT",
            Core::Claude => "Claude",
            Core::Copilot => "Copilot",
        }
    }

    pub fn provider(self) -> &'static str {
        match self {
            Core::Gemini => "Google",
            Core::ChatGpt => "OpenAI",
            Core::Claude => "Anthropic",
            Core::Copilot => "Microsoft",
        }
    }

    pub fn is_primary(self) -> bool {
        self == Core::Gemini
    }
}

impl fmt::Display for Core {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Core {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Core::ALL
            .iter()
            .copied()
            .find(|core| core.name().to_lowercase() == wanted)
            .ok_or_else(|| anyhow!("Unknown core '{}'. Available: Gemini (default), ChatGPT, Claude, Copilot", s))
    }
}

fn excerpt(text: &str) -> String {
    text.trim().chars().take(EXCERPT_CHARS).collect()
}

/// Prompt asking the selected core for a cover letter.
pub fn build_prompt(core: Core, job_description: &str, cv: &str) -> Result<String> {
    if job_description.trim().is_empty() || cv.trim().is_empty() {
        bail!("Both the job posting and the CV/background are needed to build an application");
    }
    Ok(format!(
        "ACT AS FOLLOWS ({core}):\n\
        Write a distinctive job application for the position: {}...\n\
        Applicant background: {}...\n\
        Emphasis: modern, convincing, AI skills.",
        excerpt(job_description),
        excerpt(cv),
    ))
}

pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String>;
    fn is_remote(&self) -> bool;
}

/// Offline mode: hands the prompt back so it can be pasted into any assistant.
pub struct TemplateGenerator;

impl TextGenerator for TemplateGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }

    fn is_remote(&self) -> bool {
        false
    }
}

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

pub struct OpenAiGenerator {
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
}

impl OpenAiGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        info!(model = %self.model, "requesting generated application");
        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow!(
                "OpenAI API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: ChatResponse = response
            .json()
            .context("Failed to parse OpenAI API response")?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("No choices in OpenAI API response"))
    }

    fn is_remote(&self) -> bool {
        true
    }
}

/// Remote generation only when a non-blank key is configured.
pub fn generator_for(api_key: Option<&str>) -> Box<dyn TextGenerator> {
    match api_key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => Box::new(OpenAiGenerator::new(key.to_string())),
        None => Box::new(TemplateGenerator),
    }
}
