//! OpenAI-backed component enricher.
//!
//! Reference implementation of [`ComponentEnricher`] over an
//! OpenAI-compatible chat completions endpoint. The model is asked for a
//! strict JSON array of component sentiments; anything that does not parse
//! is an [`EnricherError::InvalidResponse`], which the aggregator degrades
//! to `None` for the affected topic.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{EnricherError, EnricherResult};
use crate::traits::enricher::ComponentEnricher;
use crate::types::post::RawPost;
use crate::types::sentiment::{ComponentSentiment, SentimentLabel};

const SYSTEM_PROMPT: &str = r#"You analyze forum discussion about a topic and break sentiment down by component (sub-aspect).

Identify up to 6 concrete components people discuss (e.g. for a phone: "battery life", "camera", "price").

Respond with ONLY a JSON array, no prose, no code fences:
[
  {
    "component": "battery life",
    "sentiment": "positive" | "negative" | "neutral",
    "confidence": 0.0-1.0,
    "summary": "one sentence on what was said",
    "mention_count": <number of posts mentioning it>
  }
]

Only include components actually mentioned in the posts. Do not infer or fabricate."#;

/// Component enricher speaking the OpenAI chat completions protocol.
///
/// # Example
///
/// ```rust,ignore
/// let enricher = OpenAiEnricher::new("sk-...").with_model("gpt-4o-mini");
/// let engine = TrendingEngine::new(source, classifier)
///     .with_enricher(Box::new(enricher));
/// ```
#[derive(Clone)]
pub struct OpenAiEnricher {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiEnricher {
    /// Create an enricher with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> EnricherResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| EnricherError::Failed("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, local models).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn user_prompt(topic_name: &str, sample_posts: &[RawPost]) -> String {
        let mut prompt = format!("Topic: {topic_name}\n\nPosts:\n");
        for post in sample_posts {
            prompt.push_str(&format!("- {}\n", post.text().replace('\n', " ")));
        }
        prompt
    }

    async fn chat(&self, user: &str) -> EnricherResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| EnricherError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnricherError::Failed(format!("HTTP {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| EnricherError::InvalidResponse(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| EnricherError::InvalidResponse("no choices in response".to_string()))
    }
}

#[async_trait]
impl ComponentEnricher for OpenAiEnricher {
    async fn analyze_components(
        &self,
        topic_name: &str,
        sample_posts: &[RawPost],
    ) -> EnricherResult<Vec<ComponentSentiment>> {
        let user = Self::user_prompt(topic_name, sample_posts);
        let content = self.chat(&user).await?;
        parse_components(&content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Parse the model's JSON array, tolerating code fences.
fn parse_components(content: &str) -> EnricherResult<Vec<ComponentSentiment>> {
    let trimmed = strip_code_fences(content);
    let parsed: Vec<ComponentDto> = serde_json::from_str(trimmed)
        .map_err(|e| EnricherError::InvalidResponse(e.to_string()))?;

    Ok(parsed
        .into_iter()
        .filter_map(|dto| {
            let sentiment = SentimentLabel::parse(&dto.sentiment)?;
            Some(ComponentSentiment {
                component: dto.component,
                sentiment,
                confidence: dto.confidence.clamp(0.0, 1.0),
                summary: dto.summary,
                mention_count: dto.mention_count,
            })
        })
        .collect())
}

fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ComponentDto {
    component: String,
    sentiment: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    mention_count: u32,
}
