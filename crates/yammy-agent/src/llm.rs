//! LLM clients: OpenAI-compatible chat completions.
//!
//! Three roles share one wire format: the intent classifier (LLM #1), the
//! answer writer (LLM #2), and the pantry-list mapper. Each role is a trait
//! so the pipeline can run against stubs in tests.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use yammy_types::{CATEGORY_VOCABULARY, Recipe, TagSet};

use crate::config::LlmSettings;
use crate::json_guard::{extract_json_array, extract_json_object};

/// Chat message in the OpenAI wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user`, or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Build a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Build a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completions (OpenAI format).
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    stream: bool,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Response: choices[0].message.content.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Turns a user utterance into raw tag JSON. The reply is untrusted; the
/// Tag Normalizer owns shape validation.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Analyze one utterance into a raw tag value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing service is unreachable. Malformed
    /// *content* is not an error: it comes back as a JSON value the
    /// normalizer will zero out.
    async fn analyze(&self, query: &str) -> Result<serde_json::Value>;
}

/// Renders the chosen recipe as one natural-language paragraph.
#[async_trait]
pub trait AnswerWriter: Send + Sync {
    /// Describe `recipe` as the answer to `query`, continuing from the
    /// previous recommendation when one exists.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing service is unreachable.
    async fn respond(&self, query: &str, recipe: &Recipe, prev: Option<&Recipe>)
    -> Result<String>;
}

/// Normalizes a raw pantry list to canonical ingredient names.
#[async_trait]
pub trait PantryMapper: Send + Sync {
    /// Map user-supplied pantry items to standard ingredient names.
    /// Infallible: any failure falls back to the input list.
    async fn normalize_ingredients(&self, items: &[String]) -> Vec<String>;
}

/// JSON Schema of [`TagSet`], generated from the shared type definitions.
fn tag_schema_json() -> String {
    let schema = schemars::schema_for!(TagSet);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// System prompt for the intent classifier.
///
/// The category vocabulary and the output schema both come from
/// `yammy-types`, so the prompt can never drift from the code.
#[must_use]
pub fn classifier_system_prompt() -> String {
    let vocabulary = CATEGORY_VOCABULARY.join("\", \"");
    format!(
        r#"너는 요리 추천 시스템을 위한 의도 분석기이다.
한국어로만 출력하고, JSON 외의 어떤 문장도 절대로 출력하지 마라.

출력해야 하는 JSON 필드는 다음 두 가지이다:

1) category — 아래 목록 중 하나 또는 빈 배열
2) ingredients — 사용자가 말한 문장에서 유추되는 요리 재료 키워드 목록
   재료는 실제 요리에 사용될 법한 단어만 포함하라.
   (예: 고추, 고춧가루, 청양고추, 대파, 마늘, 돼지고기, 육수, 두반장 등)

----------------------------------------
category 목록 (DB 기준)
["{vocabulary}"]
----------------------------------------

재료 추출 규칙:
- 사용자가 원하는 음식의 맛/이미지/특징을 바탕으로
  실제로 자주 사용되는 재료를 추론하여 나열한다.
- 가능한 한 구체적인 단어를 사용한다. (예: "고기" 대신 "돼지고기")
- 판단이 어려우면 생략한다.
- JSON 외 다른 문장은 절대로 출력하지 마라.

출력은 다음 JSON 스키마를 따른다:

{schema}

출력 예시:

{{
  "category": [],
  "ingredients": []
}}"#,
        schema = tag_schema_json(),
    )
}

/// System prompt for the answer writer.
const RESPONDER_SYSTEM_PROMPT: &str = r#"너는 한국어로만 답변하는 요리 추천 챗봇이다.
반드시 한국어만 사용하라. 다른 언어는 절대 사용하지 마라.

아래에는:
- 사용자 요청
- 직전에 추천된 레시피 (있을 수도 있고 없을 수도 있음)
- 이번에 확정된 레시피 정보
가 주어진다.

중요 규칙:
- 이미 확정된 레시피만 설명하라.
- 다른 요리를 추천하지 마라.
- 비교하거나 대안을 제시하지 마라.
- 재료나 조리법을 추측하거나 추가하지 마라.

너의 역할:
- 이전 대화가 있다면 자연스럽게 이어서 설명하고
- 없다면 단독 추천처럼 설명하라.

출력은 한 문단의 자연스러운 한국어 문장만 허용된다."#;

/// System prompt for the pantry-list mapper.
const PANTRY_SYSTEM_PROMPT: &str = r#"너는 요리 레시피 데이터베이스용 재료 정규화 도우미야.

규칙:
1. 입력은 사용자가 가진 재료 목록이다.
2. 출력은 레시피 DB에 들어갈 법한 '표준 재료명' 리스트다.
3. 수량, 단위, 형용사는 제거한다.
4. 동의어는 하나의 대표 재료명으로 통일한다.
5. JSON 배열만 출력한다."#;

/// User prompt for the answer writer.
#[must_use]
pub fn responder_user_prompt(query: &str, recipe: &Recipe, prev: Option<&Recipe>) -> String {
    let context_text = match prev {
        Some(prev) => format!("[직전 추천 레시피]\n이름: {}", prev.name),
        None => "[직전 추천 레시피]\n없음".to_string(),
    };
    format!(
        "[사용자 요청]\n{query}\n\n{context_text}\n\n[이번에 확정된 레시피]\n이름: {}\n주요 재료: {}\n\n위 정보를 바탕으로\n이번 레시피가 왜 사용자 요청에 잘 맞는지 설명해줘.",
        recipe.name, recipe.ingredient,
    )
}

/// HTTP client for one chat-completions backend.
pub struct LlmClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    /// Build a client from settings.
    #[must_use]
    pub fn new(settings: &LlmSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: settings.url.clone(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone(),
        }
    }

    /// Send messages; returns the first choice's content.
    async fn chat(&self, messages: Vec<ChatMessage>, temperature: Option<f32>) -> Result<String> {
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            stream: false,
            messages,
            temperature,
        };
        let mut req = self
            .client
            .post(&self.url)
            .json(&body)
            .header("Content-Type", "application/json");
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }
        let res = req.send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("LLM API error {}: {}", status, text));
        }
        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("LLM response parse error: {}; body: {}", e, text))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("LLM response has no choices"))?;
        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

#[async_trait]
impl IntentClassifier for LlmClient {
    async fn analyze(&self, query: &str) -> Result<serde_json::Value> {
        let messages = vec![
            ChatMessage::system(classifier_system_prompt()),
            ChatMessage::user(format!(
                "사용자 요청: \"{query}\"\n위 요청을 위 JSON 형식으로만 출력해."
            )),
        ];
        let raw = self.chat(messages, None).await?;
        Ok(extract_json_object(&raw).unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl AnswerWriter for LlmClient {
    async fn respond(
        &self,
        query: &str,
        recipe: &Recipe,
        prev: Option<&Recipe>,
    ) -> Result<String> {
        let messages = vec![
            ChatMessage::system(RESPONDER_SYSTEM_PROMPT),
            ChatMessage::user(responder_user_prompt(query, recipe, prev)),
        ];
        self.chat(messages, Some(0.2)).await
    }
}

#[async_trait]
impl PantryMapper for LlmClient {
    async fn normalize_ingredients(&self, items: &[String]) -> Vec<String> {
        let messages = vec![
            ChatMessage::system(PANTRY_SYSTEM_PROMPT),
            ChatMessage::user(format!(
                "사용자 재료 목록:\n{items:?}\n\n정규화된 재료 목록만 JSON 배열로 출력해."
            )),
        ];
        let raw = match self.chat(messages, Some(0.1)).await {
            Ok(raw) => raw,
            Err(error) => {
                tracing::debug!(
                    event = "llm.pantry.request_failed",
                    error = %error,
                    "pantry mapper unavailable; keeping raw list"
                );
                return items.to_vec();
            }
        };
        match extract_json_array(&raw) {
            Some(parsed) if !parsed.is_empty() => parsed,
            _ => {
                tracing::debug!(
                    event = "llm.pantry.parse_failed",
                    raw = %raw,
                    "pantry mapper reply unparsable; keeping raw list"
                );
                items.to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifier_prompt_carries_the_vocabulary() {
        let prompt = classifier_system_prompt();
        for label in CATEGORY_VOCABULARY {
            assert!(prompt.contains(label), "missing {label}");
        }
    }

    #[test]
    fn classifier_prompt_carries_the_schema() {
        let prompt = classifier_system_prompt();
        assert!(prompt.contains("\"category\""));
        assert!(prompt.contains("\"ingredients\""));
    }

    #[test]
    fn responder_prompt_mentions_previous_recipe_when_present() {
        let recipe = Recipe {
            recipe_id: 1,
            name: "김치찌개".to_string(),
            serving: None,
            time: None,
            ingredient: "김치 돼지고기".to_string(),
            spicy_ingredient: None,
            method: None,
            categories: vec!["찌개".to_string()],
        };
        let prev = Recipe {
            name: "된장찌개".to_string(),
            recipe_id: 2,
            ..recipe.clone()
        };
        let prompt = responder_user_prompt("얼큰한 거", &recipe, Some(&prev));
        assert!(prompt.contains("된장찌개"));
        assert!(prompt.contains("김치찌개"));

        let solo = responder_user_prompt("얼큰한 거", &recipe, None);
        assert!(solo.contains("없음"));
    }
}
