use serde::{Deserialize, Serialize};

// ============================================================================
// generateContent request body
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

pub const INSIGHT_GENERATION: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_k: 40,
    top_p: 0.95,
    max_output_tokens: 1024,
};

pub const CHAT_GENERATION: GenerationConfig = GenerationConfig {
    max_output_tokens: 512,
    ..INSIGHT_GENERATION
};

impl GenerateRequest {
    pub fn single_prompt(prompt: String, generation_config: GenerationConfig) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
            safety_settings: Vec::new(),
        }
    }

    pub fn with_safety(mut self, category: &str, threshold: &str) -> Self {
        self.safety_settings.push(SafetySetting {
            category: category.to_string(),
            threshold: threshold.to_string(),
        });
        self
    }

    pub fn prompt_text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// `candidates[0].content.parts[0].text`, if every level is present and non-blank.
pub fn generated_text(response: &serde_json::Value) -> Option<&str> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let req = GenerateRequest::single_prompt("hi".to_string(), CHAT_GENERATION)
            .with_safety("HARM_CATEGORY_HARASSMENT", "BLOCK_MEDIUM_AND_ABOVE");
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(v["generationConfig"]["topK"], 40);
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(v["safetySettings"][0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[test]
    fn test_insight_request_omits_safety_settings() {
        let req = GenerateRequest::single_prompt("x".to_string(), INSIGHT_GENERATION);
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("safetySettings").is_none());
        assert_eq!(v["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn test_generated_text_paths() {
        let ok = json!({"candidates": [{"content": {"parts": [{"text": "  hello \n"}]}}]});
        assert_eq!(generated_text(&ok), Some("hello"));

        assert_eq!(generated_text(&json!({})), None);
        assert_eq!(generated_text(&json!({"candidates": []})), None);
        assert_eq!(generated_text(&json!({"candidates": [{"content": {}}]})), None);
        assert_eq!(
            generated_text(&json!({"candidates": [{"content": {"parts": [{"text": "   "}]}}]})),
            None
        );
    }
}
