use anyhow::{Result, anyhow, bail};
use log::{debug, info};
use serde_json::{Value, json};

const QWEN_MODEL: &str = "qwen-max";
const FALLBACK_LINES: usize = 5;

/// Client for the Qwen text-generation API. In development the URL points at
/// the local CORS relay; in production it is the dashscope endpoint itself.
#[derive(Clone)]
pub struct QwenClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl QwenClient {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url,
            api_key,
        }
    }

    pub async fn summarize(&self, text: &str, language_code: &str, max_length: u32) -> Result<String> {
        let payload = json!({
            "model": QWEN_MODEL,
            "input": {
                "messages": [
                    {
                        "role": "system",
                        "content": "You are an assistant that writes concise, faithful summaries."
                    },
                    {
                        "role": "user",
                        "content": format!(
                            "Summarize the following text in language '{language_code}', using at most {max_length} tokens:\n\n{text}"
                        )
                    }
                ]
            },
            "parameters": {
                "result_format": "text",
                "max_tokens": max_length,
                "temperature": 0.7,
                "top_p": 0.8
            }
        });

        debug!("Sending summary request to {}", self.api_url);

        let mut request = self.http.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("Failed to reach Qwen API: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Qwen API returned {status}: {body}");
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse Qwen response: {e}"))?;

        let summary = extract_summary_text(&value)?;
        info!("Summary generated: {} characters", summary.len());
        Ok(summary)
    }
}

/// Pull the generated text out of a Qwen generation response.
pub fn extract_summary_text(value: &Value) -> Result<String> {
    value["output"]["text"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Unexpected Qwen response shape: {value}"))
}

/// Degraded-mode summary used when the Qwen call fails: the first few lines
/// of the source text under a fixed heading.
pub fn fallback_summary(text: &str) -> String {
    let head: Vec<&str> = text.lines().take(FALLBACK_LINES).collect();

    let mut summary = String::from("Automatic summary (AI generation unavailable):\n\n");
    summary.push_str(&head.join("\n"));
    summary.push_str("\n\n(Partial summary based on the first lines of the text)");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_generation_response() {
        let value = json!({
            "output": { "text": "a short summary" },
            "usage": { "output_tokens": 12 }
        });
        assert_eq!(extract_summary_text(&value).unwrap(), "a short summary");
    }

    #[test]
    fn rejects_unexpected_response_shape() {
        let value = json!({ "output": { "choices": [] } });
        assert!(extract_summary_text(&value).is_err());
    }

    #[test]
    fn fallback_keeps_at_most_five_lines() {
        let text = (1..=8).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let summary = fallback_summary(&text);
        assert!(summary.contains("line 5"));
        assert!(!summary.contains("line 6"));
        assert!(summary.starts_with("Automatic summary"));
    }
}
