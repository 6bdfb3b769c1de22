use serde::Deserialize;
use serde_json::json;
use tokio::runtime::Handle;

use super::{ClassifierError, EmotionClassifier};
use crate::analysis::domain::{EmotionLabel, EmotionScore};

/// Client for a hosted text-classification endpoint (Hugging Face inference API shape).
///
/// `classify` blocks on the captured tokio runtime, so it must be called from a blocking
/// context such as `tokio::task::spawn_blocking`, never from an async task directly.
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    runtime: Handle,
}

impl RemoteClassifier {
    /// Must be constructed inside a tokio runtime.
    pub fn new(
        endpoint: impl Into<String>,
        api_token: Option<String>,
    ) -> Result<Self, ClassifierError> {
        let runtime = Handle::try_current().map_err(|err| {
            ClassifierError::Unavailable(format!("no async runtime for remote classifier: {err}"))
        })?;
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ClassifierError::Unavailable(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_token,
            runtime,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        let body = json!({
            "inputs": text,
            "parameters": { "top_k": EmotionLabel::ALL.len() },
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ClassifierError::Request(err.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|err| ClassifierError::Request(err.to_string()))?;

        if !status.is_success() {
            return Err(ClassifierError::Unavailable(format!(
                "endpoint returned {status}: {payload}"
            )));
        }

        parse_payload(&payload)
    }
}

impl EmotionClassifier for RemoteClassifier {
    fn classify(&self, text: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
        self.runtime.block_on(self.request(text))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierPayload {
    Batched(Vec<Vec<EmotionScore>>),
    Flat(Vec<EmotionScore>),
}

/// Accepts both `[[{label, score}, ...]]` (one batch per input) and a flat list.
pub(crate) fn parse_payload(payload: &str) -> Result<Vec<EmotionScore>, ClassifierError> {
    let parsed: ClassifierPayload = serde_json::from_str(payload)
        .map_err(|err| ClassifierError::Response(format!("{err}: {payload}")))?;

    match parsed {
        ClassifierPayload::Batched(mut batches) => {
            if batches.is_empty() {
                return Err(ClassifierError::Response("empty batch".to_string()));
            }
            Ok(batches.swap_remove(0))
        }
        ClassifierPayload::Flat(scores) => Ok(scores),
    }
}
