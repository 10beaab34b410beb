//! Outbound response envelope.

use crate::ssml;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseEnvelope {
    /// Audio tag or speak markup; wrapped in one `<speak>` on output.
    pub speech_markup: Option<String>,
    pub card_title: Option<String>,
    pub card_text: Option<String>,
    pub end_session: Option<bool>,
    pub reprompt_markup: Option<String>,
}

impl ResponseEnvelope {
    /// Empty response, e.g. for session-ended requests.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render the platform JSON (`version` + `response`).
    pub fn to_platform_json(&self) -> Value {
        let mut response = Map::new();
        if let Some(markup) = &self.speech_markup {
            response.insert("outputSpeech".into(), ssml_speech(markup));
        }
        if let (Some(title), Some(text)) = (&self.card_title, &self.card_text) {
            response.insert(
                "card".into(),
                json!({"type": "Simple", "title": title, "content": text}),
            );
        }
        if let Some(reprompt) = &self.reprompt_markup {
            response.insert("reprompt".into(), json!({"outputSpeech": ssml_speech(reprompt)}));
        }
        if let Some(end) = self.end_session {
            response.insert("shouldEndSession".into(), Value::Bool(end));
        }
        json!({"version": "1.0", "response": Value::Object(response)})
    }
}

fn ssml_speech(markup: &str) -> Value {
    json!({"type": "SSML", "ssml": ssml::wrap_speak(markup)})
}
