//! Intent classification and the intent → text table.

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;

pub const MOTIVATE_INTENT: &str = "MotivateIntent";
pub const GOODBYE_TEXT: &str = "Goodbye for now!";
pub const FALLBACK_TEXT: &str =
    "Sorry; I can't help with that. Only you can help you. You can ask me to motivate you.";
pub const FALLBACK_REPROMPT: &str = "Ask me to say something.";
pub const ERROR_TEXT: &str = "Sorry, there was a problem. Please try again!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Launch,
    Motivate,
    Help,
    Cancel,
    Stop,
    Fallback,
    SessionEnded,
    /// Unhandled request or a failure while handling one.
    Exception,
}

#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    request: RequestBody,
}

#[derive(Debug, Deserialize)]
struct RequestBody {
    #[serde(rename = "type")]
    kind: String,
    intent: Option<IntentBody>,
}

#[derive(Debug, Deserialize)]
struct IntentBody {
    name: String,
}

impl IntentKind {
    /// Classify a platform request by `request.type` and `request.intent.name`.
    pub fn from_request(request: &serde_json::Value) -> Result<Self> {
        let envelope = RequestEnvelope::deserialize(request)?;
        let body = envelope.request;
        let kind = match body.kind.as_str() {
            "LaunchRequest" => IntentKind::Launch,
            "SessionEndedRequest" => IntentKind::SessionEnded,
            "IntentRequest" => {
                let name = body.intent.map(|i| i.name).ok_or_else(|| {
                    Error::validation_with_context(
                        "intent request without intent",
                        ErrorContext::new().with_field_path("request.intent"),
                    )
                })?;
                Self::from_intent_name(&name)
            }
            _ => IntentKind::Exception,
        };
        Ok(kind)
    }

    pub fn from_intent_name(name: &str) -> Self {
        match name {
            MOTIVATE_INTENT => IntentKind::Motivate,
            "AMAZON.HelpIntent" => IntentKind::Help,
            "AMAZON.CancelIntent" => IntentKind::Cancel,
            "AMAZON.StopIntent" => IntentKind::Stop,
            "AMAZON.FallbackIntent" => IntentKind::Fallback,
            _ => IntentKind::Exception,
        }
    }
}

/// What the skill says for one intent, before audio resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentResponse {
    pub text: String,
    pub reprompt: Option<String>,
    /// `None` leaves the decision to the platform.
    pub end_session: Option<bool>,
    pub diagnostics: bool,
    pub show_card: bool,
}

impl IntentResponse {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reprompt: None,
            end_session: None,
            diagnostics: false,
            show_card: true,
        }
    }

    fn end_session(mut self, end: bool) -> Self {
        self.end_session = Some(end);
        self
    }

    fn diagnostics(mut self) -> Self {
        self.diagnostics = true;
        self
    }

    fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    fn without_card(mut self) -> Self {
        self.show_card = false;
        self
    }
}

pub struct IntentRouter {
    response_text: String,
    engine_status: String,
}

impl IntentRouter {
    pub fn new(response_text: impl Into<String>) -> Self {
        Self {
            response_text: response_text.into(),
            engine_status: "unknown".to_string(),
        }
    }

    pub fn with_engine_status(mut self, status: impl Into<String>) -> Self {
        self.engine_status = status.into();
        self
    }

    /// `None` means respond with an empty envelope.
    pub fn route(&self, kind: IntentKind) -> Option<IntentResponse> {
        let response = match kind {
            IntentKind::Launch => IntentResponse::new(&self.response_text).end_session(true),
            IntentKind::Motivate => IntentResponse::new(&self.response_text).end_session(true),
            IntentKind::Help => IntentResponse::new(format!(
                "Ask me to motivate you! Diagnostic: {}",
                self.engine_status
            ))
            .diagnostics()
            .end_session(false),
            IntentKind::Cancel | IntentKind::Stop => {
                IntentResponse::new(GOODBYE_TEXT).end_session(false)
            }
            IntentKind::Fallback => IntentResponse::new(FALLBACK_TEXT)
                .reprompt(FALLBACK_REPROMPT)
                .end_session(false)
                .without_card(),
            IntentKind::SessionEnded => return None,
            IntentKind::Exception => IntentResponse::new(ERROR_TEXT)
                .reprompt(ERROR_TEXT)
                .end_session(false)
                .without_card(),
        };
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_classification() {
        let launch = json!({"version": "1.0", "request": {"type": "LaunchRequest"}});
        assert_eq!(IntentKind::from_request(&launch).unwrap(), IntentKind::Launch);

        let stop = json!({"request": {"type": "IntentRequest", "intent": {"name": "AMAZON.StopIntent"}}});
        assert_eq!(IntentKind::from_request(&stop).unwrap(), IntentKind::Stop);

        let unknown = json!({"request": {"type": "IntentRequest", "intent": {"name": "OrderPizza"}}});
        assert_eq!(IntentKind::from_request(&unknown).unwrap(), IntentKind::Exception);

        let ended = json!({"request": {"type": "SessionEndedRequest", "reason": "USER_INITIATED"}});
        assert_eq!(IntentKind::from_request(&ended).unwrap(), IntentKind::SessionEnded);
    }

    #[test]
    fn test_malformed_requests_are_errors() {
        assert!(IntentKind::from_request(&json!({"nope": 1})).is_err());
        let no_intent = json!({"request": {"type": "IntentRequest"}});
        assert!(matches!(
            IntentKind::from_request(&no_intent),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_routing_table() {
        let router = IntentRouter::new("You rock").with_engine_status("TTS is available");

        let launch = router.route(IntentKind::Launch).unwrap();
        assert_eq!(launch.text, "You rock");
        assert!(!launch.diagnostics);
        assert_eq!(launch.end_session, Some(true));

        let motivate = router.route(IntentKind::Motivate).unwrap();
        assert!(!motivate.diagnostics);

        let help = router.route(IntentKind::Help).unwrap();
        assert_eq!(help.text, "Ask me to motivate you! Diagnostic: TTS is available");
        assert_eq!(help.end_session, Some(false));

        assert_eq!(router.route(IntentKind::Cancel), router.route(IntentKind::Stop));

        let fallback = router.route(IntentKind::Fallback).unwrap();
        assert_eq!(fallback.reprompt.as_deref(), Some(FALLBACK_REPROMPT));
        assert!(!fallback.show_card);
        assert_eq!(fallback.end_session, Some(false));

        let exception = router.route(IntentKind::Exception).unwrap();
        assert_eq!(exception.reprompt.as_deref(), Some(ERROR_TEXT));
        assert_eq!(exception.end_session, Some(false));

        assert!(router.route(IntentKind::SessionEnded).is_none());
    }
}
