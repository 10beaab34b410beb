//! Request handling: route, resolve, wrap.

use super::intent::{IntentKind, IntentRouter};
use super::response::ResponseEnvelope;
use crate::pipeline::AudioResolutionPipeline;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Skill {
    name: String,
    router: IntentRouter,
    pipeline: Arc<AudioResolutionPipeline>,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        router: IntentRouter,
        pipeline: Arc<AudioResolutionPipeline>,
    ) -> Self {
        Self {
            name: name.into(),
            router,
            pipeline,
        }
    }

    /// Handle a raw platform request. Malformed requests get the error reply.
    pub async fn handle_request(&self, request: &serde_json::Value) -> ResponseEnvelope {
        let kind = match IntentKind::from_request(request) {
            Ok(kind) => kind,
            Err(e) => {
                warn!(error = %e, "could not classify request");
                IntentKind::Exception
            }
        };
        self.handle(kind).await
    }

    pub async fn handle(&self, kind: IntentKind) -> ResponseEnvelope {
        info!(intent = ?kind, "handling request");
        let Some(reply) = self.router.route(kind) else {
            return ResponseEnvelope::empty();
        };

        let speech = self.pipeline.resolve(&reply.text, reply.diagnostics).await;
        // The reprompt is resolved on its own; nothing is shared with the main utterance.
        let reprompt = match &reply.reprompt {
            Some(text) => Some(self.pipeline.resolve(text, false).await.audio),
            None => None,
        };

        let (card_title, card_text) = if reply.show_card {
            (Some(self.name.clone()), Some(speech.card_text))
        } else {
            (None, None)
        };
        ResponseEnvelope {
            speech_markup: Some(speech.audio),
            card_title,
            card_text,
            end_session: reply.end_session,
            reprompt_markup: reprompt,
        }
    }

    pub fn pipeline(&self) -> &AudioResolutionPipeline {
        &self.pipeline
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
