//! 技能模块：意图到响应文本的映射、平台响应封装以及请求处理入口。
//!
//! # Skill Surface
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`IntentKind`] | Closed set of request kinds the skill answers |
//! | [`IntentRouter`] | Intent → response text table |
//! | [`ResponseEnvelope`] | Outbound speech/card/reprompt envelope |
//! | [`Skill`] | Routes a request and voices it through the pipeline |
//! | [`SkillContext`] | Collaborators built once from [`crate::config::SkillConfig`] |

mod context;
mod handler;
mod intent;
mod response;

pub use context::SkillContext;
pub use handler::Skill;
pub use intent::{
    IntentKind, IntentResponse, IntentRouter, ERROR_TEXT, FALLBACK_REPROMPT, FALLBACK_TEXT,
    GOODBYE_TEXT, MOTIVATE_INTENT,
};
pub use response::ResponseEnvelope;
