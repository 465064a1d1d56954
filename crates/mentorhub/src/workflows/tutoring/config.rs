use serde::{Deserialize, Serialize};

/// Program-level knobs for the tutoring workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutoringConfig {
    /// Ceiling on concurrent Active engagements per tutor, unless the
    /// tutor's directory profile overrides it.
    pub default_active_tutoring_limit: u32,
    /// URL prefixes accepted as final act evidence on completion.
    pub final_act_link_prefixes: Vec<String>,
}

impl Default for TutoringConfig {
    fn default() -> Self {
        Self {
            default_active_tutoring_limit: 3,
            final_act_link_prefixes: vec![
                "https://github.com/".to_string(),
                "https://docs.google.com/".to_string(),
            ],
        }
    }
}
