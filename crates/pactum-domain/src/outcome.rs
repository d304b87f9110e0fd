//! The shape of a model reply, resolved once at the provider boundary

/// What came back from one generation call
///
/// Providers map their wire format onto this so the extraction path handles
/// exactly three cases instead of probing response attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmOutcome {
    /// The model produced text
    Text(String),

    /// Safety filtering suppressed the output
    Blocked {
        /// Machine-readable block reason reported by the provider
        reason: String,
    },

    /// The reply had neither text nor a block reason
    Malformed(String),
}

impl LlmOutcome {
    /// Borrow the text, if the model produced any
    pub fn text(&self) -> Option<&str> {
        match self {
            LlmOutcome::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True when generation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, LlmOutcome::Blocked { .. })
    }
}
