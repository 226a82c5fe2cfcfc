//! Failures that degrade a query to "no matches", and where they get reported.
//!
//! Nothing here ever reaches the caller of a query as an `Err`. Adapters return [ExtractError]s, the
//! [Strainer](crate::Strainer) turns each into an empty result for that one content item, and hands a [Warning] to
//! its [WarningSink] (if it has one).
use crate::query::GrammarKind;

/// Why one adapter produced nothing for one content item.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid regex {pattern:?}: {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("regex {pattern:?} failed while matching: {reason}")]
    RegexMatch { pattern: String, reason: String },

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("invalid XPath expression {expression:?}: {reason}")]
    InvalidXPath { expression: String, reason: String },

    #[error("XPath expression {expression:?} failed to evaluate: {reason}")]
    XPathEval { expression: String, reason: String },

    #[error("content is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("invalid JMESPath expression {expression:?}: {reason}")]
    InvalidJsonQuery { expression: String, reason: String },

    #[error("JMESPath expression {expression:?} failed to evaluate: {reason}")]
    JsonQueryEval { expression: String, reason: String },

    #[error("couldn't serialize a JMESPath result: {reason}")]
    Serialize { reason: String },
}

/// Something a query noticed but swallowed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Warning {
    /// An adapter failed on one content item.
    #[error("{grammar} query on content item {item}: {error}")]
    Extract {
        grammar: GrammarKind,
        item: usize,
        #[source]
        error: ExtractError,
    },

    /// A non-negative index past the end of the aggregated results.
    #[error("index {index} out of range (have {available} results)")]
    IndexOutOfRange { index: i64, available: usize },

    /// A negative index other than `-1`.
    #[error("invalid index {0}")]
    InvalidIndex(i64),
}

/// Receives [Warning]s from a [Strainer](crate::Strainer).
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: &Warning);
}

impl<F> WarningSink for F
where
    F: Fn(&Warning) + Send + Sync,
{
    fn warn(&self, warning: &Warning) {
        self(warning)
    }
}

/// Forwards warnings to [tracing] at `WARN` level. This is what [Strainer::new](crate::Strainer::new) uses.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &Warning) {
        tracing::warn!(%warning, "query matched nothing");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn display() {
        let warning = Warning::Extract {
            grammar: GrammarKind::Css,
            item: 2,
            error: ExtractError::InvalidSelector {
                selector: ">>>".to_string(),
                reason: "unexpected token".to_string(),
            },
        };
        assert_eq!(
            warning.to_string(),
            r#"css query on content item 2: invalid CSS selector ">>>": unexpected token"#
        );
        assert_eq!(
            Warning::IndexOutOfRange { index: 4, available: 2 }.to_string(),
            "index 4 out of range (have 2 results)"
        );
        assert_eq!(Warning::InvalidIndex(-3).to_string(), "invalid index -3");
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |warning: &Warning| seen.lock().unwrap().push(warning.clone())
        };
        sink.warn(&Warning::InvalidIndex(-2));
        assert_eq!(*seen.lock().unwrap(), [Warning::InvalidIndex(-2)]);
    }

    #[test]
    fn tracing_sink_without_subscriber() {
        TracingSink.warn(&Warning::InvalidIndex(-2));
    }
}
