//! The four engine adapters, one per [GrammarKind].
//!
//! Each adapter takes one content item's payload and an already-split [Pipeline], and returns the engine's matches
//! as a flat list of strings. The function chain runs afterwards, in [EngineAdapter::extract].
mod sel_css;
mod sel_json;
mod sel_regex;
mod sel_text_pseudo;
mod sel_xpath;

use crate::error::ExtractError;
use crate::query::{GrammarKind, Pipeline};
use paste::paste;
use sel_css::CssAdapter;
use sel_json::JsonQueryAdapter;
use sel_regex::RegexAdapter;
use sel_xpath::XPathAdapter;

pub(crate) trait Adapter {
    /// Matches `pipeline.expression` against `payload`. The chain in `pipeline` is not applied here.
    fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError>;
}

macro_rules! adapters {
    { $($name:ident),+ $(,)? } => {

        #[derive(Copy, Clone, Debug)]
        pub(crate) enum EngineAdapter {
            $(
            $name( paste!{[<$name Adapter>]} ),
            )+
        }

        impl From<GrammarKind> for EngineAdapter {
            fn from(kind: GrammarKind) -> Self {
                match kind {
                    $(
                    GrammarKind::$name => Self::$name(paste!{[<$name Adapter>]}),
                    )+
                }
            }
        }

        impl EngineAdapter {
            fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError> {
                match self {
                    $(
                    Self::$name(adapter) => adapter.matches(pipeline, payload),
                    )+
                }
            }
        }
    };
}

adapters! {
    Regex,
    Css,
    XPath,
    JsonQuery,
}

impl EngineAdapter {
    /// Runs `expression` (which may end in a `>>` chain) against one payload.
    pub fn extract(&self, expression: &str, payload: &str) -> Result<Vec<String>, ExtractError> {
        let pipeline = Pipeline::split(expression);
        let found = self.matches(&pipeline, payload)?;
        Ok(pipeline.chain.apply(found))
    }
}

/// Trims every string, and drops the ones that end up empty.
pub(crate) fn stripped<I, S>(found: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    found
        .into_iter()
        .filter_map(|text| {
            let text = text.as_ref().trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}
