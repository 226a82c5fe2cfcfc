use crate::content::ContentKind;
use std::fmt::{Display, Formatter};

/// The four query languages a query string can be routed to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GrammarKind {
    Regex,
    Css,
    XPath,
    JsonQuery,
}

/// Prefix table, in the order prefixes are tried.
const PREFIXES: [(&str, GrammarKind); 4] = [
    ("regex:", GrammarKind::Regex),
    ("css:", GrammarKind::Css),
    ("xpath:", GrammarKind::XPath),
    ("json:", GrammarKind::JsonQuery),
];

impl GrammarKind {
    /// The query-string prefix that routes to this grammar.
    pub fn prefix(self) -> &'static str {
        match self {
            GrammarKind::Regex => "regex:",
            GrammarKind::Css => "css:",
            GrammarKind::XPath => "xpath:",
            GrammarKind::JsonQuery => "json:",
        }
    }

    /// Whether this grammar can run against content of the given kind.
    ///
    /// Incompatible items are skipped by a query, never reported.
    pub fn accepts(self, content: ContentKind) -> bool {
        match (self, content) {
            (GrammarKind::Regex, ContentKind::Text | ContentKind::Html | ContentKind::Json) => true,
            (GrammarKind::XPath, ContentKind::Text | ContentKind::Html) => true,
            (GrammarKind::XPath, ContentKind::Json) => false,
            (GrammarKind::JsonQuery, ContentKind::Json) => true,
            (GrammarKind::JsonQuery, ContentKind::Text | ContentKind::Html) => false,
            (GrammarKind::Css, ContentKind::Html) => true,
            (GrammarKind::Css, ContentKind::Text | ContentKind::Json) => false,
        }
    }
}

impl Display for GrammarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GrammarKind::Regex => "regex",
            GrammarKind::Css => "css",
            GrammarKind::XPath => "xpath",
            GrammarKind::JsonQuery => "json",
        };
        f.write_str(name)
    }
}

/// A query string split into its grammar and the grammar's own expression.
///
/// The expression may still carry a `>>` function chain; see [crate::query::Pipeline].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParsedQuery<'a> {
    pub kind: GrammarKind,
    pub expression: &'a str,
}

impl<'a> ParsedQuery<'a> {
    /// Routes a query string by its prefix. A string without a known prefix is a regex.
    ///
    /// This never fails, and never looks at the expression itself.
    pub fn parse(query: &'a str) -> Self {
        for (prefix, kind) in PREFIXES {
            if let Some(expression) = query.strip_prefix(prefix) {
                return Self { kind, expression };
            }
        }
        Self {
            kind: GrammarKind::Regex,
            expression: query,
        }
    }
}
