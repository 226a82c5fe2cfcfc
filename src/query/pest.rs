use pest::Parser;
use pest_derive::Parser;
use std::fmt::{Display, Formatter};

#[derive(Parser)]
#[grammar = "query/grammar.pest"] // relative to src
struct ChainPairs;

pub(crate) type Pair<'a> = pest::iterators::Pair<'a, Rule>;
pub(crate) type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

/// A piece of a function chain that didn't match the rule it was parsed against.
///
/// These never leave the crate: a call that doesn't parse simply becomes a step that does nothing. The message
/// only shows up in debug logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Error {
    pest_error: Box<pest::error::Error<Rule>>,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.pest_error, f)
    }
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(value: pest::error::Error<Rule>) -> Self {
        Self {
            pest_error: Box::new(value),
        }
    }
}

pub(crate) struct Chain {
    _private: (),
}

impl Chain {
    pub fn parse(rule: Rule, text: &str) -> Result<Pairs<'_>, Error> {
        Ok(ChainPairs::parse(rule, text)?)
    }

    /// Parses `text` against `rule` and returns the inner pairs of its single top-level pair, or `None` if it
    /// doesn't parse.
    pub fn parse_inner(rule: Rule, text: &str) -> Option<Pairs<'_>> {
        match Self::parse(rule, text) {
            Ok(mut pairs) => pairs.next().map(Pair::into_inner),
            Err(err) => {
                tracing::debug!(?rule, text, "pipeline call didn't parse:\n{err}");
                None
            }
        }
    }
}

/// Finds the text of the first inner pair with the given rule, if any.
pub(crate) fn find_text<'a>(pairs: &Pairs<'a>, rule: Rule) -> Option<&'a str> {
    pairs.clone().find(|pair| pair.as_rule() == rule).map(|pair| pair.as_str())
}
