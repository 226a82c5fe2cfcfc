use crate::query::strip_quotes;
use memchr::memmem;
use std::fmt::{Display, Formatter};

/// The text-predicate pseudo-classes a CSS selector may carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum PredicateKind {
    HasText,
    /// Same subtree-wide match as [PredicateKind::HasText].
    ContainsText,
    TextEquals,
    TextStarts,
    TextEnds,
}

const PREDICATES: [PredicateKind; 5] = [
    PredicateKind::HasText,
    PredicateKind::ContainsText,
    PredicateKind::TextEquals,
    PredicateKind::TextStarts,
    PredicateKind::TextEnds,
];

impl PredicateKind {
    fn name(self) -> &'static str {
        match self {
            PredicateKind::HasText => "has-text",
            PredicateKind::ContainsText => "contains-text",
            PredicateKind::TextEquals => "text-equals",
            PredicateKind::TextStarts => "text-starts",
            PredicateKind::TextEnds => "text-ends",
        }
    }
}

impl Display for PredicateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{}", self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TextPredicate {
    pub kind: PredicateKind,
    pub arg: String,
}

impl TextPredicate {
    /// Tests an element's (already trimmed) subtree text. Case-sensitive.
    pub fn matches(&self, text: &str) -> bool {
        let arg = self.arg.as_str();
        match self.kind {
            PredicateKind::HasText | PredicateKind::ContainsText => text.contains(arg),
            PredicateKind::TextEquals => text == arg,
            PredicateKind::TextStarts => text.starts_with(arg),
            PredicateKind::TextEnds => text.ends_with(arg),
        }
    }
}

/// A selector cut around its text predicate: `base:predicate(arg) trailing`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PseudoSplit<'a> {
    /// Selects the candidates. Empty means the document root.
    pub base: &'a str,
    pub predicate: TextPredicate,
    /// Runs inside each matching candidate. Empty means the candidate itself is the match.
    pub trailing: &'a str,
}

/// Finds the earliest text predicate in `selector`, if any.
///
/// Only one predicate per selector is understood; a second one stays in `trailing`, where the CSS parser will reject
/// it. A predicate whose parentheses never close doesn't count.
pub(crate) fn split_pseudo(selector: &str) -> Option<PseudoSplit<'_>> {
    let mut earliest: Option<(usize, PredicateKind, usize)> = None;
    for kind in PREDICATES {
        let needle = format!(":{}(", kind.name());
        let mut search_from = 0;
        while let Some(found) = memmem::find(&selector.as_bytes()[search_from..], needle.as_bytes()) {
            let start = search_from + found;
            if earliest.is_some_and(|(best, _, _)| best <= start) {
                break;
            }
            let args_from = start + needle.len();
            if let Some(close) = closing_paren(&selector[args_from..]) {
                earliest = Some((start, kind, args_from + close));
                break;
            }
            search_from = args_from;
        }
    }

    let (start, kind, close) = earliest?;
    let args_from = start + kind.name().len() + 2;
    Some(PseudoSplit {
        base: selector[..start].trim(),
        predicate: TextPredicate {
            kind,
            arg: strip_quotes(&selector[args_from..close]).to_string(),
        },
        trailing: selector[close + 1..].trim(),
    })
}

/// Offset of the `)` that balances an already-consumed `(`.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 1usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn no_predicate() {
        assert_eq!(split_pseudo("div.card > a"), None);
        assert_eq!(split_pseudo("div:has(p)"), None);
    }

    #[test]
    fn base_and_predicate() {
        let split = split_pseudo(r#"div.card:has-text("Price")"#).unwrap();
        assert_eq!(split.base, "div.card");
        assert_eq!(split.predicate, predicate(PredicateKind::HasText, "Price"));
        assert_eq!(split.trailing, "");
    }

    #[test]
    fn trailing_selector() {
        let split = split_pseudo("tr:text-starts('Mileage') td.value").unwrap();
        assert_eq!(split.base, "tr");
        assert_eq!(split.predicate, predicate(PredicateKind::TextStarts, "Mileage"));
        assert_eq!(split.trailing, "td.value");
    }

    #[test]
    fn empty_base() {
        let split = split_pseudo(":text-equals(Done)").unwrap();
        assert_eq!(split.base, "");
        assert_eq!(split.predicate, predicate(PredicateKind::TextEquals, "Done"));
    }

    #[test]
    fn nested_parens_in_arg() {
        let split = split_pseudo("span:text-ends('(USD)') b").unwrap();
        assert_eq!(split.predicate, predicate(PredicateKind::TextEnds, "(USD)"));
        assert_eq!(split.trailing, "b");
    }

    #[test]
    fn earliest_predicate_wins() {
        let split = split_pseudo("li:text-ends('x') span:has-text('y')").unwrap();
        assert_eq!(split.predicate, predicate(PredicateKind::TextEnds, "x"));
        assert_eq!(split.trailing, "span:has-text('y')");
    }

    #[test]
    fn unclosed_is_not_a_predicate() {
        assert_eq!(split_pseudo("p:has-text('oops'"), None);
    }

    #[test]
    fn predicate_matching() {
        assert!(predicate(PredicateKind::HasText, "Price").matches("The Price: $10"));
        assert!(predicate(PredicateKind::ContainsText, "Price").matches("The Price: $10"));
        assert!(!predicate(PredicateKind::HasText, "price").matches("The Price: $10"));
        assert!(predicate(PredicateKind::TextEquals, "Done").matches("Done"));
        assert!(!predicate(PredicateKind::TextEquals, "Done").matches("Done!"));
        assert!(predicate(PredicateKind::TextStarts, "VIN").matches("VIN: 123"));
        assert!(predicate(PredicateKind::TextEnds, "USD").matches("100 USD"));
    }

    #[test]
    fn display() {
        assert_eq!(PredicateKind::ContainsText.to_string(), ":contains-text");
    }

    fn predicate(kind: PredicateKind, arg: &str) -> TextPredicate {
        TextPredicate {
            kind,
            arg: arg.to_string(),
        }
    }
}
