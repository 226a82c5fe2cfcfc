use crate::error::ExtractError;
use crate::query::Pipeline;
use crate::select::sel_text_pseudo::{split_pseudo, PseudoSplit};
use crate::select::Adapter;
use scraper::{ElementRef, Html, Selector};

/// CSS selectors over an HTML payload, with the text-predicate pseudo-classes layered on top.
///
/// Each matched element yields its trimmed subtree text, or with `get-attr` its attribute value. Elements with nothing
/// to yield are skipped.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CssAdapter;

impl Adapter for CssAdapter {
    fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError> {
        let html = Html::parse_document(payload);
        let selected: Vec<ElementRef> = match split_pseudo(pipeline.expression) {
            None => {
                let selector = parse_selector(pipeline.expression)?;
                html.select(&selector).collect()
            }
            Some(split) => select_with_predicate(&html, &split)?,
        };

        let found = selected
            .into_iter()
            .filter_map(|element| match &pipeline.attribute {
                Some(attr) => element.value().attr(attr).filter(|value| !value.is_empty()).map(str::to_string),
                None => {
                    let text = element_text(element);
                    (!text.is_empty()).then_some(text)
                }
            })
            .collect();
        Ok(found)
    }
}

fn select_with_predicate<'a>(html: &'a Html, split: &PseudoSplit) -> Result<Vec<ElementRef<'a>>, ExtractError> {
    tracing::debug!(base = split.base, predicate = %split.predicate.kind, trailing = split.trailing, "text predicate");
    let candidates: Vec<ElementRef> = if split.base.is_empty() {
        vec![html.root_element()]
    } else {
        html.select(&parse_selector(split.base)?).collect()
    };
    let trailing = match split.trailing {
        "" => None,
        trailing => Some(parse_selector(trailing)?),
    };

    let mut selected = Vec::new();
    for candidate in candidates {
        if !split.predicate.matches(&element_text(candidate)) {
            continue;
        }
        match &trailing {
            None => selected.push(candidate),
            Some(trailing) => selected.extend(candidate.select(trailing)),
        }
    }
    Ok(selected)
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|err| ExtractError::InvalidSelector {
        selector: selector.to_string(),
        reason: err.to_string(),
    })
}

/// All descendant text nodes, concatenated and trimmed.
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
