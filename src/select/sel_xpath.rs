use crate::error::ExtractError;
use crate::query::Pipeline;
use crate::select::{stripped, Adapter};
use sxd_xpath::{Context, Factory, Value};

/// XPath 1.0 over a leniently-parsed HTML document.
///
/// Text content goes through the same HTML parser, so a plain-text payload is a document whose body holds one text
/// node.
#[derive(Copy, Clone, Debug)]
pub(crate) struct XPathAdapter;

impl Adapter for XPathAdapter {
    fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError> {
        let expression = pipeline.expression;
        let invalid = |reason: String| ExtractError::InvalidXPath {
            expression: expression.to_string(),
            reason,
        };
        let compiled = match Factory::new().build(expression) {
            Ok(Some(compiled)) => compiled,
            Ok(None) => return Err(invalid("expression is empty".to_string())),
            Err(err) => return Err(invalid(err.to_string())),
        };

        let package: sxd_document::Package = sxd_html::parse_html(payload);
        let document = package.as_document();
        let context = Context::new();
        let value = compiled
            .evaluate(&context, document.root())
            .map_err(|err| ExtractError::XPathEval {
                expression: expression.to_string(),
                reason: err.to_string(),
            })?;

        let found = match value {
            Value::Nodeset(nodes) => nodes.document_order().iter().map(|node| node.string_value()).collect(),
            Value::String(text) => vec![text],
            Value::Number(number) => vec![number_to_string(number)],
            Value::Boolean(flag) => vec![flag.to_string()],
        };
        Ok(stripped(found))
    }
}

/// XPath's `string()` conversion for numbers.
fn number_to_string(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if number == number.trunc() && number.abs() < 1e15 {
        // also folds -0 into 0
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}
