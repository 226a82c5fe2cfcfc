use crate::error::ExtractError;
use crate::query::Pipeline;
use crate::select::Adapter;
use jmespath::Variable;

/// JMESPath over a JSON payload.
///
/// A top-level array result yields one string per element; anything else yields (at most) one string. Composite
/// values are serialized as compact JSON. Nulls and empty strings are dropped, but nothing is trimmed.
#[derive(Copy, Clone, Debug)]
pub(crate) struct JsonQueryAdapter;

impl Adapter for JsonQueryAdapter {
    fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError> {
        let expression = pipeline.expression;
        let value: serde_json::Value = serde_json::from_str(payload).map_err(|err| ExtractError::InvalidJson {
            reason: err.to_string(),
        })?;
        let compiled = jmespath::compile(expression).map_err(|err| ExtractError::InvalidJsonQuery {
            expression: expression.to_string(),
            reason: err.to_string(),
        })?;
        let result = compiled.search(&value).map_err(|err| ExtractError::JsonQueryEval {
            expression: expression.to_string(),
            reason: err.to_string(),
        })?;

        let mut found = Vec::new();
        match &*result {
            Variable::Array(elements) => {
                for element in elements {
                    found.extend(stringify(element)?);
                }
            }
            single => found.extend(stringify(single)?),
        }
        found.retain(|text| !text.is_empty());
        Ok(found)
    }
}

fn stringify(value: &Variable) -> Result<Option<String>, ExtractError> {
    let text = match value {
        Variable::Null => return Ok(None),
        Variable::Bool(value) => value.to_string(),
        Variable::Number(value) => value.to_string(),
        Variable::String(value) => value.clone(),
        Variable::Array(_) | Variable::Object(_) => {
            serde_json::to_string(value).map_err(|err| ExtractError::Serialize {
                reason: err.to_string(),
            })?
        }
        Variable::Expref(_) => return Ok(None),
    };
    Ok(Some(text))
}

#[cfg(test)]
mod test {
    use super::*;
    use indoc::indoc;

    const STORE: &str = indoc! {r#"
        {
          "store": {
            "name": "Main Street",
            "open": true,
            "rating": 4.5,
            "products": [
              {"name": "Widget", "price": 10, "tags": ["a", "b"]},
              {"name": "Gadget", "price": 25, "tags": []},
              {"name": "", "price": null}
            ]
          }
        }
    "#};

    #[test]
    fn scalar() {
        assert_eq!(run("store.name", STORE), ["Main Street"]);
        assert_eq!(run("store.open", STORE), ["true"]);
        assert_eq!(run("store.rating", STORE), ["4.5"]);
    }

    #[test]
    fn top_level_array_is_flattened() {
        assert_eq!(run("store.products[*].name", STORE), ["Widget", "Gadget"]);
        assert_eq!(run("store.products[*].price", STORE), ["10", "25"]);
    }

    #[test]
    fn nested_arrays_are_serialized() {
        assert_eq!(run("store.products[*].tags", STORE), [r#"["a","b"]"#, "[]"]);
    }

    #[test]
    fn objects_are_serialized_with_sorted_keys() {
        assert_eq!(run("store.products[0]", STORE), [r#"{"name":"Widget","price":10,"tags":["a","b"]}"#]);
    }

    #[test]
    fn missing_is_empty() {
        assert_eq!(run("store.missing", STORE), Vec::<String>::new());
        assert_eq!(run("store.products[2].price", STORE), Vec::<String>::new());
    }

    #[test]
    fn strings_are_not_trimmed() {
        assert_eq!(run("padded", r#"{"padded": "  x  "}"#), ["  x  "]);
    }

    #[test]
    fn invalid_json() {
        let err = JsonQueryAdapter.matches(&Pipeline::split("a"), "{not json").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJson { .. }));
    }

    #[test]
    fn invalid_expression() {
        let err = JsonQueryAdapter.matches(&Pipeline::split("store.[["), STORE).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidJsonQuery { .. }));
    }

    fn run(expression: &str, payload: &str) -> Vec<String> {
        JsonQueryAdapter.matches(&Pipeline::split(expression), payload).unwrap()
    }
}
