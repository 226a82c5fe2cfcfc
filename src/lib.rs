//! Pull strings out of text, HTML and JSON with one query syntax.
//!
//! A query string picks its engine with a prefix: `regex:` (the default, when there's no prefix), `css:`, `xpath:`
//! or `json:` (JMESPath). Any query can end in a chain of string functions after `>>`:
//!
//! ```
//! use strainer::Strainer;
//!
//! let mut strainer = Strainer::silent();
//! strainer.add_html(r#"<div class="car"><span>VIN: 1HGCM82633A</span></div>"#);
//! strainer.add_json(r#"{"cars": [{"model": "Civic"}, {"model": "Accord"}]}"#);
//!
//! assert_eq!(
//!     strainer.query(-1, "css:div.car:has-text('VIN') span >> substring-after('VIN: ')"),
//!     ["1HGCM82633A"]
//! );
//! assert_eq!(strainer.query(-1, "json:cars[*].model >> uppercase"), ["CIVIC", "ACCORD"]);
//! ```
//!
//! See [Strainer] for the query combinators, and [supported_functions] for the chain's functions.
mod content;
pub mod error;
mod query;
pub mod run;
mod select;
mod strainer;

pub use content::{ContentItem, ContentKind};
pub use error::{ExtractError, TracingSink, Warning, WarningSink};
pub use query::{
    supported_functions, FunctionChain, GrammarKind, ParsedQuery, Pipeline, PipelineStep, StepArg, FUNCTION_PIPE,
};
pub use strainer::{default_valid, Strainer};
