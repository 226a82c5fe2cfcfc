//! Query strings: prefix routing, the content compatibility matrix, and the `>>` function chain.
mod functions;
mod pest;
mod pipeline;
mod prefix;

pub use functions::supported_functions;
pub use pipeline::{FunctionChain, Pipeline, PipelineStep, StepArg, FUNCTION_PIPE};
pub use prefix::{GrammarKind, ParsedQuery};

pub(crate) use pipeline::strip_quotes;
