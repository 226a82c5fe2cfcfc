use crate::query::pest::{find_text, Chain, Rule};
use memchr::memmem;
use std::fmt::{Display, Formatter};

/// Separates an expression from its function chain, and one call in the chain from the next.
///
/// This isn't `|`, because that's already the union operator in XPath and the pipe operator in JMESPath.
pub const FUNCTION_PIPE: &str = ">>";

/// Name of the chain function that switches CSS extraction from text to an attribute value.
pub(crate) const GET_ATTR: &str = "get-attr";

/// One argument of a [PipelineStep].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StepArg {
    Text(String),
    Int(i64),
}

/// One call in a function chain, such as `substring(0, 3)`.
///
/// Arguments are interpreted per function when the step is parsed. A known function whose arguments don't have the
/// shape it needs keeps its raw argument text instead, and then does nothing when applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PipelineStep {
    pub name: String,
    pub args: Vec<StepArg>,
}

impl PipelineStep {
    pub fn new(name: impl Into<String>, args: Vec<StepArg>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Parses a single call token like `replace('a', 'b')` or `trim`.
    pub fn parse(token: &str) -> Self {
        let Some(pairs) = Chain::parse_inner(Rule::call, token) else {
            return Self::new(token.trim(), Vec::new());
        };
        let name = find_text(&pairs, Rule::call_name).unwrap_or_default().trim();
        let args = match find_text(&pairs, Rule::call_args) {
            None => Vec::new(),
            Some(raw) => parse_args(name, raw),
        };
        Self::new(name, args)
    }
}

impl Display for PipelineStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            match arg {
                StepArg::Text(text) => write!(f, "{text:?}")?,
                StepArg::Int(value) => write!(f, "{value}")?,
            }
        }
        f.write_str(")")
    }
}

fn parse_args(name: &str, raw: &str) -> Vec<StepArg> {
    match name {
        "substring" => {
            let ints: Option<Vec<_>> = raw.split(',').map(|arg| arg.trim().parse::<i64>().ok()).collect();
            match ints {
                Some(ints) => ints.into_iter().map(StepArg::Int).collect(),
                None => vec![StepArg::Text(raw.to_string())],
            }
        }
        "replace" => match Chain::parse_inner(Rule::replace_args, raw.trim()) {
            Some(pairs) => {
                let find = find_text(&pairs, Rule::replace_find).unwrap_or_default();
                let replace = find_text(&pairs, Rule::replace_with).unwrap_or_default();
                vec![StepArg::Text(find.to_string()), StepArg::Text(replace.to_string())]
            }
            None => vec![StepArg::Text(raw.to_string())],
        },
        GET_ATTR => match Chain::parse_inner(Rule::attr_arg, raw.trim()) {
            Some(pairs) => {
                let attr = find_text(&pairs, Rule::attr_name).unwrap_or_default();
                vec![StepArg::Text(attr.to_string())]
            }
            None => Vec::new(),
        },
        _ => vec![StepArg::Text(strip_quotes(raw).to_string())],
    }
}

/// Trims whitespace, and then any run of quote characters at either end.
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|ch| ch == '\'' || ch == '"')
}

/// An ordered chain of [PipelineStep]s.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FunctionChain {
    steps: Vec<PipelineStep>,
}

impl FunctionChain {
    /// Parses everything after the first `>>` of a query.
    pub fn parse(chain: &str) -> Self {
        let steps = chain
            .split(FUNCTION_PIPE)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(PipelineStep::parse)
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Removes every well-formed `get-attr('name')` step, and returns the first one's attribute name.
    ///
    /// A `get-attr` whose argument isn't a quoted attribute name stays in the chain, where it does nothing.
    pub(crate) fn take_attribute(&mut self) -> Option<String> {
        let mut found = None;
        self.steps.retain(|step| match (step.name.as_str(), step.args.as_slice()) {
            (GET_ATTR, [StepArg::Text(attr)]) => {
                found.get_or_insert_with(|| attr.clone());
                false
            }
            _ => true,
        });
        found
    }

    /// Runs every step over `results` in order. Empty strings are dropped after each step.
    pub fn apply(&self, mut results: Vec<String>) -> Vec<String> {
        for step in &self.steps {
            results = results
                .into_iter()
                .map(|text| step.apply(text))
                .filter(|text| !text.is_empty())
                .collect();
        }
        results
    }
}

/// A query expression split from its function chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
    /// What the grammar engine evaluates.
    pub expression: &'a str,
    /// The attribute named by `get-attr`, if the chain had one.
    pub attribute: Option<String>,
    pub chain: FunctionChain,
}

impl<'a> Pipeline<'a> {
    /// Splits at the first `>>`. Without one, the whole input is the expression (untrimmed) and the chain is empty.
    pub fn split(input: &'a str) -> Self {
        let Some(pipe_at) = memmem::find(input.as_bytes(), FUNCTION_PIPE.as_bytes()) else {
            return Self {
                expression: input,
                attribute: None,
                chain: FunctionChain::default(),
            };
        };
        let mut chain = FunctionChain::parse(&input[pipe_at + FUNCTION_PIPE.len()..]);
        let attribute = chain.take_attribute();
        Self {
            expression: input[..pipe_at].trim(),
            attribute,
            chain,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_without_pipe() {
        let pipeline = Pipeline::split(" .price ");
        assert_eq!(pipeline.expression, " .price ");
        assert!(pipeline.chain.is_empty());
        assert_eq!(pipeline.attribute, None);
    }

    #[test]
    fn split_at_first_pipe() {
        let pipeline = Pipeline::split(" .price  >> trim() >>uppercase");
        assert_eq!(pipeline.expression, ".price");
        assert_eq!(names(&pipeline.chain), ["trim", "uppercase"]);
    }

    #[test]
    fn empty_tokens_ignored() {
        let pipeline = Pipeline::split("x >> >> trim() >>  >>");
        assert_eq!(names(&pipeline.chain), ["trim"]);
    }

    #[test]
    fn step_args() {
        assert_eq!(
            PipelineStep::parse("substring(1, 3)"),
            PipelineStep::new("substring", vec![StepArg::Int(1), StepArg::Int(3)])
        );
        assert_eq!(
            PipelineStep::parse("substring(a, 3)"),
            PipelineStep::new("substring", vec![StepArg::Text("a, 3".to_string())])
        );
        assert_eq!(
            PipelineStep::parse("substring-after('VIN: ')"),
            PipelineStep::new("substring-after", vec![StepArg::Text("VIN: ".to_string())])
        );
        assert_eq!(
            PipelineStep::parse(r#"replace("$", 'USD ')"#),
            PipelineStep::new(
                "replace",
                vec![StepArg::Text("$".to_string()), StepArg::Text("USD ".to_string())]
            )
        );
        assert_eq!(
            PipelineStep::parse("replace('only-one')"),
            PipelineStep::new("replace", vec![StepArg::Text("'only-one'".to_string())])
        );
        assert_eq!(PipelineStep::parse("lowercase"), PipelineStep::new("lowercase", vec![]));
    }

    #[test]
    fn step_display() {
        assert_eq!(PipelineStep::parse("substring( 0 ,2 )").to_string(), "substring(0, 2)");
        assert_eq!(
            PipelineStep::parse("substring-before(': ')").to_string(),
            r#"substring-before(": ")"#
        );
    }

    #[test]
    fn get_attr_taken_out_of_chain() {
        let pipeline = Pipeline::split("a.link >> trim() >> get-attr('href') >> uppercase()");
        assert_eq!(pipeline.attribute.as_deref(), Some("href"));
        assert_eq!(names(&pipeline.chain), ["trim", "uppercase"]);
    }

    #[test]
    fn get_attr_first_wins() {
        let pipeline = Pipeline::split(r#"a >> get-attr("data-id") >> get-attr('href')"#);
        assert_eq!(pipeline.attribute.as_deref(), Some("data-id"));
        assert!(pipeline.chain.is_empty());
    }

    #[test]
    fn get_attr_unquoted_is_left_alone() {
        let pipeline = Pipeline::split("a >> get-attr(href)");
        assert_eq!(pipeline.attribute, None);
        assert_eq!(names(&pipeline.chain), ["get-attr"]);
    }

    #[test]
    fn filter_after_every_step() {
        let chain = FunctionChain::parse("substring-after(': ') >> uppercase()");
        let results = chain.apply(vec!["a: b".to_string(), "no delimiter".to_string(), "c: d".to_string()]);
        assert_eq!(results, ["B", "D"]);
    }

    #[test]
    fn unknown_function_passes_through() {
        let chain = FunctionChain::parse("reverse() >> nonsense");
        let input = vec!["abc".to_string(), " ".to_string()];
        assert_eq!(chain.apply(input.clone()), input);
    }

    fn names(chain: &FunctionChain) -> Vec<&str> {
        chain.steps().iter().map(|step| step.name.as_str()).collect()
    }
}
