use crate::query::pipeline::{PipelineStep, StepArg, GET_ATTR};

/// Signatures of the functions a chain understands.
pub fn supported_functions() -> &'static [&'static str] {
    &[
        "normalize-space()",
        "trim()",
        "uppercase()",
        "lowercase()",
        "substring(start, length)",
        "substring-after('delimiter')",
        "substring-before('delimiter')",
        "replace('find', 'replace')",
        "get-attr('attribute')",
    ]
}

impl PipelineStep {
    /// Applies this step to one string.
    ///
    /// Unknown names, and known names with unusable arguments, return the input unchanged.
    pub fn apply(&self, text: String) -> String {
        match (self.name.as_str(), self.args.as_slice()) {
            ("normalize-space", _) => normalize_space(&text),
            ("trim", _) => text.trim().to_string(),
            ("uppercase", _) => text.to_uppercase(),
            ("lowercase", _) => text.to_lowercase(),
            ("substring", [StepArg::Int(start), StepArg::Int(length), ..]) => {
                match (usize::try_from(*start), usize::try_from(*length)) {
                    (Ok(start), Ok(length)) => substring(&text, start, length),
                    _ => text,
                }
            }
            ("substring-after", [StepArg::Text(delimiter)]) => match text.split_once(delimiter.as_str()) {
                Some((_, after)) => after.to_string(),
                None => String::new(),
            },
            ("substring-before", [StepArg::Text(delimiter)]) => match text.split_once(delimiter.as_str()) {
                Some((before, _)) => before.to_string(),
                None => text,
            },
            ("replace", [StepArg::Text(find), StepArg::Text(replace)]) => text.replace(find.as_str(), replace),
            (GET_ATTR, _) => text, // consumed by the CSS adapter before the chain runs
            _ => text,
        }
    }
}

fn normalize_space(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Code-point substring. Both ends clamp to the string.
fn substring(text: &str, start: usize, length: usize) -> String {
    text.chars().skip(start).take(length).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn normalize_space() {
        assert_eq!(apply("normalize-space()", "  Hello   World  "), "Hello World");
        assert_eq!(apply("normalize-space()", "\n\tTest\r\n  Text\t"), "Test Text");
        assert_eq!(apply("normalize-space()", "  Hello   🌍  "), "Hello 🌍");
        assert_eq!(apply("normalize-space()", ""), "");
    }

    #[test]
    fn trim_keeps_inner_whitespace() {
        assert_eq!(apply("trim()", "  Hello World  "), "Hello World");
        assert_eq!(apply("trim()", " This is a great   vehicle! "), "This is a great   vehicle!");
        assert_eq!(apply("trim", "\tbare\n"), "bare");
    }

    #[test]
    fn case_conversion() {
        assert_eq!(apply("uppercase()", "Héllo Wörld"), "HÉLLO WÖRLD");
        assert_eq!(apply("lowercase()", "ÀÉÎ Straße"), "àéî straße");
        assert_eq!(apply("uppercase()", "straße"), "STRASSE");
    }

    #[test]
    fn substring_by_code_point() {
        assert_eq!(apply("substring(0, 5)", "Hello World"), "Hello");
        assert_eq!(apply("substring(6, 5)", "Hello World"), "World");
        assert_eq!(apply("substring(6, 1)", "Hello 🌍 World"), "🌍");
        assert_eq!(apply("substring(1, 2)", "価格: ¥1000"), "格:");
    }

    #[test]
    fn substring_clamps() {
        assert_eq!(apply("substring(10, 5)", "Hello"), "");
        assert_eq!(apply("substring(3, 10)", "Hello"), "lo");
        assert_eq!(apply("substring(2, 0)", "Hello"), "");
    }

    #[test]
    fn substring_negative_is_noop() {
        assert_eq!(apply("substring(-2, 2)", "Hello"), "Hello");
        assert_eq!(apply("substring(1, -1)", "Hello"), "Hello");
    }

    #[test]
    fn substring_bad_args_is_noop() {
        assert_eq!(apply("substring(one, 2)", "Hello"), "Hello");
        assert_eq!(apply("substring(1)", "Hello"), "Hello");
        assert_eq!(apply("substring", "Hello"), "Hello");
    }

    #[test]
    fn substring_after() {
        assert_eq!(apply("substring-after('VIN: ')", "VIN: 1HGCM82633A123456"), "1HGCM82633A123456");
        assert_eq!(apply(r#"substring-after(": $")"#, "Price: $25,000"), "25,000");
        assert_eq!(apply("substring-after('價格: ')", "價格: ¥1000"), "¥1000");
        assert_eq!(apply("substring-after('XYZ')", "Hello World"), "");
        assert_eq!(apply("substring-after('This is much longer')", "Hi"), "");
    }

    #[test]
    fn substring_before_is_asymmetric() {
        assert_eq!(apply("substring-before(': ')", "Price: $25,000"), "Price");
        assert_eq!(apply("substring-before('@')", "user@domain.com"), "user");
        assert_eq!(apply("substring-before(': ')", "Hello World"), "Hello World");
        assert_eq!(apply("substring-before(': END')", "123: END"), "123");
    }

    #[test]
    fn replace_all_literal() {
        assert_eq!(apply(r#"replace("$", "USD ")"#, "$100"), "USD 100");
        assert_eq!(apply("replace('Hello', 'Hi')", "Hello Hello World"), "Hi Hi World");
        assert_eq!(apply("replace('.', '!')", "a.b.c"), "a!b!c");
        assert_eq!(apply("replace('XYZ', 'ABC')", "Hello World"), "Hello World");
    }

    #[test]
    fn replace_bad_args_is_noop() {
        assert_eq!(apply("replace('only-one')", "only-one"), "only-one");
        assert_eq!(apply("replace(a, b)", "a"), "a");
    }

    #[test]
    fn get_attr_is_passthrough_here() {
        assert_eq!(apply("get-attr('href')", "text"), "text");
    }

    #[test]
    fn unknown_is_passthrough() {
        assert_eq!(apply("reverse()", "abc"), "abc");
    }

    #[test]
    fn long_input() {
        let long = "A".repeat(10_000);
        assert_eq!(apply("trim()", &long).len(), 10_000);
    }

    #[test]
    fn every_supported_function_is_known() {
        for signature in supported_functions() {
            let name = signature.split('(').next().unwrap();
            assert!(
                matches!(
                    name,
                    "normalize-space"
                        | "trim"
                        | "uppercase"
                        | "lowercase"
                        | "substring"
                        | "substring-after"
                        | "substring-before"
                        | "replace"
                        | GET_ATTR
                ),
                "{name}"
            );
        }
    }

    fn apply(call: &str, text: &str) -> String {
        PipelineStep::parse(call).apply(text.to_string())
    }
}
