use crate::error::ExtractError;
use crate::query::Pipeline;
use crate::select::{stripped, Adapter};
use fancy_regex::Regex;

/// Regex matching over any content type.
///
/// A pattern with no capture groups yields each whole match. A pattern with groups yields every group that
/// participated in each match, in group order, match by match.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RegexAdapter;

impl Adapter for RegexAdapter {
    fn matches(&self, pipeline: &Pipeline, payload: &str) -> Result<Vec<String>, ExtractError> {
        let pattern = pipeline.expression;
        let re = Regex::new(pattern).map_err(|err| ExtractError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        let match_err = |err: fancy_regex::Error| ExtractError::RegexMatch {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        };

        let mut found = Vec::new();
        // captures_len counts the implicit whole-match group
        if re.captures_len() <= 1 {
            for whole in re.find_iter(payload) {
                found.push(whole.map_err(match_err)?.as_str());
            }
        } else {
            for captures in re.captures_iter(payload) {
                let captures = captures.map_err(match_err)?;
                found.extend(captures.iter().skip(1).flatten().map(|group| group.as_str()));
            }
        }
        Ok(stripped(found))
    }
}
