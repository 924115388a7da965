//! Parsed representation of dot/bracket path expressions.

use std::fmt;

/// One step of a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// Bare token such as `forecast` or `0`.
    ///
    /// Looked up as a mapping key, or as a sequence index when the current
    /// value is a sequence and the token parses as an integer.
    Key(String),
    /// Quoted bracket content such as `["weather.home"]`. Never an index.
    QuotedKey(String),
    /// Unquoted bracket content such as `[0]` or `[-1]`.
    Index(i64),
}

/// Immutable, ordered list of path steps.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathExpression {
    steps: Vec<PathStep>,
}

impl PathExpression {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// True for the identity path, which addresses the root value.
    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for PathExpression {
    /// Renders the canonical form: bare keys joined by dots, quoted keys and
    /// indices in brackets. Keys that would not survive as bare tokens are
    /// rendered quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Key(name) if is_bare_token(name) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathStep::Key(name) | PathStep::QuotedKey(name) => {
                    let quote = if name.contains('"') { '\'' } else { '"' };
                    write!(f, "[{quote}{name}{quote}]")?;
                }
                PathStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

fn is_bare_token(name: &str) -> bool {
    !name.is_empty() && !name.contains(['.', '[', ']'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_mixed_steps_canonically() {
        let expression = PathExpression::new(vec![
            PathStep::QuotedKey("weather.forecast_home".into()),
            PathStep::Key("forecast".into()),
            PathStep::Index(0),
            PathStep::Key("temperature".into()),
        ]);
        assert_eq!(expression.to_string(), r#"["weather.forecast_home"].forecast[0].temperature"#);
    }

    #[test]
    fn bare_key_with_separator_is_rendered_quoted() {
        let expression = PathExpression::new(vec![PathStep::Key("a.b".into())]);
        assert_eq!(expression.to_string(), r#"["a.b"]"#);
    }

    #[test]
    fn empty_expression_is_identity() {
        assert!(PathExpression::default().is_identity());
        assert_eq!(PathExpression::default().to_string(), "");
    }
}
