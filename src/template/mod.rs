//! A small Jinja-style template language for property and variable values.
//!
//! Templates are plain text with `{{ expression }}` substitutions and
//! `{# comment #}` blocks. Expressions are variables, string/number/boolean
//! literals, the `env(name[, default])` and `controller(name)` helpers and the
//! `default`, `upper`, `lower` and `trim` filters.
//!
//! Undefined variables and unresolved helper lookups render as an empty string.
//! Parsing rejects anything else, so rendering a parsed [`Template`] never fails.
//!
//! ```rust
//! use flowlib::template::{render, Context, ControllerIds, Helpers, MapEnv};
//!
//! let env = MapEnv::new().with("REGION", "eu-west-1");
//! let controllers = ControllerIds::new();
//! let helpers = Helpers::new(&env, &controllers);
//! let context: Context = [("bucket", "logs")].into_iter().collect();
//!
//! let out = render("s3://{{ bucket }}/{{ env('REGION') }}", &context, &helpers).unwrap();
//! assert_eq!(out, "s3://logs/eu-west-1");
//! ```

use crate::error::DefinitionError;

mod context;
mod expression;
mod parsing;
mod value;

pub use context::{Context, ControllerIds, EnvLookup, Helpers, MapEnv, ProcessEnv};
pub use expression::{Expression, Filter, Helper};
pub use value::Value;

use parsing::{ExpressionParser, tokenize};

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    Substitution(Expression),
}

/// A parsed template, ready to be rendered any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, DefinitionError> {
        let error = |message: String| DefinitionError::Template {
            template: source.to_string(),
            message,
        };

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(start) = rest.find('{') {
            let (before, tag) = rest.split_at(start);
            text.push_str(before);

            if let Some(body) = tag.strip_prefix("{{") {
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                let (tokens, consumed) = tokenize(body).map_err(error)?;
                let expr = ExpressionParser::new(tokens).parse().map_err(error)?;
                segments.push(Segment::Substitution(expr));
                rest = &body[consumed..];
            } else if let Some(body) = tag.strip_prefix("{#") {
                let end = body
                    .find("#}")
                    .ok_or_else(|| error("unterminated '{#' comment".to_string()))?;
                rest = &body[end + 2..];
            } else if tag.starts_with("{%") {
                return Err(error("statement blocks '{% %}' are not supported".to_string()));
            } else {
                text.push('{');
                rest = &tag[1..];
            }
        }
        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True if the template contains no substitutions.
    pub fn is_constant(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Text(_)))
    }

    /// Names of every variable the template reads, in order of appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for segment in &self.segments {
            if let Segment::Substitution(expr) = segment {
                expr.variables(&mut out);
            }
        }
        out
    }

    pub fn render(&self, context: &Context, helpers: &Helpers<'_>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Substitution(expr) => {
                    if let Some(value) = expr.eval(context, helpers) {
                        out.push_str(&value.to_string());
                    }
                }
            }
        }
        out
    }
}

/// Parses and renders `source` in one step.
pub fn render(
    source: &str,
    context: &Context,
    helpers: &Helpers<'_>,
) -> Result<String, DefinitionError> {
    Ok(Template::parse(source)?.render(context, helpers))
}
