use super::{Context, Helpers, Value};
use itertools::Itertools;
use std::fmt;

/// Helper functions callable from a template expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// `env(name[, default])`
    Env,
    /// `controller(name)`
    Controller,
}

impl Helper {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "env" => Some(Helper::Env),
            "controller" => Some(Helper::Controller),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Helper::Env => "env",
            Helper::Controller => "controller",
        }
    }

    /// Minimum and maximum number of arguments.
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Helper::Env => (1, 2),
            Helper::Controller => (1, 1),
        }
    }
}

/// Filters applied with `value | filter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Default,
    Upper,
    Lower,
    Trim,
}

impl Filter {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" | "d" => Some(Filter::Default),
            "upper" => Some(Filter::Upper),
            "lower" => Some(Filter::Lower),
            "trim" => Some(Filter::Trim),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Default => "default",
            Filter::Upper => "upper",
            Filter::Lower => "lower",
            Filter::Trim => "trim",
        }
    }

    pub fn arity(&self) -> (usize, usize) {
        match self {
            Filter::Default => (1, 1),
            Filter::Upper | Filter::Lower | Filter::Trim => (0, 0),
        }
    }
}

/// A parsed `{{ ... }}` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    Variable(String),
    Call {
        helper: Helper,
        args: Vec<Expression>,
    },
    Filter {
        input: Box<Expression>,
        filter: Filter,
        args: Vec<Expression>,
    },
}

impl Expression {
    /// Evaluates the expression. `None` means the result is undefined.
    pub fn eval(&self, context: &Context, helpers: &Helpers<'_>) -> Option<Value> {
        match self {
            Expression::Literal(v) => Some(v.clone()),
            Expression::Variable(name) => context.get(name).cloned(),
            Expression::Call { helper, args } => {
                let key = args
                    .first()
                    .and_then(|a| a.eval(context, helpers))
                    .map(|v| v.to_string())?;
                match helper {
                    Helper::Env => helpers
                        .env
                        .lookup(&key)
                        .map(Value::String)
                        .or_else(|| args.get(1).and_then(|a| a.eval(context, helpers))),
                    Helper::Controller => helpers
                        .controllers
                        .lookup(&key)
                        .map(|id| Value::String(id.to_string())),
                }
            }
            Expression::Filter {
                input,
                filter,
                args,
            } => {
                let value = input.eval(context, helpers);
                match filter {
                    Filter::Default => match value {
                        Some(v) if !v.is_null() => Some(v),
                        _ => args.first().and_then(|a| a.eval(context, helpers)),
                    },
                    Filter::Upper => value.map(|v| Value::String(v.to_string().to_uppercase())),
                    Filter::Lower => value.map(|v| Value::String(v.to_string().to_lowercase())),
                    Filter::Trim => value.map(|v| Value::String(v.to_string().trim().to_string())),
                }
            }
        }
    }

    /// Collects the names of every variable the expression reads.
    pub fn variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) => {}
            Expression::Variable(name) => out.push(name),
            Expression::Call { args, .. } => args.iter().for_each(|a| a.variables(out)),
            Expression::Filter { input, args, .. } => {
                input.variables(out);
                args.iter().for_each(|a| a.variables(out));
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(Value::String(s)) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Expression::Literal(Value::Null) => write!(f, "none"),
            Expression::Literal(v) => write!(f, "{}", v),
            Expression::Variable(name) => write!(f, "{}", name),
            Expression::Call { helper, args } => {
                write!(f, "{}({})", helper.name(), args.iter().join(", "))
            }
            Expression::Filter {
                input,
                filter,
                args,
            } => {
                write!(f, "{} | {}", input, filter.name())?;
                if !args.is_empty() {
                    write!(f, "({})", args.iter().join(", "))?;
                }
                Ok(())
            }
        }
    }
}
