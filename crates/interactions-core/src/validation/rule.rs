//! Rule expressions and the per-field rule set.
//!
//! Expressions look like `"required|numeric|min:0"`. When an expression has
//! no `|` at all, `,` separates rules instead (`"required,numeric,min:0"`);
//! rules taking several arguments (`between:1,10`, `in:a,b`) need the `|`
//! form.

use std::fmt;

use indexmap::IndexMap;

/// RuleParseError は 1 つのルールトークンの解析エラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleParseError {
    #[error("empty rule")]
    Empty,

    #[error("rule `{rule}` expects {expected} argument(s), got {got}")]
    Arity {
        rule: String,
        expected: usize,
        got: usize,
    },

    #[error("rule `{rule}` expects a number, got `{arg}`")]
    NotANumber { rule: String, arg: String },
}

/// A single parsed rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Required,
    Nullable,
    Bail,
    Numeric,
    Integer,
    String,
    Boolean,
    Array,
    Email,
    Min(f64),
    Max(f64),
    Between(f64, f64),
    In(Vec<String>),
    /// Named predicate looked up in the registry (`object:Interaction`).
    Custom { name: String, args: Vec<String> },
    /// Kept so that validation fails closed instead of silently passing.
    Malformed { token: String, error: RuleParseError },
}

impl Rule {
    /// Parses one token such as `min:0` or `object:Interaction`.
    pub fn parse(token: &str) -> Result<Rule, RuleParseError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(RuleParseError::Empty);
        }

        let (name, args) = match token.split_once(':') {
            Some((name, rest)) => (
                name.trim(),
                rest.split(',').map(|a| a.trim().to_string()).collect(),
            ),
            None => (token, Vec::new()),
        };

        let rule = match name {
            "required" => Rule::Required,
            "nullable" => Rule::Nullable,
            "bail" => Rule::Bail,
            "numeric" => Rule::Numeric,
            "integer" => Rule::Integer,
            "string" => Rule::String,
            "boolean" => Rule::Boolean,
            "array" => Rule::Array,
            "email" => Rule::Email,
            "min" => Rule::Min(single_number(name, &args)?),
            "max" => Rule::Max(single_number(name, &args)?),
            "between" => {
                if args.len() != 2 {
                    return Err(RuleParseError::Arity {
                        rule: name.to_string(),
                        expected: 2,
                        got: args.len(),
                    });
                }
                Rule::Between(number(name, &args[0])?, number(name, &args[1])?)
            }
            "in" => {
                if args.is_empty() {
                    return Err(RuleParseError::Arity {
                        rule: name.to_string(),
                        expected: 1,
                        got: 0,
                    });
                }
                Rule::In(args)
            }
            other => Rule::Custom {
                name: other.to_string(),
                args,
            },
        };
        Ok(rule)
    }

    /// Like [`Rule::parse`] but never fails: errors become [`Rule::Malformed`].
    pub fn parse_lenient(token: &str) -> Rule {
        Rule::parse(token).unwrap_or_else(|error| Rule::Malformed {
            token: token.trim().to_string(),
            error,
        })
    }

    /// Message key of the rule.
    pub fn name(&self) -> &str {
        match self {
            Rule::Required => "required",
            Rule::Nullable => "nullable",
            Rule::Bail => "bail",
            Rule::Numeric => "numeric",
            Rule::Integer => "integer",
            Rule::String => "string",
            Rule::Boolean => "boolean",
            Rule::Array => "array",
            Rule::Email => "email",
            Rule::Min(_) => "min",
            Rule::Max(_) => "max",
            Rule::Between(_, _) => "between",
            Rule::In(_) => "in",
            Rule::Custom { name, .. } => name.as_str(),
            Rule::Malformed { .. } => "malformed",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Min(n) => write!(f, "min:{n}"),
            Rule::Max(n) => write!(f, "max:{n}"),
            Rule::Between(a, b) => write!(f, "between:{a},{b}"),
            Rule::In(values) => write!(f, "in:{}", values.join(",")),
            Rule::Custom { name, args } if args.is_empty() => f.write_str(name),
            Rule::Custom { name, args } => write!(f, "{name}:{}", args.join(",")),
            Rule::Malformed { token, .. } => f.write_str(token),
            other => f.write_str(other.name()),
        }
    }
}

fn single_number(rule: &str, args: &[String]) -> Result<f64, RuleParseError> {
    match args {
        [arg] => number(rule, arg),
        _ => Err(RuleParseError::Arity {
            rule: rule.to_string(),
            expected: 1,
            got: args.len(),
        }),
    }
}

fn number(rule: &str, arg: &str) -> Result<f64, RuleParseError> {
    arg.parse::<f64>()
        .map_err(|_| RuleParseError::NotANumber {
            rule: rule.to_string(),
            arg: arg.to_string(),
        })
}

/// Splits an expression into tokens.
fn tokenize(expr: &str) -> Vec<&str> {
    let sep = if expr.contains('|') { '|' } else { ',' };
    expr.split(sep)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Field name → rules, in declaration order.
///
/// # 使用例
/// ```ignore
/// Rules::new()
///     .field("meters", "required|numeric|min:0")
///     .field("inception", "object:Interaction")
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rules {
    fields: IndexMap<String, Vec<Rule>>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares rules for `field`. Malformed tokens are kept as
    /// [`Rule::Malformed`]; see [`Rules::malformed`].
    pub fn field(mut self, field: impl Into<String>, expr: &str) -> Self {
        let rules = tokenize(expr).into_iter().map(Rule::parse_lenient);
        self.fields.entry(field.into()).or_default().extend(rules);
        self
    }

    /// Strict variant of [`Rules::field`].
    pub fn try_field(mut self, field: impl Into<String>, expr: &str) -> Result<Self, RuleParseError> {
        let rules = tokenize(expr)
            .into_iter()
            .map(Rule::parse)
            .collect::<Result<Vec<_>, _>>()?;
        self.fields.entry(field.into()).or_default().extend(rules);
        Ok(self)
    }

    /// Declares already-built rules.
    pub fn rules(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.entry(field.into()).or_default().extend(rules);
        self
    }

    pub fn get(&self, field: &str) -> &[Rule] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `(field, custom predicate name)` for every custom rule.
    pub fn custom_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().flat_map(|(field, rules)| {
            rules.iter().filter_map(move |rule| match rule {
                Rule::Custom { name, .. } => Some((field, name.as_str())),
                _ => None,
            })
        })
    }

    /// `(field, token, error)` for every malformed rule.
    pub fn malformed(&self) -> impl Iterator<Item = (&str, &str, &RuleParseError)> {
        self.iter().flat_map(|(field, rules)| {
            rules.iter().filter_map(move |rule| match rule {
                Rule::Malformed { token, error } => Some((field, token.as_str(), error)),
                _ => None,
            })
        })
    }
}

impl<K: Into<String>> FromIterator<(K, &'static str)> for Rules {
    fn from_iter<It: IntoIterator<Item = (K, &'static str)>>(iter: It) -> Self {
        iter.into_iter()
            .fold(Rules::new(), |rules, (field, expr)| rules.field(field, expr))
    }
}
