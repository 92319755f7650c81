//! Conditional activation expressions
//!
//! A conditional block in the packages config maps a condition expression
//! to a list of package references; the list is registered and loaded only
//! when the condition holds against the runtime [`Environment`]. The
//! grammar is `<FACT><OP><VALUE>`:
//!
//! - `FACT` — three-letter case-insensitive tag: `APP` (host application
//!   version) or `EXT` (extension presence)
//! - `OP` — one of `<=`, `>=`, `<`, `>`, `!`, `=`
//! - `VALUE` — the rest of the expression
//!
//! `APP<=1.4` activates while the application version is at most 1.4.0;
//! `EXT!curl` activates only when the `curl` extension is absent. Unknown
//! fact tags, operator-less expressions, and operators without defined
//! semantics for their fact make the whole condition inert: it neither
//! activates nor errors.

use keel_core::{parse_version, Environment};
use semver::Version;

/// Comparison operator of a condition expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `!` (negation; `!=` for version facts, absence for extensions)
    Not,
    /// `=`
    Eq,
}

// Two-character operators listed first so "<=" is never read as "<".
const OPERATORS: [(&str, Op); 6] = [
    ("<=", Op::Le),
    (">=", Op::Ge),
    ("<", Op::Lt),
    (">", Op::Gt),
    ("!", Op::Not),
    ("=", Op::Eq),
];

/// Fact a condition expression checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fact {
    /// Host application version
    AppVersion,
    /// Extension presence
    Extension,
}

impl Fact {
    fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "APP" => Some(Fact::AppVersion),
            "EXT" => Some(Fact::Extension),
            _ => None,
        }
    }
}

/// A parsed condition expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Checked fact
    pub fact: Fact,
    /// Comparison operator
    pub op: Op,
    /// Right-hand value
    pub value: String,
}

impl Condition {
    /// Parse an expression. Returns `None` for expressions with no
    /// operator, an unknown fact tag, or an empty value.
    pub fn parse(expr: &str) -> Option<Self> {
        let (pos, token, op) = OPERATORS
            .iter()
            .filter_map(|(token, op)| expr.find(token).map(|pos| (pos, *token, *op)))
            .min_by_key(|(pos, _, _)| *pos)?;

        let fact = Fact::parse(expr[..pos].trim())?;
        let value = expr[pos + token.len()..].trim();

        if value.is_empty() {
            return None;
        }

        Some(Self {
            fact,
            op,
            value: value.to_string(),
        })
    }

    /// Whether the condition holds against the environment
    pub fn holds(&self, env: &Environment) -> bool {
        match self.fact {
            Fact::AppVersion => version_matches(env.version(), &self.value, self.op),
            Fact::Extension => match self.op {
                Op::Not => !env.has_extension(&self.value),
                // Only absence is defined for extensions; anything else
                // makes the condition inert.
                _ => {
                    tracing::debug!(
                        value = %self.value,
                        "Extension condition with undefined operator ignored"
                    );
                    false
                }
            },
        }
    }
}

/// Evaluate a condition expression against the environment.
///
/// Pure with respect to repeated calls: the same expression and
/// environment snapshot always produce the same answer. Malformed or
/// unknown expressions are ignored (logged at debug, never an error).
pub fn evaluate(expr: &str, env: &Environment) -> bool {
    match Condition::parse(expr) {
        Some(condition) => condition.holds(env),
        None => {
            tracing::debug!(condition = %expr, "Unrecognized condition ignored");
            false
        }
    }
}

fn version_matches(current: &Version, value: &str, op: Op) -> bool {
    let target = match parse_version(value) {
        Ok(version) => version,
        Err(_) => {
            tracing::debug!(value = %value, "Unparseable version in condition ignored");
            return false;
        }
    };

    match op {
        Op::Le => *current <= target,
        Op::Ge => *current >= target,
        Op::Lt => *current < target,
        Op::Gt => *current > target,
        Op::Not => *current != target,
        Op::Eq => *current == target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(version: &str) -> Environment {
        Environment::from_version(version).unwrap()
    }

    #[test]
    fn test_version_operators() {
        let e = env("7.4");
        assert!(evaluate("APP<8.0", &e));
        assert!(evaluate("APP<=7.4", &e));
        assert!(evaluate("APP>=7.4", &e));
        assert!(evaluate("APP>7.0", &e));
        assert!(evaluate("APP=7.4", &e));
        assert!(evaluate("APP!8.0", &e));

        assert!(!evaluate("APP<7.4", &e));
        assert!(!evaluate("APP>8.0", &e));
        assert!(!evaluate("APP=8.0", &e));
        assert!(!evaluate("APP!7.4", &e));
    }

    #[test]
    fn test_version_outside_range() {
        assert!(!evaluate("APP<8.0", &env("8.2")));
    }

    #[test]
    fn test_fact_tag_is_case_insensitive() {
        assert!(evaluate("app<8.0", &env("7.4")));
        assert!(evaluate("Ext!curl", &env("1.0")));
    }

    #[test]
    fn test_extension_absence() {
        let without = env("1.0");
        let with = env("1.0").with_extension("curl");

        assert!(evaluate("EXT!curl", &without));
        assert!(!evaluate("EXT!curl", &with));
    }

    #[test]
    fn test_extension_other_operators_ignored() {
        let with = env("1.0").with_extension("curl");
        assert!(!evaluate("EXT=curl", &with));
        assert!(!evaluate("EXT<curl", &with));
    }

    #[test]
    fn test_unknown_fact_ignored() {
        assert!(!evaluate("FOO=1.0", &env("1.0")));
    }

    #[test]
    fn test_missing_operator_ignored() {
        assert!(!evaluate("APP8.0", &env("8.0")));
        assert!(!evaluate("", &env("8.0")));
    }

    #[test]
    fn test_garbage_value_ignored() {
        assert!(!evaluate("APP<abc", &env("8.0")));
    }

    #[test]
    fn test_two_char_operator_wins() {
        let condition = Condition::parse("APP<=8.0").unwrap();
        assert_eq!(condition.op, Op::Le);
        assert_eq!(condition.value, "8.0");
    }

    #[test]
    fn test_repeated_evaluation_is_stable() {
        let e = env("7.4");
        let first = evaluate("APP<8.0", &e);
        let second = evaluate("APP<8.0", &e);
        assert_eq!(first, second);
    }
}
