//! Optional request-parameter building.
//!
//! API surfaces in this crate take parameters as `&[(String, String)]` pairs.
//! [`optional_params`] assembles that list from values that may or may not be
//! worth sending: any absent or empty value is dropped entirely rather than
//! serialized as-is.

use tracing::error;

/// A candidate query-parameter value.
///
/// Carries the handful of scalar shapes the wrapped APIs accept, plus a
/// string list which is serialized comma-delimited (`[1, 2, 4]` -> `"1,2,4"`).
///
/// ## Examples
///
/// ```rust
/// use easyrest::ParamValue;
///
/// assert_eq!(ParamValue::from("x").render(), "x");
/// assert_eq!(ParamValue::from(true).render(), "1");
/// assert_eq!(ParamValue::Int(7).render(), "7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl ParamValue {
    /// Whether this value counts as "not worth sending".
    ///
    /// Empty strings, `0`, `0.0`, `false` and empty lists are all treated as
    /// absent and dropped by [`optional_params`]. This means a legitimate
    /// zero or `false` can never be sent through the optional-parameter
    /// path; callers that need them must pass the pair explicitly.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            Self::Bool(b) => !b,
            Self::List(l) => l.is_empty(),
        }
    }

    /// Renders the value into its query-string form.
    ///
    /// Booleans become `0`/`1`, lists are comma-delimited.
    pub fn render(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => bool_to_int(*b).to_string(),
            Self::List(l) => comma_delimit(l.iter().map(String::as_str)),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Builds a parameter list containing only the values actually provided.
///
/// A pair is dropped when its value is `None` or when
/// [`ParamValue::is_empty`] holds; everything else is rendered into its
/// query-string form in input order.
///
/// ## Examples
///
/// ```rust
/// use easyrest::{optional_params, ParamValue};
///
/// let params = optional_params(&[
///     ("a", None),
///     ("b", Some(ParamValue::from(""))),
///     ("c", Some(ParamValue::from("x"))),
///     ("d", Some(ParamValue::Int(0))),
/// ]);
/// assert_eq!(params, vec![("c".to_string(), "x".to_string())]);
/// ```
pub fn optional_params(pairs: &[(&str, Option<ParamValue>)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .filter_map(|(name, value)| match value {
            Some(v) if !v.is_empty() => Some((name.to_string(), v.render())),
            _ => None,
        })
        .collect()
}

/// Converts a boolean to its 0/1 equivalent.
pub fn bool_to_int(boolean: bool) -> u8 {
    if boolean {
        1
    } else {
        0
    }
}

/// Converts a list of ints to a comma-separated string.
///
/// e.g. `[0, 1, 4]` -> `"0,1,4"`
pub fn int_list_to_string(int_list: &[i64]) -> String {
    comma_delimit(int_list.iter().map(|i| i.to_string()))
}

/// Joins items with commas.
pub fn comma_delimit<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Checks that at least one of a set of alternative parameters was provided.
///
/// Emits an error log naming the candidates when none was.
pub fn one_needed(candidates: &[(&str, Option<&ParamValue>)]) -> bool {
    let one_used = candidates
        .iter()
        .any(|(_, v)| matches!(v, Some(value) if !value.is_empty()));
    if !one_used {
        let names = comma_delimit(candidates.iter().map(|(name, _)| *name));
        error!("at least one of the following parameters is required: {names}");
    }
    one_used
}

/// Returns the first provided (name, value) among a set of alternatives.
pub fn which_used<'a>(
    candidates: &[(&'a str, Option<&'a ParamValue>)],
) -> Option<(&'a str, &'a ParamValue)> {
    candidates.iter().find_map(|(name, v)| match v {
        Some(value) if !value.is_empty() => Some((*name, *value)),
        _ => None,
    })
}

/// Checks whether a provided value falls outside the allowed choices.
///
/// Absent values are never invalid; validation only applies to values that
/// would actually be sent.
pub fn is_invalid_choice(value: Option<&ParamValue>, choices: &[&str]) -> bool {
    match value {
        Some(v) if !v.is_empty() => !choices.contains(&v.render().as_str()),
        _ => false,
    }
}
