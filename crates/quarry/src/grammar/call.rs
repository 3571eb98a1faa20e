//! Depth-tracked parsing of aggregate/function-call field strings.
//!
//! Field strings like `ROUND(AVG(price),2)` carry nested calls, bare
//! identifiers, and literals in one piece of text. A single regex cannot
//! balance the parentheses, so this is a small recursive-descent parser:
//! the outermost `name(...)` wrapper is peeled off, the argument text is
//! split at top-level commas only, and each argument is classified and
//! recursed into.

use crate::error::{QueryError, QueryResult};
use crate::grammar::Grammar;
use crate::value::Value;

/// A parsed function call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub name: String,
    pub args: Vec<Arg>,
}

/// One argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Arg {
    /// A nested call, e.g. the `AVG(price)` inside `ROUND(AVG(price),2)`.
    Call(Call),
    /// A bare (possibly dotted) identifier, quoted by the dialect.
    Ident(String),
    /// A numeric or quoted-string literal, rendered by the dialect.
    Literal(Value),
    /// The wildcard, e.g. `COUNT(*)`. Never quoted.
    Star,
}

impl Call {
    /// Render the call back to SQL, quoting identifier arguments and
    /// literal arguments through the grammar's hooks. Nested calls
    /// recurse.
    pub(crate) fn render<G: Grammar + ?Sized>(&self, grammar: &G) -> String {
        let args = self
            .args
            .iter()
            .map(|arg| match arg {
                Arg::Star => "*".to_string(),
                Arg::Ident(name) => grammar.quote_field(name),
                Arg::Literal(value) => grammar.quote_value(value),
                Arg::Call(inner) => inner.render(grammar),
            })
            .collect::<Vec<_>>()
            .join(",");
        format!("{}({args})", self.name)
    }
}

/// Parse a field string that may be a function call.
///
/// Returns `Ok(None)` when the text has no call syntax at all (a plain
/// identifier). Call-shaped text that is malformed, unbalanced, or has
/// trailing garbage fails with [`QueryError::InvalidExpression`].
pub(crate) fn parse(text: &str) -> QueryResult<Option<Call>> {
    let trimmed = text.trim();
    if !trimmed.contains('(') {
        if trimmed.contains(')') {
            return Err(QueryError::invalid_expression(format!(
                "unbalanced parentheses in '{text}'"
            )));
        }
        return Ok(None);
    }
    parse_call(trimmed).map(Some)
}

fn parse_call(text: &str) -> QueryResult<Call> {
    let open = text.find('(').ok_or_else(|| {
        QueryError::invalid_expression(format!("expected a call in '{text}'"))
    })?;
    let name = text[..open].trim();
    if name.is_empty() || !is_call_name(name) {
        return Err(QueryError::invalid_expression(format!(
            "malformed call name in '{text}'"
        )));
    }
    if !text.ends_with(')') {
        return Err(QueryError::invalid_expression(format!(
            "unbalanced parentheses in '{text}'"
        )));
    }

    let inner = &text[open + 1..text.len() - 1];
    let raw_args = split_top_level(inner, text)?;

    let mut args = Vec::with_capacity(raw_args.len());
    for raw in raw_args {
        args.push(parse_arg(raw)?);
    }
    Ok(Call {
        name: name.to_string(),
        args,
    })
}

/// Split argument text at commas that sit outside every nested pair of
/// parentheses and outside string literals.
fn split_top_level<'a>(inner: &'a str, whole: &str) -> QueryResult<Vec<&'a str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut start = 0usize;

    for (i, ch) in inner.char_indices() {
        match ch {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    QueryError::invalid_expression(format!(
                        "unbalanced parentheses in '{whole}'"
                    ))
                })?;
            }
            ',' if !in_string && depth == 0 => {
                parts.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || in_string {
        return Err(QueryError::invalid_expression(format!(
            "unbalanced parentheses in '{whole}'"
        )));
    }
    if !inner.trim().is_empty() || !parts.is_empty() {
        parts.push(&inner[start..]);
    }
    Ok(parts)
}

fn parse_arg(raw: &str) -> QueryResult<Arg> {
    let arg = raw.trim();
    if arg.is_empty() {
        return Err(QueryError::invalid_expression("empty call argument"));
    }
    if arg == "*" {
        return Ok(Arg::Star);
    }
    if arg.starts_with('\'') && arg.ends_with('\'') && arg.len() >= 2 {
        let unquoted = arg[1..arg.len() - 1].replace("''", "'");
        return Ok(Arg::Literal(Value::Text(unquoted)));
    }
    if let Ok(n) = arg.parse::<i64>() {
        return Ok(Arg::Literal(Value::Int(n)));
    }
    if let Ok(f) = arg.parse::<f64>() {
        return Ok(Arg::Literal(Value::Float(f)));
    }
    if arg.contains('(') {
        return parse_call(arg).map(Arg::Call);
    }
    if arg.contains(')') {
        return Err(QueryError::invalid_expression(format!(
            "unbalanced parentheses in '{arg}'"
        )));
    }
    Ok(Arg::Ident(arg.to_string()))
}

fn is_call_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_is_not_a_call() {
        assert_eq!(parse("price").unwrap(), None);
        assert_eq!(parse("orders.id").unwrap(), None);
    }

    #[test]
    fn test_simple_call() {
        let call = parse("SUM(price)").unwrap().unwrap();
        assert_eq!(call.name, "SUM");
        assert_eq!(call.args, vec![Arg::Ident("price".to_string())]);
    }

    #[test]
    fn test_star_argument() {
        let call = parse("COUNT(*)").unwrap().unwrap();
        assert_eq!(call.args, vec![Arg::Star]);
    }

    #[test]
    fn test_nested_call_with_literal() {
        let call = parse("ROUND(AVG(price),2)").unwrap().unwrap();
        assert_eq!(call.name, "ROUND");
        assert_eq!(call.args.len(), 2);
        assert_eq!(
            call.args[0],
            Arg::Call(Call {
                name: "AVG".to_string(),
                args: vec![Arg::Ident("price".to_string())],
            })
        );
        assert_eq!(call.args[1], Arg::Literal(Value::Int(2)));
    }

    #[test]
    fn test_commas_inside_nested_parens() {
        // The comma inside COALESCE must not split ROUND's arguments.
        let call = parse("ROUND(COALESCE(price,0),2)").unwrap().unwrap();
        assert_eq!(call.args.len(), 2);
        match &call.args[0] {
            Arg::Call(inner) => {
                assert_eq!(inner.name, "COALESCE");
                assert_eq!(inner.args.len(), 2);
            }
            other => panic!("expected nested call, got {other:?}"),
        }
    }

    #[test]
    fn test_string_literal_argument() {
        let call = parse("CONCAT(name,' ')").unwrap().unwrap();
        assert_eq!(call.args[1], Arg::Literal(Value::Text(" ".to_string())));
    }

    #[test]
    fn test_unbalanced_fails() {
        assert!(parse("SUM(price").unwrap_err().is_invalid_expression());
        assert!(parse("SUM)price(").unwrap_err().is_invalid_expression());
        assert!(parse("F(a)(b)").unwrap_err().is_invalid_expression());
        assert!(parse("price)").unwrap_err().is_invalid_expression());
    }

    #[test]
    fn test_bad_call_name_fails() {
        assert!(parse("1SUM(price)").unwrap_err().is_invalid_expression());
        assert!(parse("(price)").unwrap_err().is_invalid_expression());
    }

    #[test]
    fn test_empty_argument_fails() {
        assert!(parse("SUM(a,,b)").unwrap_err().is_invalid_expression());
    }

    #[test]
    fn test_zero_argument_call() {
        let call = parse("NOW()").unwrap().unwrap();
        assert!(call.args.is_empty());
    }
}
