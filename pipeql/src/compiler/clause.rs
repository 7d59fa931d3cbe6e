use super::context::CompileContext;
use crate::{
    coerce::{coerce, coerce_token, is_field_reference, parse_finite_float, quoted_literal},
    operators::OperatorRegistry,
    result::{Error, Result},
    stage::{Stage, StageKind},
};
use bson::{Bson, Document};
use tracing::{event, Level};

/// Compiles the arguments of a `$match` or `$addFields` segment.
///
/// `,` separates clause groups, which are ANDed. `|` separates the
/// alternatives of a group, which are ORed.
pub(super) fn compile_clauses(
    kind: StageKind,
    props: &str,
    operators: &OperatorRegistry,
    context: &mut CompileContext,
) -> Result<Option<Stage>> {
    let mut body = Document::new();
    for group in props.split(',').filter(|group| !group.is_empty()) {
        let mut alternatives = group
            .split('|')
            .map(|clause| compile_clause(kind, clause, operators, context))
            .collect::<Result<Vec<(String, Bson)>>>()?;

        if alternatives.len() == 1 {
            if let Some((key, value)) = alternatives.pop() {
                body.insert(key, value);
            }
            continue;
        }

        let or = Bson::Array(
            alternatives
                .into_iter()
                .map(|(key, value)| {
                    let mut alternative = Document::new();
                    alternative.insert(key, value);
                    Bson::Document(alternative)
                })
                .collect(),
        );
        insert_or_group(&mut body, or);
    }

    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(match kind {
        StageKind::AddFields => Stage::AddFields(body),
        _ => Stage::Match(body),
    }))
}

/// The first OR-group takes the `$or` key. Later groups are ANDed through
/// `$and` since a document cannot hold two `$or` keys.
fn insert_or_group(body: &mut Document, or: Bson) {
    if !body.contains_key("$or") {
        body.insert("$or", or);
        return;
    }
    let mut wrapped = Document::new();
    wrapped.insert("$or", or);
    if let Ok(and) = body.get_array_mut("$and") {
        and.push(Bson::Document(wrapped));
        return;
    }
    body.insert("$and", vec![Bson::Document(wrapped)]);
}

fn compile_clause(
    kind: StageKind,
    clause: &str,
    operators: &OperatorRegistry,
    context: &mut CompileContext,
) -> Result<(String, Bson)> {
    let mut parts = clause.split('=');
    let (key, value) = match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() => (key, value),
        _ => return Err(Error::MalformedClause(clause.to_string())),
    };
    let value = compile_value(kind, key, value, operators, context)?;
    Ok((key.to_string(), value))
}

fn compile_value(
    kind: StageKind,
    key: &str,
    value: &str,
    operators: &OperatorRegistry,
    context: &mut CompileContext,
) -> Result<Bson> {
    if let Some((name, arg)) = operator_expression(value) {
        let operator = operators
            .get(name)
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))?;
        let raw = operator(arg, key).map_err(|source| Error::Operator {
            operator: name.to_string(),
            source,
        })?;
        let mut expression = Document::new();
        expression.insert(format!("${name}"), coerce(&raw));
        return Ok(Bson::Document(expression));
    }

    if is_dotted_path(value) {
        if kind == StageKind::AddFields && context.lift_up(value) {
            event!(Level::DEBUG, path = value, "lifting up field");
        }
        return Ok(Bson::String(format!("${value}")));
    }

    Ok(coerce_token(value))
}

/// Splits `op$arg` on the first `$`. A value that starts with `$` is a field
/// reference, and a quoted value is a literal, so neither is an operator.
fn operator_expression(value: &str) -> Option<(&str, &str)> {
    if quoted_literal(value).is_some() {
        return None;
    }
    match value.split_once('$') {
        Some((name, arg)) if !name.is_empty() => Some((name, arg)),
        _ => None,
    }
}

/// Numeric-looking tokens are never paths, even the ones that stay strings.
fn is_dotted_path(value: &str) -> bool {
    value.contains('.')
        && !is_field_reference(value)
        && quoted_literal(value).is_none()
        && parse_finite_float(value).is_none()
}
