use super::context::CompileContext;
use crate::{
    result::{Error, Result},
    stage::Stage,
};
use bson::Document;

/// `p_id,name,-secret`. Lifted-up paths are appended after the explicit
/// fields, in the order they were lifted.
pub(super) fn compile_project(props: &str, context: &CompileContext) -> Result<Option<Stage>> {
    let mut body = compile_fields(props, 1, 0)?;
    for path in context.lift_ups.iter() {
        if !body.contains_key(path) {
            body.insert(path.as_str(), 1);
        }
    }
    Ok((!body.is_empty()).then_some(Stage::Project(body)))
}

/// `s_rank,-created`.
pub(super) fn compile_sort(props: &str) -> Result<Option<Stage>> {
    let body = compile_fields(props, 1, -1)?;
    Ok((!body.is_empty()).then_some(Stage::Sort(body)))
}

fn compile_fields(props: &str, included: i32, excluded: i32) -> Result<Document> {
    let mut body = Document::new();
    for token in props.split(',').filter(|token| !token.is_empty()) {
        let (field, value) = match token.strip_prefix('-') {
            Some(field) => (field, excluded),
            None => (token, included),
        };
        if field.is_empty() {
            return Err(Error::MalformedField(token.to_string()));
        }
        body.insert(field, value);
    }
    Ok(body)
}
