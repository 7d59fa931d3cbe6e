mod clause;
mod context;
mod field_list;
mod join;

pub use join::{singularize, JoinSpec};

use crate::{
    options::CompileOptions,
    result::{Error, Result},
    stage::{Pipeline, Stage, StageKind, StageShape},
};
use bson::Document;
use context::CompileContext;
use tracing::{event, instrument, Level};


/// Compiles query strings such as `m_status=Pending&f_+orders&p_id,-secret`
/// into aggregation pipelines.
///
/// A query is a list of `&`-separated segments. Each segment is a one-letter
/// stage code, an underscore, and the stage's arguments. Segments compile in
/// order and the resulting stages keep that order; a final projection drops
/// the identity field.
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'a> {
    options: &'a CompileOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(options: &'a CompileOptions) -> Self {
        Self { options }
    }

    #[instrument(skip(self), fields(collection = ?self.options.collection))]
    pub fn compile(&self, query: &str) -> Result<Pipeline> {
        if query.is_empty() {
            return Ok(Pipeline::new(vec![
                Stage::Match(Document::new()),
                Stage::strip_id(None),
            ]));
        }

        let mut context = CompileContext::new();
        let mut stages = Vec::new();
        for segment in query.split('&').filter(|segment| !segment.is_empty()) {
            stages.extend(self.compile_segment(segment, &mut context)?);
        }
        stages.push(Stage::strip_id(None));

        event!(
            Level::DEBUG,
            stages = stages.len(),
            lift_ups = context.lift_ups.len(),
            "compiled pipeline"
        );
        Ok(Pipeline::new(stages))
    }

    fn compile_segment(&self, segment: &str, context: &mut CompileContext) -> Result<Vec<Stage>> {
        let (code, props) = segment.split_once('_').unwrap_or((segment, ""));
        let kind =
            StageKind::from_code(code).ok_or_else(|| Error::UnknownStage(code.to_string()))?;
        event!(Level::TRACE, ?kind, props, "compiling segment");

        Ok(match kind.shape() {
            StageShape::ReferencePath => vec![compile_unwind(props)?],
            StageShape::Integer => {
                let min = if kind == StageKind::Skip { 0 } else { 1 };
                let n = parse_integer(kind, props, min)?;
                vec![match kind {
                    StageKind::Skip => Stage::Skip(n),
                    StageKind::Sample => Stage::Sample(n),
                    _ => Stage::Limit(n),
                }]
            }
            StageShape::KeyedMap => {
                clause::compile_clauses(kind, props, &self.options.operators, context)?
                    .into_iter()
                    .collect()
            }
            StageShape::ProjectionMap => field_list::compile_project(props, context)?
                .into_iter()
                .collect(),
            StageShape::OrderingMap => field_list::compile_sort(props)?.into_iter().collect(),
            StageShape::Name => vec![compile_count(props)?],
            StageShape::JoinSpec => {
                join::compile_joins(props, self.options.collection.as_deref())?
            }
        })
    }
}

fn compile_unwind(props: &str) -> Result<Stage> {
    let path = props.strip_prefix('$').unwrap_or(props);
    if path.is_empty() {
        return Err(Error::InvalidArgument {
            kind: StageKind::Unwind,
            arg: props.to_string(),
        });
    }
    Ok(Stage::Unwind(path.to_string()))
}

fn compile_count(props: &str) -> Result<Stage> {
    if props.is_empty() || props.starts_with('$') || props.contains('.') {
        return Err(Error::InvalidArgument {
            kind: StageKind::Count,
            arg: props.to_string(),
        });
    }
    Ok(Stage::Count(props.to_string()))
}

fn parse_integer(kind: StageKind, props: &str, min: i64) -> Result<i64> {
    match props.parse::<i64>() {
        Ok(n) if n >= min => Ok(n),
        _ => Err(Error::InvalidArgument {
            kind,
            arg: props.to_string(),
        }),
    }
}
