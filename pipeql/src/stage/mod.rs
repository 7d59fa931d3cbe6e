use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt;


/// The document store's internal identity field, stripped from every result.
pub const ID_FIELD: &str = "_id";

/// The kinds of aggregation stage a query string can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    Unwind,
    Limit,
    Skip,
    Match,
    AddFields,
    Sample,
    Project,
    Sort,
    Count,
    Lookup,
}

/// The parameter shape a stage's segment is parsed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageShape {
    ReferencePath,
    Integer,
    KeyedMap,
    ProjectionMap,
    OrderingMap,
    Name,
    JoinSpec,
}

impl StageKind {
    pub const ALL: [StageKind; 10] = [
        StageKind::Unwind,
        StageKind::Limit,
        StageKind::Skip,
        StageKind::Match,
        StageKind::AddFields,
        StageKind::Sample,
        StageKind::Project,
        StageKind::Sort,
        StageKind::Count,
        StageKind::Lookup,
    ];

    /// Looks up a segment code in the stage type table.
    pub fn from_code(code: &str) -> Option<StageKind> {
        use StageKind::*;
        Some(match code {
            "u" => Unwind,
            "l" => Limit,
            "k" => Skip,
            "m" => Match,
            "a" => AddFields,
            "r" => Sample,
            "p" => Project,
            "s" => Sort,
            "c" => Count,
            "f" => Lookup,
            _ => return None,
        })
    }

    pub fn code(self) -> &'static str {
        use StageKind::*;
        match self {
            Unwind => "u",
            Limit => "l",
            Skip => "k",
            Match => "m",
            AddFields => "a",
            Sample => "r",
            Project => "p",
            Sort => "s",
            Count => "c",
            Lookup => "f",
        }
    }

    pub fn shape(self) -> StageShape {
        use StageKind::*;
        match self {
            Unwind => StageShape::ReferencePath,
            Limit | Skip | Sample => StageShape::Integer,
            Match | AddFields => StageShape::KeyedMap,
            Project => StageShape::ProjectionMap,
            Sort => StageShape::OrderingMap,
            Count => StageShape::Name,
            Lookup => StageShape::JoinSpec,
        }
    }

    /// The MQL operator this kind renders to.
    pub fn operator(self) -> &'static str {
        use StageKind::*;
        match self {
            Unwind => "$unwind",
            Limit => "$limit",
            Skip => "$skip",
            Match => "$match",
            AddFields => "$addFields",
            Sample => "$sample",
            Project => "$project",
            Sort => "$sort",
            Count => "$count",
            Lookup => "$lookup",
        }
    }
}

/// An equality `$lookup` between a local and a foreign field.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub from: String,
    pub local_field: String,
    pub foreign_field: String,
    pub as_var: String,
}

/// One compiled pipeline stage. Each variant carries the payload shape of its
/// `StageKind`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Path of the array field, without the leading `$`.
    Unwind(String),
    Limit(i64),
    Skip(i64),
    Match(Document),
    AddFields(Document),
    Sample(i64),
    Project(Document),
    Sort(Document),
    Count(String),
    Lookup(Lookup),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Unwind(_) => StageKind::Unwind,
            Stage::Limit(_) => StageKind::Limit,
            Stage::Skip(_) => StageKind::Skip,
            Stage::Match(_) => StageKind::Match,
            Stage::AddFields(_) => StageKind::AddFields,
            Stage::Sample(_) => StageKind::Sample,
            Stage::Project(_) => StageKind::Project,
            Stage::Sort(_) => StageKind::Sort,
            Stage::Count(_) => StageKind::Count,
            Stage::Lookup(_) => StageKind::Lookup,
        }
    }

    /// A projection dropping the identity field, optionally of an embedded
    /// document at `path`.
    pub fn strip_id(path: Option<&str>) -> Stage {
        let field = match path {
            Some(path) => format!("{path}.{ID_FIELD}"),
            None => ID_FIELD.to_string(),
        };
        Stage::Project(doc! { field: 0 })
    }

    pub fn to_document(&self) -> Document {
        let body = match self {
            Stage::Unwind(path) => Bson::String(format!("${path}")),
            Stage::Limit(n) | Stage::Skip(n) => Bson::Int64(*n),
            Stage::Sample(size) => Bson::Document(doc! { "size": *size }),
            Stage::Match(d) | Stage::AddFields(d) | Stage::Project(d) | Stage::Sort(d) => {
                Bson::Document(d.clone())
            }
            Stage::Count(name) => Bson::String(name.clone()),
            Stage::Lookup(lookup) => Bson::Document(doc! {
                "from": lookup.from.as_str(),
                "localField": lookup.local_field.as_str(),
                "foreignField": lookup.foreign_field.as_str(),
                "as": lookup.as_var.as_str(),
            }),
        };
        let mut stage = Document::new();
        stage.insert(self.kind().operator(), body);
        stage
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

/// The result of compiling one query string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(Stage::kind).collect()
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }

    /// The pipeline as a BSON array, ready to hand to an aggregate call.
    pub fn to_bson(&self) -> Bson {
        Bson::Array(
            self.stages
                .iter()
                .map(|s| Bson::Document(s.to_document()))
                .collect(),
        )
    }
}
