use crate::{
    operators::OperatorError,
    stage::StageKind,
    usererror::{UserError, UserErrorDisplay},
};

pub type Result<T> = std::result::Result<T, Error>;

/// Every way a query string can fail to compile. All of them are caused by
/// the query itself, so none are retryable.
#[derive(Debug, Clone, PartialEq, Eq, UserErrorDisplay)]
pub enum Error {
    UnknownStage(String),
    UnknownOperator(String),
    MalformedClause(String),
    MalformedJoin { descriptor: String, reason: String },
    MalformedField(String),
    InvalidArgument { kind: StageKind, arg: String },
    Operator { operator: String, source: OperatorError },
}

impl Error {
    /// Compile failures always stem from the request, never from the server.
    pub fn is_client_error(&self) -> bool {
        true
    }
}

impl UserError for Error {
    fn code(&self) -> u32 {
        match self {
            Error::UnknownStage(_) => 1001,
            Error::UnknownOperator(_) => 1002,
            Error::MalformedClause(_) => 1003,
            Error::MalformedJoin { .. } => 1004,
            Error::MalformedField(_) => 1005,
            Error::InvalidArgument { .. } => 1006,
            Error::Operator { .. } => 1007,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            Error::UnknownStage(code) => Some(format!(
                "Unknown stage code `{code}`. Expected one of: {}.",
                StageKind::ALL.map(StageKind::code).join(", ")
            )),
            Error::UnknownOperator(name) => Some(format!(
                "Unknown operator `{name}`. Quote the value ('...') if the `$` is meant literally."
            )),
            Error::MalformedClause(_) => {
                Some("Clauses must have the form `key=value`.".to_string())
            }
            Error::MalformedJoin { .. } => Some(
                "Joins have the form `[+]plural[|singular[|local]]`, e.g. `f_+orders` or `f_clients|client`."
                    .to_string(),
            ),
            Error::MalformedField(_) => None,
            Error::InvalidArgument { kind, .. } => match kind {
                StageKind::Limit | StageKind::Sample => {
                    Some(format!("{kind:?} expects a positive integer."))
                }
                StageKind::Skip => Some("Skip expects a non-negative integer.".to_string()),
                _ => None,
            },
            Error::Operator { .. } => None,
        }
    }

    fn technical_message(&self) -> String {
        match self {
            Error::UnknownStage(code) => format!("no stage registered for code `{code}`"),
            Error::UnknownOperator(name) => format!("no operator registered as `{name}`"),
            Error::MalformedClause(clause) => {
                format!("clause `{clause}` does not split into exactly one key and one value")
            }
            Error::MalformedJoin { descriptor, reason } => {
                format!("join descriptor `{descriptor}` is malformed: {reason}")
            }
            Error::MalformedField(token) => {
                format!("field token `{token}` does not name a field")
            }
            Error::InvalidArgument { kind, arg } => {
                format!("invalid argument `{arg}` for {kind:?} stage")
            }
            Error::Operator { operator, source } => {
                format!("operator `{operator}` failed: {source}")
            }
        }
    }
}
