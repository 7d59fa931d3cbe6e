use crate::coerce::RawValue;
use lazy_static::lazy_static;
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error;


/// Failure reported by an operator that rejects its argument.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct OperatorError(pub String);

/// An operator receives the raw argument after the `$` and the clause key,
/// and returns the reshaped value that is then coerced.
pub type OperatorFn =
    Arc<dyn Fn(&str, &str) -> Result<RawValue, OperatorError> + Send + Sync + 'static>;

lazy_static! {
    pub static ref DEFAULT_OPERATORS: OperatorRegistry = OperatorRegistry::default();
}

/// Named value transformers usable as `op$arg` in clause values.
#[derive(Clone)]
pub struct OperatorRegistry {
    operators: HashMap<String, OperatorFn>,
}

impl OperatorRegistry {
    /// A registry with no operators, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Adds or replaces an operator.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&str, &str) -> Result<RawValue, OperatorError> + Send + Sync + 'static,
    {
        self.operators.insert(name.into(), Arc::new(f));
    }

    pub fn with_operator<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<RawValue, OperatorError> + Send + Sync + 'static,
    {
        self.register(name, f);
        self
    }

    pub fn get(&self, name: &str) -> Option<&OperatorFn> {
        self.operators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self {
        Self::empty()
            .with_operator("in", in_list)
            .with_operator("first", first_element)
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.names().collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("OperatorRegistry")
            .field("operators", &names)
            .finish()
    }
}

/// `in$1;2;3`: value is one of the listed tokens.
fn in_list(arg: &str, _key: &str) -> Result<RawValue, OperatorError> {
    Ok(RawValue::List(arg.split(';').map(RawValue::from).collect()))
}

/// `first$videos`: a reference to the named field, used with array
/// accumulators such as `$first`.
fn first_element(arg: &str, key: &str) -> Result<RawValue, OperatorError> {
    if arg.is_empty() {
        return Err(OperatorError(format!(
            "`first` on `{key}` needs a field name"
        )));
    }
    Ok(RawValue::Token(format!("${arg}")))
}
