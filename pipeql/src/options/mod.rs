use crate::operators::{OperatorRegistry, DEFAULT_OPERATORS};

/// Options passed in for compilation, used throughout the sub-compilers.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// The collection the pipeline will run against. Used to infer the local
    /// side of collection joins (`f_+orders` on `users` joins on `user_id`).
    pub collection: Option<String>,
    pub operators: OperatorRegistry,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            collection: None,
            operators: DEFAULT_OPERATORS.clone(),
        }
    }
}

impl CompileOptions {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            ..Self::default()
        }
    }

    pub fn with_operators(mut self, operators: OperatorRegistry) -> Self {
        self.operators = operators;
        self
    }
}
