//! Compiles compact query strings into document-store aggregation pipelines.
//!
//! ```text
//! m_id=1,status=Pending&f_+orders&p_id,name,-secret
//! ```
//!
//! compiles against the `users` collection to
//!
//! ```text
//! {"$match": {"id": 1, "status": "Pending"}}
//! {"$lookup": {"from": "orders", "localField": "id", "foreignField": "user_id", "as": "orders"}}
//! {"$project": {"id": 1, "name": 1, "secret": 0}}
//! {"$project": {"_id": 0}}
//! ```

pub mod coerce;
mod compiler;
#[cfg(test)]
mod internal_spec_test;
pub mod operators;
pub mod options;
pub mod result;
pub mod stage;
pub mod usererror;

pub use compiler::{singularize, Compiler, JoinSpec};
pub use options::CompileOptions;
pub use result::{Error, Result};
pub use stage::{Pipeline, Stage, StageKind};

/// Compiles `query` for a pipeline running against `collection`, using the
/// built-in operators.
pub fn compile(collection: &str, query: &str) -> Result<Pipeline> {
    compile_with_options(query, &CompileOptions::new(collection))
}

pub fn compile_with_options(query: &str, options: &CompileOptions) -> Result<Pipeline> {
    Compiler::new(options).compile(query)
}
