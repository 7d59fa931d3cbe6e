use crate::{
    result::{Error, Result},
    stage::{Lookup, Stage},
};
use serde::Serialize;
use tracing::{event, Level};

/// A resolved join descriptor of an `f_` segment.
///
/// `+orders` attaches every order pointing at this document as an array.
/// `clients|client` attaches the one client this document points at, and
/// unwinds it into an embedded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinSpec {
    pub foreign_plural: String,
    /// Always present for single joins. Collection joins never read it, so a
    /// plural that cannot be singularized leaves it empty.
    pub foreign_singular: Option<String>,
    /// Singular name of the joining side. Only collection joins need it, and
    /// it is absent when it cannot be inferred.
    pub local_singular: Option<String>,
    pub is_collection_join: bool,
    /// Either empty or the previous join's alias followed by a dot.
    pub path_prefix: String,
}

/// Drops the last character: `orders` -> `order`. Irregular plurals must be
/// spelled out in the descriptor.
pub fn singularize(plural: &str) -> Option<&str> {
    let mut chars = plural.chars();
    chars.next_back()?;
    let singular = chars.as_str();
    (!singular.is_empty()).then_some(singular)
}

impl JoinSpec {
    /// Resolves `[+]plural[|singular[|local]]`. `default_local` is the
    /// singular name of the compiled collection, used when the descriptor
    /// omits the local name.
    pub fn parse(
        descriptor: &str,
        default_local: Option<&str>,
        path_prefix: String,
    ) -> Result<JoinSpec> {
        let malformed = |reason: &str| Error::MalformedJoin {
            descriptor: descriptor.to_string(),
            reason: reason.to_string(),
        };

        let (is_collection_join, names) = match descriptor.strip_prefix('+') {
            Some(names) => (true, names),
            None => (false, descriptor),
        };
        let names = names.split('|').collect::<Vec<_>>();
        if names.len() > 3 {
            return Err(malformed("at most three names are allowed"));
        }
        if names.iter().any(|name| name.is_empty()) {
            return Err(malformed("names must not be empty"));
        }

        let foreign_plural = names[0];
        let foreign_singular = names
            .get(1)
            .copied()
            .or_else(|| singularize(foreign_plural));
        if !is_collection_join && foreign_singular.is_none() {
            return Err(malformed(
                "cannot infer the singular of the foreign collection",
            ));
        }
        let local_singular = names.get(2).copied().or(default_local);
        if is_collection_join && local_singular.is_none() {
            return Err(malformed(
                "cannot infer the local name, spell it out or configure a collection",
            ));
        }

        Ok(JoinSpec {
            foreign_plural: foreign_plural.to_string(),
            foreign_singular: foreign_singular.map(str::to_string),
            local_singular: local_singular.map(str::to_string),
            is_collection_join,
            path_prefix,
        })
    }

    /// Where the joined documents land: the plural for collection joins, the
    /// singular otherwise.
    pub fn alias(&self) -> &str {
        match (&self.foreign_singular, self.is_collection_join) {
            (Some(singular), false) => singular,
            _ => &self.foreign_plural,
        }
    }

    pub fn to_stages(&self) -> Vec<Stage> {
        let alias = self.alias();
        if self.is_collection_join {
            let local = self.local_singular.as_deref().unwrap_or_default();
            return vec![Stage::Lookup(Lookup {
                from: self.foreign_plural.clone(),
                local_field: format!("{}id", self.path_prefix),
                foreign_field: format!("{local}_id"),
                as_var: alias.to_string(),
            })];
        }
        vec![
            Stage::Lookup(Lookup {
                from: self.foreign_plural.clone(),
                local_field: format!("{}{alias}_id", self.path_prefix),
                foreign_field: "id".to_string(),
                as_var: alias.to_string(),
            }),
            Stage::Unwind(alias.to_string()),
            Stage::strip_id(Some(alias)),
        ]
    }
}

/// Compiles the descriptors of one `f_` segment. Every descriptor infers its
/// local name from the compiled collection. After the first, `localField`
/// reads under the previous descriptor's alias.
pub(super) fn compile_joins(props: &str, collection: Option<&str>) -> Result<Vec<Stage>> {
    let mut stages = Vec::new();
    let local = collection.and_then(singularize);
    let mut path_prefix = String::new();
    for descriptor in props.split(',').filter(|descriptor| !descriptor.is_empty()) {
        let spec = JoinSpec::parse(descriptor, local, path_prefix)?;
        event!(Level::DEBUG, ?spec, "resolved join");
        stages.extend(spec.to_stages());
        path_prefix = format!("{}.", spec.alias());
    }
    Ok(stages)
}
