use pipeql_datastructures::UniqueLinkedHashSet;

/// State threaded through the sub-compilers of a single compile call.
#[derive(Debug, Default)]
pub(crate) struct CompileContext {
    /// Paths pulled up by `$addFields` that every projection must keep.
    pub lift_ups: UniqueLinkedHashSet<String>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lift_up(&mut self, path: &str) -> bool {
        self.lift_ups.insert(path.to_string())
    }
}
