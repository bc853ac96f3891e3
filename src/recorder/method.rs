//! Method identities and the store keys derived from them.

use std::fmt;

// == Method Id ==
/// Stable name of an instrumented operation, qualified by its owning type.
///
/// The name is the counter key; the logs live at `<name>:inputs` and
/// `<name>:outputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(&'static str);

impl MethodId {
    /// `Cache::store`
    pub const CACHE_STORE: MethodId = MethodId::new("Cache.store");

    /// Declares an identity. Callers instrumenting their own operations
    /// should bind the result to a `const`.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Key of the invocation counter.
    pub fn counter_key(&self) -> &'static str {
        self.0
    }

    /// Key of the argument log.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.0)
    }

    /// Key of the result log.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.0)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
