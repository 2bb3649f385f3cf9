use super::Value;
use ahash::AHashMap;
use indexmap::IndexMap;

/// Provides values for the `env()` template helper.
pub trait EnvLookup {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads helper values from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment, mostly useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    values: AHashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl EnvLookup for MapEnv {
    fn lookup(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Maps controller names to their engine identifiers for the `controller()` helper.
///
/// A controller that has not been materialized yet maps to `None`, which renders empty.
#[derive(Debug, Clone, Default)]
pub struct ControllerIds {
    ids: AHashMap<String, Option<String>>,
}

impl ControllerIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, id: Option<String>) {
        self.ids.insert(name.into(), id);
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.ids.get(name).and_then(|id| id.as_deref())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for ControllerIds {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The helper functions available to every template, passed explicitly per render.
#[derive(Clone, Copy)]
pub struct Helpers<'a> {
    pub env: &'a dyn EnvLookup,
    pub controllers: &'a ControllerIds,
}

impl<'a> Helpers<'a> {
    pub fn new(env: &'a dyn EnvLookup, controllers: &'a ControllerIds) -> Self {
        Self { env, controllers }
    }
}

/// Variables visible to a template. Later insertions shadow earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: IndexMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn extend<'v>(&mut self, vars: impl IntoIterator<Item = (&'v String, &'v Value)>) {
        for (k, v) in vars {
            self.vars.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl From<&IndexMap<String, Value>> for Context {
    fn from(vars: &IndexMap<String, Value>) -> Self {
        Self { vars: vars.clone() }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
