//! Environment variable access
//!
//! Code that reads the process environment takes an [`EnvSource`] so tests can
//! supply a fixed map instead of mutating the real environment.

use std::collections::HashMap;

/// Read-only lookup of environment variables
pub trait EnvSource {
    /// Value of `name`, or `None` when unset or not valid Unicode
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, treating an empty string as unset
    fn non_empty_var(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    /// Empty environment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_lookup() {
        let env = MapEnv::new().with("FLUTTER_ROOT", "/opt/flutter");
        assert_eq!(env.var("FLUTTER_ROOT").as_deref(), Some("/opt/flutter"));
        assert_eq!(env.var("ANDROID_HOME"), None);
    }

    #[test]
    fn test_non_empty_var_filters_empty() {
        let env: MapEnv = [("FLUTTER_ROOT", "")].into_iter().collect();
        assert_eq!(env.var("FLUTTER_ROOT").as_deref(), Some(""));
        assert_eq!(env.non_empty_var("FLUTTER_ROOT"), None);
    }

    #[test]
    fn test_process_env_missing_var() {
        assert_eq!(ProcessEnv.var("FLUTTERENV_TEST_SURELY_UNSET_VARIABLE"), None);
    }

    #[test]
    fn test_reference_forwards() {
        fn lookup(env: impl EnvSource) -> Option<String> {
            env.var("A")
        }

        let env = MapEnv::new().with("A", "1");
        assert_eq!(lookup(&env).as_deref(), Some("1"));
    }
}
