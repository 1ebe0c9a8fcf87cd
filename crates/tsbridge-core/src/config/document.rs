//! Raw configuration document and compiler-options model
//!
//! A [`ConfigDocument`] is the structured result of parsing one tsconfig
//! file. Documents are never mutated after creation; extends-resolution and
//! option merging always produce new documents.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One compiler-option value
///
/// Known options are booleans, strings, integers, or string lists; anything
/// else (e.g. the `paths` mapping) passes through untouched for the external
/// engine to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl OptionValue {
    /// The string payload, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload, if this value is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Key recognized by the resolution pipeline itself: a path to a config file
/// or to a directory containing one
pub const PROJECT_KEY: &str = "project";

/// Flat compiler-options mapping, preserving insertion order
///
/// Keys are not validated here; the external engine is the authority on
/// value-level validity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompilerOptions(pub IndexMap<String, OptionValue>);

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OptionValue)> {
        self.0.iter()
    }

    /// The `project` option, if present
    pub fn project(&self) -> Option<&str> {
        self.get(PROJECT_KEY).and_then(OptionValue::as_str)
    }

    /// Shallow key-wise merge: every key in `overrides` replaces the same
    /// key here; non-overlapping keys from both sides are kept
    pub fn merged_with(&self, overrides: &CompilerOptions) -> CompilerOptions {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Copy without the `project` key (consumed by the locator, never
    /// forwarded to the engine)
    pub fn without_project(&self) -> CompilerOptions {
        let mut copy = self.clone();
        copy.0.shift_remove(PROJECT_KEY);
        copy
    }
}

/// Structured result of parsing a project's configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    /// Path reference to a parent document; stripped by extends-resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Explicit ordered list of source paths
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    /// Glob patterns selecting source files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<Vec<String>>,

    /// Glob patterns filtering out selected files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Flat compiler-options mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_options: Option<CompilerOptions>,

    /// Top-level keys this layer does not interpret (e.g. `compileOnSave`)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ConfigDocument {
    /// Fold this document (the child) over an already-resolved base
    ///
    /// Scalar and object fields from the child override the base; the
    /// array-valued fields (`files`, `include`, `exclude`) are replaced
    /// wholesale when the child provides them, else inherited. Compiler
    /// options merge key-wise with the child winning. The result never
    /// carries `extends`.
    pub fn merged_over(self, base: ConfigDocument) -> ConfigDocument {
        let compiler_options = match (base.compiler_options, self.compiler_options) {
            (Some(parent), Some(child)) => Some(parent.merged_with(&child)),
            (parent, child) => child.or(parent),
        };

        let mut extra = base.extra;
        for (key, value) in self.extra {
            extra.insert(key, value);
        }

        ConfigDocument {
            extends: None,
            files: self.files.or(base.files),
            include: self.include.or(base.include),
            exclude: self.exclude.or(base.exclude),
            compiler_options,
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(pairs: &[(&str, OptionValue)]) -> CompilerOptions {
        let mut options = CompilerOptions::new();
        for (key, value) in pairs {
            options.insert(*key, value.clone());
        }
        options
    }

    #[test]
    fn test_merged_with_overrides_collisions() {
        let base = opts(&[
            ("target", OptionValue::Str("ES5".into())),
            ("sourceMap", OptionValue::Bool(false)),
        ]);
        let overrides = opts(&[("sourceMap", OptionValue::Bool(true))]);

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.get("target").unwrap().as_str(), Some("ES5"));
        assert_eq!(merged.get("sourceMap").unwrap().as_bool(), Some(true));
    }

    #[test]
    fn test_merged_over_replaces_arrays_wholesale() {
        let base = ConfigDocument {
            include: Some(vec!["src/**/*".into()]),
            exclude: Some(vec!["**/node_modules/**".into()]),
            ..Default::default()
        };
        let child = ConfigDocument {
            include: Some(vec!["lib/**/*".into()]),
            ..Default::default()
        };

        let merged = child.merged_over(base);
        assert_eq!(merged.include, Some(vec!["lib/**/*".to_string()]));
        // Inherited, not cleared
        assert_eq!(merged.exclude, Some(vec!["**/node_modules/**".to_string()]));
        assert!(merged.extends.is_none());
    }

    #[test]
    fn test_option_value_untagged_parse() {
        let doc: ConfigDocument = serde_json::from_str(
            r#"{
                "compilerOptions": {
                    "strict": true,
                    "target": "ES2017",
                    "maxNodeModuleJsDepth": 2,
                    "lib": ["ES2017", "DOM"],
                    "paths": {"@app/*": ["src/*"]}
                },
                "compileOnSave": true
            }"#,
        )
        .unwrap();

        let options = doc.compiler_options.unwrap();
        assert_eq!(options.get("strict"), Some(&OptionValue::Bool(true)));
        assert_eq!(options.get("maxNodeModuleJsDepth"), Some(&OptionValue::Int(2)));
        assert_eq!(
            options.get("lib"),
            Some(&OptionValue::List(vec!["ES2017".into(), "DOM".into()]))
        );
        assert!(matches!(options.get("paths"), Some(OptionValue::Other(_))));
        assert!(doc.extra.contains_key("compileOnSave"));
    }
}
