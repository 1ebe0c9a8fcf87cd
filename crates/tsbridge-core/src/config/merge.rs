//! Merging the inherited document with caller-supplied overrides
//!
//! Precedence, highest first: request compiler options, then the inherited
//! document's options. No built-in defaults are injected at this layer and
//! no value-level validation happens here; the external engine is the
//! authority on whether a merged value is acceptable.

use crate::config::document::{CompilerOptions, ConfigDocument};

/// The three option sources folded into one normalized record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConfig {
    /// Explicit file list; request version replaces the document's
    pub files: Option<Vec<String>>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    /// Fully merged options, with the consumed `project` key stripped
    pub compiler_options: CompilerOptions,
}

/// Merges an inherited config document with a compile request's overrides
pub struct OptionsMerger;

impl OptionsMerger {
    pub fn merge(
        document: ConfigDocument,
        overrides: Option<&CompilerOptions>,
        request_files: Option<&[String]>,
    ) -> MergedConfig {
        let inherited = document.compiler_options.unwrap_or_default();
        let compiler_options = match overrides {
            Some(overrides) => inherited.merged_with(overrides),
            None => inherited,
        };

        // The request's file list replaces, not merges with, the document's
        let files = match request_files {
            Some(files) if !files.is_empty() => Some(files.to_vec()),
            _ => document.files,
        };

        MergedConfig {
            files,
            include: document.include,
            exclude: document.exclude,
            compiler_options: compiler_options.without_project(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::OptionValue;

    fn options(pairs: &[(&str, OptionValue)]) -> CompilerOptions {
        let mut opts = CompilerOptions::new();
        for (key, value) in pairs {
            opts.insert(*key, value.clone());
        }
        opts
    }

    #[test]
    fn test_request_wins_on_key_collision() {
        let document = ConfigDocument {
            compiler_options: Some(options(&[
                ("target", OptionValue::Str("ES5".into())),
                ("sourceMap", OptionValue::Bool(false)),
            ])),
            ..Default::default()
        };
        let overrides = options(&[("sourceMap", OptionValue::Bool(true))]);

        let merged = OptionsMerger::merge(document, Some(&overrides), None);
        assert_eq!(
            merged.compiler_options.get("target").unwrap().as_str(),
            Some("ES5")
        );
        assert_eq!(
            merged.compiler_options.get("sourceMap"),
            Some(&OptionValue::Bool(true))
        );
    }

    #[test]
    fn test_request_files_replace_document_files() {
        let document = ConfigDocument {
            files: Some(vec!["a.ts".into(), "b.ts".into()]),
            ..Default::default()
        };
        let request_files = vec!["c.ts".to_string()];

        let merged = OptionsMerger::merge(document, None, Some(&request_files));
        assert_eq!(merged.files, Some(vec!["c.ts".to_string()]));
    }

    #[test]
    fn test_project_key_stripped() {
        let overrides = options(&[("project", OptionValue::Str("/proj".into()))]);
        let merged = OptionsMerger::merge(ConfigDocument::default(), Some(&overrides), None);
        assert!(merged.compiler_options.get("project").is_none());
    }

    #[test]
    fn test_empty_sources_pass_through() {
        let merged = OptionsMerger::merge(ConfigDocument::default(), None, None);
        assert_eq!(merged, MergedConfig::default());
    }
}
