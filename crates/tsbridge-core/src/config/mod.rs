//! Configuration resolution for tsbridge
//!
//! This module owns the first half of the pipeline:
//! - tsconfig.json discovery by traversing up directories
//! - JSONC parsing with `extends` inheritance (cycle-checked, fail-fast)
//! - Merging the inherited document with caller-supplied overrides
//!
//! ## Configuration Discovery
//!
//! When no explicit `project` path is provided, the resolver searches for
//! `tsconfig.json` starting from the working directory and moving up the
//! directory tree until a config is found or the filesystem root is reached.
//! A missing config is not an error in that mode.
//!
//! ## Configuration Inheritance
//!
//! ```jsonc
//! {
//!   "extends": "../base",
//!   "compilerOptions": {
//!     "strict": true
//!   }
//! }
//! ```
//!
//! Child fields override the base; `files`/`include`/`exclude` are replaced
//! wholesale by the child when present.

mod document;
mod locator;
mod merge;
mod parser;

pub use document::{CompilerOptions, ConfigDocument, OptionValue, PROJECT_KEY};
pub use locator::{CONFIG_FILE_NAME, ConfigLocator};
pub use merge::{MergedConfig, OptionsMerger};
pub use parser::ConfigParser;
