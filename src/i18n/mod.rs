//! Translation state and tooling around the transcoder.
//!
//! # Architecture
//!
//! - `store`: active language, per-language dictionaries and the `Lookup` seam
//! - `metrics`: hit/miss counters for store lookups
//! - `validator`: checks a translated template against its source template
//!
//! # Example
//!
//! ```rust
//! use trans_tree::i18n::{Lookup, TranslationStore};
//!
//! let mut store = TranslationStore::from_json(r#"{"es": {"Example": "Ejemplo"}}"#).unwrap();
//! assert_eq!(store.lookup("Example"), "Example");
//!
//! store.set_language("es");
//! assert_eq!(store.lookup("Example"), "Ejemplo");
//! assert_eq!(store.languages(), vec!["es"]);
//! ```

mod metrics;
mod store;
mod validator;

pub use metrics::{LookupMetrics, MetricsReport};
pub use store::{Dictionary, Lookup, Resources, TranslationStore};
pub use validator::{TemplateValidator, ValidationReport};
