//! Migration templates
//!
//! One parametrized definition of the arg_min/arg_max family, instantiated
//! once per type. The database cannot aggregate over a generic state type, so
//! instead of a polymorphic aggregate we emit a concrete copy per roster entry.
//!
//! Key concepts:
//! - Templates are plain SQL text with `{{name}}` placeholders
//! - Direction-specific parts (comparison operator, names) are rendered once
//!   when the template pair is built, leaving only `{{type}}` open
//! - `instantiate` closes `{{type}}` and refuses any leftover placeholder
//!
//! # Example
//!
//! ```
//! use arg_minmax_gen::roster::TypeName;
//! use arg_minmax_gen::templates::{instantiate, MigrationTemplate};
//!
//! let template = MigrationTemplate::arg_min_max();
//! let block = instantiate(&template.apply, &TypeName::new("int4").unwrap()).unwrap();
//! assert!(block.text.contains("create aggregate arg_min_int4(int4_and_value)"));
//! ```

mod definition;
mod expander;
mod sql;

pub use definition::{
    composite_type_name, projection_function_name, DefinitionBlock, MigrationTemplate,
    TemplateDefinition, RANK_TYPE, TYPE_PLACEHOLDER,
};
pub use expander::{instantiate, substitute, unresolved_placeholders};
