//! Template definitions
//!
//! A template is a named block of SQL with `{{placeholder}}` tokens. The apply
//! and revert directions travel together as a [`MigrationTemplate`] so that
//! they are always instantiated for the same roster.

use crate::roster::TypeName;

use super::sql;

/// Placeholder closed by per-type instantiation
pub const TYPE_PLACEHOLDER: &str = "type";

/// SQL type of the ranking value in every composite
pub const RANK_TYPE: &str = "int8";

/// Name of the composite `(arg, value)` type for `ty`
pub fn composite_type_name(ty: &TypeName) -> String {
    format!("{ty}_and_value")
}

/// Name of the finalizer extracting `arg` for `ty`
pub fn projection_function_name(ty: &TypeName) -> String {
    format!("arg_from_{ty}_and_value")
}

/// A single parametrized block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDefinition {
    /// Template identifier, used in errors and logs
    pub name: String,
    /// SQL text with `{{placeholder}}` tokens
    pub body: String,
}

impl TemplateDefinition {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }

    /// The literal token replaced by the type name
    pub fn type_token() -> String {
        format!("{{{{{}}}}}", TYPE_PLACEHOLDER)
    }
}

/// Apply/revert template pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationTemplate {
    pub apply: TemplateDefinition,
    pub revert: TemplateDefinition,
}

impl MigrationTemplate {
    pub fn new(apply: TemplateDefinition, revert: TemplateDefinition) -> Self {
        Self { apply, revert }
    }

    /// The arg_min/arg_max aggregate family
    pub fn arg_min_max() -> Self {
        Self {
            apply: TemplateDefinition::new("arg_min_max.apply", sql::apply_body()),
            revert: TemplateDefinition::new("arg_min_max.revert", sql::revert_body()),
        }
    }
}

impl Default for MigrationTemplate {
    fn default() -> Self {
        Self::arg_min_max()
    }
}

/// One template instantiated for one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionBlock {
    pub type_name: TypeName,
    pub template: String,
    pub text: String,
}
