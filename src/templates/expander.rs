//! Template Expander
//!
//! Expands template definitions to SQL text by substituting placeholders.

use tracing::debug;

use crate::error::TemplateError;
use crate::roster::TypeName;

use super::definition::{DefinitionBlock, TemplateDefinition, TYPE_PLACEHOLDER};

/// Substitute every `{{name}}` in `body` with `value`
///
/// Only the exact token matches: `{{types}}` or `{{ type }}` are left alone
/// and will be reported by [`unresolved_placeholders`].
pub fn substitute(body: &str, name: &str, value: &str) -> String {
    let pattern = format!("{{{{{}}}}}", name);
    let mut result = String::with_capacity(body.len());
    let mut last_end = 0;

    for (start, _) in body.match_indices(&pattern) {
        result.push_str(&body[last_end..start]);
        result.push_str(value);
        last_end = start + pattern.len();
    }
    result.push_str(&body[last_end..]);

    result
}

/// Names of all `{{...}}` placeholders still present, sorted and deduplicated
pub fn unresolved_placeholders(body: &str) -> Vec<String> {
    let mut names: Vec<String> = body
        .split("{{")
        .skip(1)
        .filter_map(|s| s.split_once("}}").map(|(name, _)| name.to_string()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Instantiate `template` for one type
///
/// Fails if anything besides `{{type}}` was left open in the template, so a
/// half-rendered block never reaches an artifact.
pub fn instantiate(
    template: &TemplateDefinition,
    type_name: &TypeName,
) -> Result<DefinitionBlock, TemplateError> {
    let text = substitute(&template.body, TYPE_PLACEHOLDER, type_name.as_str());

    let unresolved = unresolved_placeholders(&text);
    if !unresolved.is_empty() {
        return Err(TemplateError::UnresolvedPlaceholder {
            template: template.name.clone(),
            placeholders: unresolved,
        });
    }

    debug!(
        template = %template.name,
        type_name = %type_name,
        bytes = text.len(),
        "instantiated template"
    );

    Ok(DefinitionBlock {
        type_name: type_name.clone(),
        template: template.name.clone(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int4() -> TypeName {
        TypeName::new("int4").unwrap()
    }

    #[test]
    fn test_substitute_all_occurrences() {
        let out = substitute("{{type}}_and_value(arg {{type}})", "type", "int8");
        assert_eq!(out, "int8_and_value(arg int8)");
    }

    #[test]
    fn test_substitute_exact_token_only() {
        let out = substitute("{{type}} {{types}} {{ type }}", "type", "int4");
        assert_eq!(out, "int4 {{types}} {{ type }}");
    }

    #[test]
    fn test_unresolved_placeholders() {
        let open = unresolved_placeholders("a {{x}} b {{y}} c {{x}} d {{unterminated");
        assert_eq!(open, vec!["x".to_string(), "y".to_string()]);
        assert!(unresolved_placeholders("select 1").is_empty());
    }

    #[test]
    fn test_instantiate_closes_type() {
        let template = TemplateDefinition::new("t", "create type {{type}}_and_value;");
        let block = instantiate(&template, &int4()).unwrap();
        assert_eq!(block.text, "create type int4_and_value;");
        assert_eq!(block.type_name, int4());
        assert_eq!(block.template, "t");
    }

    #[test]
    fn test_instantiate_rejects_leftovers() {
        let template = TemplateDefinition::new("t", "{{type}} {{direction}}");
        let err = instantiate(&template, &int4()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnresolvedPlaceholder {
                template: "t".to_string(),
                placeholders: vec!["direction".to_string()],
            }
        );
    }
}
