//! Monomorphizing generator
//!
//! Folds the type roster over the template pair and produces the apply and
//! revert artifacts entirely in memory. Nothing here touches the filesystem
//! or a database; see [`crate::writer`] for putting the pair on disk.

use tracing::{debug, info};

use crate::error::{Result, TemplateError};
use crate::roster::{is_sql_identifier, TypeRoster};
use crate::templates::{instantiate, DefinitionBlock, MigrationTemplate, TemplateDefinition};

/// Schema the artifacts install into unless configured otherwise
pub const DEFAULT_SCHEMA: &str = "public";

/// Rendered apply/revert artifacts of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPair {
    /// Apply (`up.sql`) script
    pub up: String,
    /// Revert (`down.sql`) script
    pub down: String,
}

/// Instantiates a [`MigrationTemplate`] for every type in a roster
#[derive(Debug, Clone)]
pub struct Generator {
    template: MigrationTemplate,
    schema: String,
}

impl Generator {
    /// Generator for the arg_min/arg_max family installing into `schema`
    pub fn new(schema: impl Into<String>) -> std::result::Result<Self, TemplateError> {
        Self::with_template(MigrationTemplate::arg_min_max(), schema)
    }

    /// Generator for an arbitrary template pair
    pub fn with_template(
        template: MigrationTemplate,
        schema: impl Into<String>,
    ) -> std::result::Result<Self, TemplateError> {
        let schema = schema.into();
        if !is_sql_identifier(&schema) {
            return Err(TemplateError::InvalidIdentifier {
                kind: "schema",
                value: schema,
            });
        }
        Ok(Self { template, schema })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn template(&self) -> &MigrationTemplate {
        &self.template
    }

    /// Shared first line of both artifacts
    pub fn preamble(&self) -> String {
        format!("set search_path = {};\n", self.schema)
    }

    /// Render both artifacts for `roster`
    ///
    /// Blocks appear in roster order. Each block depends only on its own type,
    /// so extending the roster never changes text already generated for the
    /// existing types.
    pub fn generate(&self, roster: &TypeRoster) -> Result<MigrationPair> {
        let up = self.render(&self.template.apply, roster)?;
        let down = self.render(&self.template.revert, roster)?;

        info!(
            schema = %self.schema,
            types = roster.len(),
            up_bytes = up.len(),
            down_bytes = down.len(),
            "generated migration pair"
        );

        Ok(MigrationPair { up, down })
    }

    /// Per-type blocks of one direction, without the preamble
    pub fn blocks(
        &self,
        template: &TemplateDefinition,
        roster: &TypeRoster,
    ) -> std::result::Result<Vec<DefinitionBlock>, TemplateError> {
        roster.iter().map(|ty| instantiate(template, ty)).collect()
    }

    fn render(&self, template: &TemplateDefinition, roster: &TypeRoster) -> Result<String> {
        let mut artifact = self.preamble();
        for block in self.blocks(template, roster)? {
            debug!(template = %block.template, type_name = %block.type_name, "appending block");
            artifact.push_str(&block.text);
        }
        Ok(artifact)
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            template: MigrationTemplate::arg_min_max(),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

/// Generate the arg_min/arg_max pair for `roster` into the default schema
pub fn generate(roster: &TypeRoster) -> Result<MigrationPair> {
    Generator::default().generate(roster)
}
