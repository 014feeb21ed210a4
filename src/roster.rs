//! Type roster
//!
//! The ordered list of scalar types the aggregates are instantiated for.
//! Order only affects where each block lands in the artifacts; every block is
//! self-contained.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// Types instantiated when no roster is configured
pub const DEFAULT_TYPES: &[&str] = &["int4", "int8", "numeric"];

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

/// Whether `value` can be spliced into SQL unquoted and still name one object.
pub fn is_sql_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

/// A scalar type name known to the database, e.g. `int4`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Result<Self, RosterError> {
        let name = name.into();
        if !is_sql_identifier(&name) {
            return Err(RosterError::InvalidTypeName { name });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TypeName {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeName> for String {
    fn from(value: TypeName) -> Self {
        value.0
    }
}

/// Ordered, duplicate-free sequence of types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TypeName>", into = "Vec<TypeName>")]
pub struct TypeRoster {
    types: Vec<TypeName>,
}

impl TypeRoster {
    /// Build a roster, rejecting duplicates.
    ///
    /// A repeated type would instantiate the same schema objects twice and
    /// only fail once the apply artifact hits the database. An empty roster is
    /// allowed and renders a preamble-only pair.
    pub fn new(types: Vec<TypeName>) -> Result<Self, RosterError> {
        for (i, ty) in types.iter().enumerate() {
            if types[..i].contains(ty) {
                return Err(RosterError::DuplicateType {
                    name: ty.to_string(),
                });
            }
        }
        Ok(Self { types })
    }

    /// Parse and validate a list of names
    pub fn from_names<I, S>(names: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let types = names
            .into_iter()
            .map(TypeName::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(types)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeName> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Append a type, keeping the roster duplicate-free
    pub fn push(&mut self, ty: TypeName) -> Result<(), RosterError> {
        if self.types.contains(&ty) {
            return Err(RosterError::DuplicateType {
                name: ty.to_string(),
            });
        }
        self.types.push(ty);
        Ok(())
    }
}

impl Default for TypeRoster {
    fn default() -> Self {
        Self {
            types: DEFAULT_TYPES
                .iter()
                .map(|name| TypeName((*name).to_string()))
                .collect(),
        }
    }
}

impl TryFrom<Vec<TypeName>> for TypeRoster {
    type Error = RosterError;

    fn try_from(value: Vec<TypeName>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TypeRoster> for Vec<TypeName> {
    fn from(value: TypeRoster) -> Self {
        value.types
    }
}

impl<'a> IntoIterator for &'a TypeRoster {
    type Item = &'a TypeName;
    type IntoIter = std::slice::Iter<'a, TypeName>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_order() {
        let roster = TypeRoster::default();
        let names: Vec<_> = roster.iter().map(TypeName::as_str).collect();
        assert_eq!(names, vec!["int4", "int8", "numeric"]);
    }

    #[test]
    fn test_default_types_are_valid_identifiers() {
        for name in DEFAULT_TYPES {
            assert!(TypeName::new(*name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_rejects_non_identifier_type_names() {
        for bad in ["", "Int4", "double precision", "int4;drop", "4int", "varchar(10)"] {
            assert_eq!(
                TypeName::new(bad),
                Err(RosterError::InvalidTypeName {
                    name: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = TypeRoster::from_names(["int4", "int8", "int4"]).unwrap_err();
        assert_eq!(
            err,
            RosterError::DuplicateType {
                name: "int4".to_string()
            }
        );
    }

    #[test]
    fn test_accepts_empty_roster() {
        let names: Vec<String> = vec![];
        let roster = TypeRoster::from_names(names).unwrap();
        assert!(roster.is_empty());
        assert_eq!(roster.len(), 0);

        let from_yaml: TypeRoster = serde_yaml::from_str("[]").unwrap();
        assert!(from_yaml.is_empty());
    }

    #[test]
    fn test_push_keeps_roster_unique() {
        let mut roster = TypeRoster::default();
        roster.push(TypeName::new("text").unwrap()).unwrap();
        assert_eq!(roster.len(), 4);
        assert!(roster.push(TypeName::new("int8").unwrap()).is_err());
    }

    #[test]
    fn test_roster_from_yaml_list() {
        let roster: TypeRoster = serde_yaml::from_str("[int4, text]").unwrap();
        assert_eq!(roster.len(), 2);

        let dup: Result<TypeRoster, _> = serde_yaml::from_str("[int4, int4]");
        assert!(dup.is_err());
    }
}
