//! arg_min / arg_max migration generator
//!
//! PostgreSQL only ships value-returning `min`/`max`. This crate generates the
//! apply (`up.sql`) and revert (`down.sql`) migrations for a family of
//! aggregates that return the *argument* paired with the extreme ranking
//! value:
//!
//! ```sql
//! select arg_min_int4((id, block_number)) from events group by account;
//! ```
//!
//! The engine cannot aggregate over a polymorphic state type, so the
//! definitions are monomorphized: one composite type, two reducers, one
//! projection and two aggregates per entry of the [`roster::TypeRoster`].
//!
//! Modules:
//! - [`roster`]: the types to instantiate
//! - [`templates`]: the parametrized SQL and its instantiation
//! - [`reducer`]: Rust model of the combine rule the SQL implements
//! - [`generator`]: roster x template -> [`generator::MigrationPair`]
//! - [`writer`]: all-or-nothing replacement of the artifacts on disk
//! - [`config`]: defaults, environment and YAML configuration
//! - `database` (feature `database`): scratch apply/revert verification

pub mod config;
pub mod error;
pub mod generator;
pub mod reducer;
pub mod roster;
pub mod templates;
pub mod writer;

#[cfg(feature = "database")]
pub mod database;

pub use config::{ConfigOverrides, GeneratorConfig};
pub use error::{GeneratorError, Result, RosterError, TemplateError};
pub use generator::{generate, Generator, MigrationPair};
pub use reducer::{Direction, RankedValue};
pub use roster::{TypeName, TypeRoster};
pub use writer::ArtifactWriter;
