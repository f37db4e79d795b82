//! # sdlift
//!
//! Generate an SDL starting schema from an existing relational database
//!
//! This crate provides a CLI tool and library that turn introspected tables
//! into SDL type declarations annotated with `@pgTable`, `@pgColumn`,
//! `@unique` and `@default` directives.

pub mod codegen;
pub mod config;
pub mod error;
pub mod inferrer;
pub mod introspect;
pub mod schema;
pub mod sdl;
pub mod types;

pub mod prelude {
    pub use crate::codegen::{CodeGenConfig, CodeGenerator, OutputTarget, RenderMode, SdlGenerator};
    pub use crate::config::DbConfig;
    pub use crate::error::SdliftError;
    pub use crate::inferrer::{FieldRenderer, Inferrer, Rendering, SuppressReason, TypeRenderer};
    pub use crate::introspect::{Introspector, PostgresTypeMap, TableFilter};
    pub use crate::schema::{Column, ColumnRelation, DefaultValue, Schema, Table};
    pub use crate::sdl::{GqlField, GqlType, SdlDocument};
    pub use crate::types::{CanonicalTypes, TypeCapabilities};
}

#[cfg(feature = "postgres")]
pub use introspect::PostgresIntrospector;
