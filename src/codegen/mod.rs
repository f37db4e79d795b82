//! SDL document generation
//!
//! Runs the inferrer over an introspected schema and writes the resulting
//! document to a file or stdout.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use minijinja::Environment;
use tracing::{debug, info, warn};

use crate::inferrer::{Inferrer, Rendering, TypeRenderer};
use crate::prelude::{Schema, SdliftError};

/// How each table is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Complete type declarations with fields and directives
    #[default]
    Full,
    /// Empty type skeletons only
    Summary,
}

/// Where the document goes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputTarget {
    #[default]
    Stdout,
    File(PathBuf),
}

/// Configuration for document generation
#[derive(Debug, Clone, Default)]
pub struct CodeGenConfig {
    pub output: OutputTarget,
    pub render_mode: RenderMode,
}

impl CodeGenConfig {
    pub fn new(output: OutputTarget) -> Self {
        Self {
            output,
            render_mode: RenderMode::default(),
        }
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }
}

/// Trait for document generators
pub trait CodeGenerator {
    /// Generate output for the given schema
    fn generate(&self, schema: &Schema, config: &CodeGenConfig) -> Result<(), SdliftError>;
}

/// SDL document generator
pub struct SdlGenerator {
    env: Environment<'static>,
    inferrer: Inferrer,
}

impl SdlGenerator {
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template("document", include_str!("templates/document.sdl.jinja"))
            .expect("Failed to load SDL document template");

        Self {
            env,
            inferrer: Inferrer::new(),
        }
    }

    pub fn with_inferrer(mut self, inferrer: Inferrer) -> Self {
        self.inferrer = inferrer;
        self
    }

    /// Render the whole document as text
    pub fn render(&self, schema: &Schema, mode: RenderMode) -> Result<String, SdliftError> {
        let template = self
            .env
            .get_template("document")
            .map_err(|e| SdliftError::Render {
                target: schema.name.clone(),
                message: format!("Template error: {}", e),
            })?;

        let join_tables: Vec<&str> = schema
            .tables
            .iter()
            .filter(|t| t.is_join_table())
            .map(|t| t.name.as_str())
            .collect();

        let blocks: Vec<String> = match mode {
            RenderMode::Full => {
                let renderings: Vec<Rendering> = schema
                    .tables
                    .iter()
                    .filter(|t| !t.is_join_table())
                    .map(|t| self.inferrer.render_type(t))
                    .collect();

                let suppressed = renderings.iter().filter(|r| r.is_suppressed()).count();
                if suppressed > 0 {
                    warn!(
                        types = suppressed,
                        "Tables without primary key emitted as commented-out types"
                    );
                }

                renderings
                    .into_iter()
                    .map(Rendering::into_type_block)
                    .collect()
            }
            RenderMode::Summary => self
                .inferrer
                .infer(&schema.tables)
                .types
                .iter()
                .map(|t| t.to_string())
                .collect(),
        };

        debug!(
            mode = ?mode,
            types = blocks.len(),
            join_tables = ?join_tables,
            "Rendering SDL document"
        );

        let ctx = minijinja::context! {
            schema => &schema.name,
            join_tables => join_tables,
            blocks => blocks,
        };

        template.render(ctx).map_err(|e| SdliftError::Render {
            target: schema.name.clone(),
            message: format!("Render error: {}", e),
        })
    }
}

impl Default for SdlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for SdlGenerator {
    fn generate(&self, schema: &Schema, config: &CodeGenConfig) -> Result<(), SdliftError> {
        info!(
            output = ?config.output,
            mode = ?config.render_mode,
            "Generating SDL"
        );

        let document = self.render(schema, config.render_mode)?;

        match &config.output {
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(document.as_bytes())?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => {
                // Ensure parent directory exists
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }

                let final_path = if path.extension().is_some() {
                    path.clone()
                } else {
                    path.with_extension("graphql")
                };

                fs::write(&final_path, document)?;
                info!(path = ?final_path, "Wrote SDL document");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, ColumnRelation, DefaultValue, Table};

    fn sample_schema() -> Schema {
        Schema {
            name: "public".to_string(),
            tables: vec![
                Table::new(
                    "users",
                    vec![Column::new("id", Some("Int"))
                        .with_nullable(false)
                        .with_primary_key(true)
                        .with_default(DefaultValue::AutoIncrement)],
                ),
                Table::new("logs", vec![Column::new("line", Some("String"))]),
                Table::new(
                    "users_groups",
                    vec![
                        Column::new("user_id", Some("Int"))
                            .with_relation(ColumnRelation::new("users", "id")),
                        Column::new("group_id", Some("Int"))
                            .with_relation(ColumnRelation::new("groups", "id")),
                    ],
                ),
            ],
        }
    }

    #[test]
    fn test_render_full() {
        let generator = SdlGenerator::new();

        let document = generator.render(&sample_schema(), RenderMode::Full).unwrap();

        assert_eq!(
            document,
            "# Generated by sdlift from schema \"public\"\n\
             # Join tables omitted: users_groups\n\
             \n\
             type Users @pgTable(name: \"users\") {\n  id: Int!\n}\n\
             \n\
             // Types without primary key not yet supported\n\
             // type Logs @pgTable(name: \"logs\") {\n\
             //   line: String\n\
             // }\n"
        );
    }

    #[test]
    fn test_render_summary() {
        let generator = SdlGenerator::new();

        let document = generator
            .render(&sample_schema(), RenderMode::Summary)
            .unwrap();

        assert!(document.contains("type Users @pgTable(name: \"users\") {\n}\n"));
        assert!(document.contains("type Logs @pgTable(name: \"logs\") {\n}\n"));
        assert!(!document.contains("type Users_groups"));
    }

    #[test]
    fn test_render_empty_schema() {
        let generator = SdlGenerator::new();
        let schema = Schema {
            name: "empty".to_string(),
            tables: vec![],
        };

        let document = generator.render(&schema, RenderMode::Full).unwrap();

        assert_eq!(document, "# Generated by sdlift from schema \"empty\"\n");
    }

    #[test]
    fn test_generate_writes_file_with_extension() {
        let dir = std::env::temp_dir().join(format!("sdlift-test-{}", std::process::id()));
        let config = CodeGenConfig::new(OutputTarget::File(dir.join("schema")));

        SdlGenerator::new()
            .generate(&sample_schema(), &config)
            .unwrap();

        let written = fs::read_to_string(dir.join("schema.graphql")).unwrap();
        assert!(written.contains("type Users"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
