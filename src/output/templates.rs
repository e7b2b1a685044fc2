// Template engine for synthesized programs

use crate::error::Result;
use crate::extract::AppModel;
use crate::text::indent_lines;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera, Value};

const PROGRAM_TEMPLATE: &str = "program.rs";

/// Renders an application model into a standalone program
#[derive(Debug, Clone)]
pub struct ProgramTemplate {
    tera: Tera,
}

impl ProgramTemplate {
    /// Create a template engine with the embedded program template
    pub fn new() -> Result<Self> {
        Self::from_source(include_str!("../../templates/program.rs.tera"))
    }

    /// Create a template engine from a custom template file
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_source(&source)
    }

    fn from_source(source: &str) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(PROGRAM_TEMPLATE, source)?;

        // Register custom filters
        tera.register_filter("indent_lines", indent_lines_filter);

        Ok(Self { tera })
    }

    /// Render one program
    pub fn render(&self, package: &str, app: &AppModel) -> Result<String> {
        let mut context = Context::new();
        context.insert("package", package);
        context.insert("imports", &app.imports);
        context.insert("body", &app.body);

        Ok(self.tera.render(PROGRAM_TEMPLATE, &context)?)
    }
}

/// Indent every non-empty line
fn indent_lines_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().unwrap_or("");
    let width = args.get("width").and_then(|v| v.as_u64()).unwrap_or(4) as usize;
    Ok(Value::String(indent_lines(s, width)))
}
