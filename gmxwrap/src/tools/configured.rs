//! Tool bindings described in `gmxwrap.toml`.

use crate::error::{GmxError, Result};
use crate::io::config::ToolDefinition;
use crate::io::output::LinePattern;
use crate::tool::ToolBinding;

#[derive(Debug, Clone)]
pub struct ConfiguredTool {
    name: String,
    executable: String,
    output_flag: String,
    default_output: String,
    pattern: LinePattern,
}

impl ConfiguredTool {
    /// Build a binding from its definition.
    ///
    /// A definition without `default_output`, `pattern` or `field` cannot be
    /// run and yields [`GmxError::NotImplementedCapability`].
    pub fn from_definition(name: &str, def: &ToolDefinition) -> Result<Self> {
        let missing = |what: &str| GmxError::NotImplementedCapability {
            tool: name.to_string(),
            missing: what.to_string(),
        };
        let default_output = def
            .default_output
            .clone()
            .ok_or_else(|| missing("default_output"))?;
        let pattern = def.pattern.as_deref().ok_or_else(|| missing("pattern"))?;
        let field = def.field.as_deref().ok_or_else(|| missing("field"))?;
        Ok(Self {
            name: name.to_string(),
            executable: def.executable.clone(),
            output_flag: def.output_flag.clone(),
            default_output,
            pattern: LinePattern::new(pattern, field)?,
        })
    }
}

impl ToolBinding for ConfiguredTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn executable(&self) -> &str {
        &self.executable
    }

    fn output_flag(&self) -> &str {
        &self.output_flag
    }

    fn default_output(&self) -> &str {
        &self.default_output
    }

    fn line_pattern(&self) -> &LinePattern {
        &self.pattern
    }
}
