//! WGSL validation with naga, run before a sketch hands a module to the host.

use naga::front::wgsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};

/// Shader parse or validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderError {
    /// `"parse"` or `"validate"`.
    pub stage: &'static str,
    pub message: String,
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WGSL {} error: {}", self.stage, self.message)
    }
}

impl std::error::Error for ShaderError {}

/// Parse and validate a WGSL module.
pub fn validate_wgsl(source: &str) -> Result<(), ShaderError> {
    let module = wgsl::parse_str(source).map_err(|err| ShaderError {
        stage: "parse",
        message: err.emit_to_string(source),
    })?;

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    validator.validate(&module).map_err(|err| ShaderError {
        stage: "validate",
        message: err.to_string(),
    })?;

    Ok(())
}
