//! External tool discovery.

use serde::Serialize;
use std::process::Command;

/// Tools the bundled OCR path shells out to.
pub const REQUIRED_TOOLS: &[&str] = &["pdftoppm", "tesseract"];

/// Availability of one external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
}

/// Check whether a binary is on `PATH`.
pub fn check_binary(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check every tool the OCR path needs.
pub fn check_tools() -> Vec<ToolStatus> {
    REQUIRED_TOOLS
        .iter()
        .map(|tool| ToolStatus {
            name: tool.to_string(),
            available: check_binary(tool),
        })
        .collect()
}
