use crate::constants::DEFAULT_SUBFOLDER_NAME;
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A reusable resize configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResizeOptions {
    /// Margin removed from every edge, in millimeters
    pub trim_mm: f64,
    pub outputs: Vec<OutputSpec>,
    /// File name template; empty means "use the source file name"
    pub file_name: String,
    pub export_folder: Option<PathBuf>,
    pub use_subfolder: bool,
    pub subfolder_name: String,
    pub page_selection: PageSelection,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            trim_mm: 0.0,
            outputs: Vec::new(),
            file_name: String::new(),
            export_folder: None,
            use_subfolder: false,
            subfolder_name: DEFAULT_SUBFOLDER_NAME.to_string(),
            page_selection: PageSelection::Single,
        }
    }
}

impl ResizeOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ResizeError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ResizeError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if self.outputs.is_empty() {
            return Err(ResizeError::Config("No output sizes specified".to_string()));
        }

        if !self.trim_mm.is_finite() || self.trim_mm < 0.0 {
            return Err(ResizeError::InvalidDimension(format!(
                "Trim must be zero or positive, got {}",
                self.trim_mm
            )));
        }

        for (i, output) in self.outputs.iter().enumerate() {
            if !(output.width_mm > 0.0 && output.height_mm > 0.0) {
                return Err(ResizeError::InvalidDimension(format!(
                    "Output {} has a non-positive size ({} x {} mm)",
                    i + 1,
                    output.width_mm,
                    output.height_mm
                )));
            }
        }

        Ok(())
    }

    /// Subfolder name when the subfolder is enabled
    pub fn subfolder(&self) -> Option<&str> {
        self.use_subfolder.then_some(self.subfolder_name.as_str())
    }
}
