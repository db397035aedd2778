//! Named paper sizes
//!
//! The list is ordered and freely editable. The A-series defaults can be
//! brought back with [`PresetList::restore_defaults`].

use crate::types::{ResizeError, Result, Size};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named width/height pair in millimeters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Preset {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl Preset {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ResizeError::Config("Preset name must not be empty".to_string()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ResizeError::InvalidDimension(format!(
                "Preset '{}' must have a positive width and height",
                self.name
            )));
        }
        Ok(())
    }
}

/// A-series sizes, portrait
pub fn default_presets() -> Vec<Preset> {
    [
        ("A0", 841.0, 1189.0),
        ("A1", 594.0, 841.0),
        ("A2", 420.0, 594.0),
        ("A3", 297.0, 420.0),
        ("A4", 210.0, 297.0),
        ("A5", 148.0, 210.0),
        ("A6", 105.0, 148.0),
    ]
    .into_iter()
    .map(|(name, width, height)| Preset::new(name, width, height))
    .collect()
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PresetList {
    items: Vec<Preset>,
}

impl Default for PresetList {
    fn default() -> Self {
        Self {
            items: default_presets(),
        }
    }
}

impl PresetList {
    pub fn new(items: Vec<Preset>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Preset] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.items.iter().find(|p| p.name == name)
    }

    /// Name of the preset with exactly this size, in either orientation
    pub fn matching(&self, size: Size) -> Option<&Preset> {
        self.items.iter().find(|p| {
            let s = p.size();
            s == size || s.swapped() == size
        })
    }

    pub fn add(&mut self, preset: Preset) -> Result<()> {
        preset.validate()?;
        self.items.push(preset);
        Ok(())
    }

    pub fn update(&mut self, index: usize, preset: Preset) -> Result<()> {
        preset.validate()?;
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| ResizeError::Config(format!("No preset at index {}", index)))?;
        *slot = preset;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<Preset> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Move an entry to a new position, shifting the others
    pub fn move_item(&mut self, from: usize, to: usize) {
        if from >= self.items.len() || from == to {
            return;
        }
        let item = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, item);
    }

    /// Overwrite same-named entries with the defaults and append missing ones
    pub fn restore_defaults(&mut self) {
        for default in default_presets() {
            match self.items.iter_mut().find(|p| p.name == default.name) {
                Some(existing) => *existing = default,
                None => self.items.push(default),
            }
        }
    }

    /// Whether any default is absent or has been altered
    pub fn is_missing_defaults(&self) -> bool {
        default_presets()
            .iter()
            .any(|d| self.get(&d.name).is_none_or(|p| p.size() != d.size()))
    }

    /// Load a preset list from JSON
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let list = serde_json::from_slice(&bytes)
            .map_err(|e| ResizeError::Config(format!("Failed to parse presets: {}", e)))?;
        Ok(list)
    }

    /// Save the preset list as JSON
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ResizeError::Config(format!("Failed to serialize presets: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
