// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Terrain rendering configuration.
//!
//! The configuration is authored in RON and describes the layer stack, the
//! sampler bindings of the terrain shaders and engine-wide conventions:
//!
//! ```ron
//! (
//!     use_texture_border: true,
//!     lod_scale: 1.0,
//!     layers: [
//!         (uid: 1, name: "imagery", kind: Image),
//!         (uid: 2, name: "basemap", kind: Tile, visible: false),
//!     ],
//!     bindings: [
//!         (name: "terra_tex", usage: Color, unit: 0),
//!     ],
//! )
//! ```

use crate::terrain::{Layer, LayerKind, LayerUid, SamplerUsage};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// An error raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read terrain config '{path}': {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid RON for [`TerrainConfig`].
    #[error("failed to parse terrain config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Two layers share an identifier.
    #[error("duplicate layer uid {0}")]
    DuplicateLayerUid(u32),
    /// Patch layers carry callbacks and cannot be declared in configuration.
    #[error("layer uid {0} has kind Patch; attach patch layers with RenderContext::add_patch_layer")]
    PatchLayerInConfig(u32),
    /// The LOD scale must be finite and positive.
    #[error("invalid lod scale {0}, expected a positive finite value")]
    InvalidLodScale(f32),
}

fn default_true() -> bool {
    true
}

fn default_lod_scale() -> f32 {
    1.0
}

/// Configuration of one data layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerConfig {
    /// Stable identifier.
    pub uid: u32,
    /// Display name.
    pub name: String,
    /// Data kind.
    pub kind: LayerKind,
    /// Initial visibility.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether the layer takes part in rendering.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl LayerConfig {
    /// Instantiates the configured layer.
    pub fn to_layer(&self) -> Layer {
        Layer::new(LayerUid(self.uid), self.name.clone(), self.kind)
            .with_visible(self.visible)
            .with_enabled(self.enabled)
    }
}

/// Configuration of one sampler binding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SamplerBindingConfig {
    /// Uniform name.
    pub name: String,
    /// What the binding carries.
    pub usage: SamplerUsage,
    /// Texture unit.
    pub unit: u32,
}

/// Top-level terrain rendering configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TerrainConfig {
    /// Whether elevation textures are padded with a one-texel border.
    #[serde(default)]
    pub use_texture_border: bool,
    /// Default LOD scale applied to computed ranges.
    #[serde(default = "default_lod_scale")]
    pub lod_scale: f32,
    /// Layer stack in draw order.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
    /// Sampler bindings.
    #[serde(default)]
    pub bindings: Vec<SamplerBindingConfig>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            use_texture_border: false,
            lod_scale: default_lod_scale(),
            layers: Vec::new(),
            bindings: Vec::new(),
        }
    }
}

impl TerrainConfig {
    /// Parses and validates a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading terrain config from '{}'", path.display());
        Self::from_ron_str(&text)
    }

    /// Checks invariants that the type system does not express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.lod_scale.is_finite() && self.lod_scale > 0.0) {
            return Err(ConfigError::InvalidLodScale(self.lod_scale));
        }
        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.uid) {
                return Err(ConfigError::DuplicateLayerUid(layer.uid));
            }
            if layer.kind == LayerKind::Patch {
                return Err(ConfigError::PatchLayerInConfig(layer.uid));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::RenderContext;

    const SAMPLE: &str = r#"
        (
            use_texture_border: true,
            layers: [
                (uid: 1, name: "imagery", kind: Image),
                (uid: 2, name: "basemap", kind: Tile, visible: false),
                (uid: 3, name: "dem", kind: Elevation, enabled: false),
            ],
            bindings: [
                (name: "terra_tex", usage: Color, unit: 0),
                (name: "terra_elev", usage: Elevation, unit: 1),
            ],
        )
    "#;

    #[test]
    fn test_parse_sample() {
        let config = TerrainConfig::from_ron_str(SAMPLE).unwrap();
        assert!(config.use_texture_border);
        assert_eq!(config.lod_scale, 1.0);
        assert_eq!(config.layers.len(), 3);
        assert!(!config.layers[1].visible);
        assert!(config.layers[0].enabled);
        assert!(!config.layers[2].enabled);
        assert_eq!(config.bindings[1].usage, SamplerUsage::Elevation);
    }

    #[test]
    fn test_context_from_config() {
        let config = TerrainConfig::from_ron_str(SAMPLE).unwrap();
        let ctx = RenderContext::from_config(&config).unwrap();
        assert!(ctx.use_texture_border());
        assert_eq!(ctx.render_bindings().len(), 2);
        let basemap = ctx.map_frame().data_layer(LayerUid(2)).unwrap();
        assert!(!basemap.is_visible());
        assert_eq!(basemap.kind(), LayerKind::Tile);
    }

    #[test]
    fn test_duplicate_uid_rejected() {
        let text = r#"(layers: [(uid: 1, name: "a", kind: Image), (uid: 1, name: "b", kind: Tile)])"#;
        assert!(matches!(
            TerrainConfig::from_ron_str(text),
            Err(ConfigError::DuplicateLayerUid(1))
        ));
    }

    #[test]
    fn test_patch_layer_rejected() {
        let text = r#"(layers: [(uid: 1, name: "a", kind: Image), (uid: 7, name: "grass", kind: Patch)])"#;
        assert!(matches!(
            TerrainConfig::from_ron_str(text),
            Err(ConfigError::PatchLayerInConfig(7))
        ));
    }

    #[test]
    fn test_invalid_lod_scale_rejected() {
        assert!(matches!(
            TerrainConfig::from_ron_str("(lod_scale: 0.0)"),
            Err(ConfigError::InvalidLodScale(_))
        ));
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(
            TerrainConfig::from_ron_str("(layers: [(uid: \"x\")])"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = TerrainConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
