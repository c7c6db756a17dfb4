//! Bridge configuration: component props and runtime tuning.

use easel_render::{ConfigMap, SurfaceDescriptor, SurfaceKind, DEFAULT_LINE_HEIGHT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BridgeError;

/// Props a host passes when it declares the bridge component.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BridgeProps {
    #[serde(rename = "type")]
    pub kind: SurfaceKind,
    pub id: String,
    pub height: f64,
    pub width: f64,
    pub margin: f64,
    #[serde(rename = "ctxConfig", default)]
    pub ctx_config: ConfigMap,
    #[serde(rename = "layerSetting", default)]
    pub layer_setting: ConfigMap,
}

impl BridgeProps {
    pub fn new(kind: SurfaceKind, id: impl Into<String>, width: f64, height: f64, margin: f64) -> Self {
        Self {
            kind,
            id: id.into(),
            height,
            width,
            margin,
            ctx_config: ConfigMap::new(),
            layer_setting: ConfigMap::new(),
        }
    }

    pub fn canvas(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(SurfaceKind::Canvas, id, width, height, 0.0)
    }

    pub fn document(id: impl Into<String>, width: f64, height: f64, margin: f64) -> Self {
        Self::new(SurfaceKind::Document, id, width, height, margin)
    }

    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// The immutable surface descriptor for one mount.
    pub fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor::new(self.kind.clone(), self.id.clone(), self.width, self.height, self.margin)
            .with_context_config(self.ctx_config.clone())
            .with_layer_config(self.layer_setting.clone())
    }
}

/// Runtime tuning for a bridge host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Line height used when flowing document text.
    pub line_height: f64,
    /// Number of diagnostics kept before the oldest are dropped.
    pub diagnostics_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            line_height: DEFAULT_LINE_HEIGHT,
            diagnostics_capacity: 64,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_props_from_json_defaults_configs() {
        let props = BridgeProps::from_json(
            r#"{"type": "canvas", "id": "c1", "width": 100, "height": 100, "margin": 0}"#,
        )
        .unwrap();
        assert_eq!(props, BridgeProps::canvas("c1", 100.0, 100.0));
        assert!(props.ctx_config.is_empty());
        assert!(props.layer_setting.is_empty());
    }

    #[test]
    fn test_descriptor_forwards_everything() {
        let props = BridgeProps::from_value(json!({
            "type": "pdf",
            "id": "d1",
            "width": 200,
            "height": 300,
            "margin": 10,
            "ctxConfig": {"alpha": true},
            "layerSetting": {"events": false}
        }))
        .unwrap();

        let descriptor = props.descriptor();
        assert_eq!(descriptor.kind, SurfaceKind::Document);
        assert_eq!(
            (descriptor.width, descriptor.height, descriptor.margin),
            (200.0, 300.0, 10.0)
        );
        assert_eq!(descriptor.context_config.get("alpha"), Some(&json!(true)));
        assert_eq!(descriptor.layer_config.get("events"), Some(&json!(false)));
    }

    #[test]
    fn test_unrecognized_type_still_parses() {
        let props = BridgeProps::from_value(json!({
            "type": "hologram", "id": "h", "width": 1, "height": 1, "margin": 0
        }))
        .unwrap();
        assert_eq!(props.kind, SurfaceKind::Unrecognized("hologram".into()));
    }

    #[test]
    fn test_missing_required_prop_is_error() {
        let err = BridgeProps::from_value(json!({"type": "canvas", "id": "c"})).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidProps(_)));
    }

    #[test]
    fn test_config_defaults() {
        let config: BridgeConfig = serde_json::from_str(r#"{"line_height": 12}"#).unwrap();
        assert_eq!(config.line_height, 12.0);
        assert_eq!(config.diagnostics_capacity, 64);
    }
}
