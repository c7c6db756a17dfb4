//! Surface descriptors: what kind of target a mount point asks for.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form configuration forwarded verbatim to a canvas target.
pub type ConfigMap = Map<String, Value>;

/// Kind of drawing surface requested by a mount point.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SurfaceKind {
    Canvas,
    Document,
    /// Any tag not understood by the target factory, kept for diagnostics.
    Unrecognized(String),
}

impl SurfaceKind {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "canvas" => SurfaceKind::Canvas,
            "document" | "pdf" => SurfaceKind::Document,
            other => SurfaceKind::Unrecognized(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SurfaceKind::Canvas => "canvas",
            SurfaceKind::Document => "document",
            SurfaceKind::Unrecognized(tag) => tag,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, SurfaceKind::Unrecognized(_))
    }
}

impl From<String> for SurfaceKind {
    fn from(tag: String) -> Self {
        SurfaceKind::parse(&tag)
    }
}

impl From<SurfaceKind> for String {
    fn from(kind: SurfaceKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to build a render target for one mount point.
/// Immutable for the lifetime of a mount.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceDescriptor {
    pub kind: SurfaceKind,
    /// Id of the embedding output element.
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    #[serde(default)]
    pub context_config: ConfigMap,
    #[serde(default)]
    pub layer_config: ConfigMap,
}

impl SurfaceDescriptor {
    pub fn new(kind: SurfaceKind, id: impl Into<String>, width: f64, height: f64, margin: f64) -> Self {
        Self {
            kind,
            id: id.into(),
            width,
            height,
            margin,
            context_config: ConfigMap::new(),
            layer_config: ConfigMap::new(),
        }
    }

    pub fn canvas(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self::new(SurfaceKind::Canvas, id, width, height, 0.0)
    }

    pub fn document(id: impl Into<String>, width: f64, height: f64, margin: f64) -> Self {
        Self::new(SurfaceKind::Document, id, width, height, margin)
    }

    pub fn with_context_config(mut self, config: ConfigMap) -> Self {
        self.context_config = config;
        self
    }

    pub fn with_layer_config(mut self, config: ConfigMap) -> Self {
        self.layer_config = config;
        self
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert_eq!(SurfaceKind::parse("canvas"), SurfaceKind::Canvas);
        assert_eq!(SurfaceKind::parse("pdf"), SurfaceKind::Document);
        assert_eq!(SurfaceKind::parse("document"), SurfaceKind::Document);
        assert_eq!(
            SurfaceKind::parse("webgl"),
            SurfaceKind::Unrecognized("webgl".into())
        );
        assert!(!SurfaceKind::parse("").is_recognized());
    }

    #[test]
    fn test_kind_serde_uses_tag() {
        let kind: SurfaceKind = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(kind, SurfaceKind::Document);
        assert_eq!(serde_json::to_string(&SurfaceKind::Canvas).unwrap(), "\"canvas\"");
    }

    #[test]
    fn test_descriptor_defaults_configs() {
        let descriptor: SurfaceDescriptor = serde_json::from_str(
            r#"{"kind": "canvas", "id": "c1", "width": 100, "height": 100, "margin": 0}"#,
        )
        .unwrap();
        assert_eq!(descriptor, SurfaceDescriptor::canvas("c1", 100.0, 100.0));
        assert!(descriptor.context_config.is_empty());
    }
}
