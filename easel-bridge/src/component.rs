//! Registration of the bridge under its fixed component name.

use easel_core::{ComponentRegistry, PropKind, PropSpec, RegisteredComponent};
use serde_json::{Map, Value};

use crate::error::BridgeError;
use crate::props::BridgeProps;

/// Name host applications declare the bridge by.
pub const SURFACE_FRAME: &str = "SurfaceFrame";

pub const SURFACE_FRAME_PROPS: &[PropSpec] = &[
    PropSpec::required("type", PropKind::String),
    PropSpec::required("id", PropKind::String),
    PropSpec::required("height", PropKind::Number),
    PropSpec::required("width", PropKind::Number),
    PropSpec::required("margin", PropKind::Number),
    PropSpec::optional("ctxConfig", PropKind::Object),
    PropSpec::optional("layerSetting", PropKind::Object),
];

pub fn register(registry: &mut ComponentRegistry) -> Result<(), BridgeError> {
    registry.register(RegisteredComponent {
        name: SURFACE_FRAME,
        module: module_path!(),
        props: SURFACE_FRAME_PROPS,
    })?;
    Ok(())
}

/// Validate a host declaration of the bridge and turn it into props.
pub fn props_from_declaration(
    registry: &ComponentRegistry,
    declared: &Map<String, Value>,
) -> Result<BridgeProps, BridgeError> {
    registry.validate_props(SURFACE_FRAME, declared)?;
    BridgeProps::from_value(Value::Object(declared.clone()))
}
