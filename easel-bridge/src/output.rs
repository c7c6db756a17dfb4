//! Output selector: the bridge's own, host-rendered node.
//!
//! The node is what the host commits for the bridge; the target factory later
//! looks it up by id. Selection is pure.

use easel_core::{Element, VNode};
use easel_render::SurfaceKind;
use serde_json::{json, Value};

pub const OUTPUT_CLASS: &str = "render-output";
pub const FRAME_CLASS: &str = "surface-frame";
pub const DOCUMENT_MIME: &str = "application/pdf";

/// Embedding node for a surface of `kind` addressable as `#id`.
pub fn select_output(kind: &SurfaceKind, id: &str) -> VNode {
    match kind {
        SurfaceKind::Canvas => Element::new("div")
            .attr("id", id)
            .attr("class", OUTPUT_CLASS)
            .into(),
        SurfaceKind::Document => frame(id)
            .attr("style", json!({"height": "100%", "width": "100%"}))
            .into(),
        SurfaceKind::Unrecognized(_) => frame(id).into(),
    }
}

/// Empty embedding frame with a placeholder source.
fn frame(id: &str) -> Element {
    Element::new("iframe")
        .attr("id", id)
        .attr("class", format!("{FRAME_CLASS} {OUTPUT_CLASS}"))
        .attr("type", DOCUMENT_MIME)
        .attr("src", Value::Null)
}
