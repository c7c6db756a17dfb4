//! Easel demo: mounts a canvas bridge and a document bridge under a small
//! provider chain and prints what each surface received.
//!
//! Run with `RUST_LOG=debug` to follow the mount state machine.

use std::error::Error;

use easel_bridge::{props_from_declaration, register, BridgeConfig, BridgeProps, BridgeRuntime};
use easel_core::{
    slot, AppContext, Component, ComponentRegistry, Element, HostTree, InjectionKey, OutputTree,
    Scope, VNode,
};
use log::info;
use serde_json::json;

const ACCENT: InjectionKey<String> = InjectionKey::new("accent");
const TITLE: InjectionKey<String> = InjectionKey::new("title");

/// Badge colored by the nearest provided accent.
struct Badge;

impl Component for Badge {
    fn name(&self) -> &str {
        "Badge"
    }

    fn render(&self, scope: &mut Scope) -> VNode {
        let accent = scope.inject(ACCENT).map(|a| a.as_ref().clone()).unwrap_or_default();
        Element::new("g")
            .child(
                Element::new("circle")
                    .attr("x", 40)
                    .attr("y", 40)
                    .attr("radius", 24)
                    .attr("fill", accent.as_str())
                    .into(),
            )
            .child(
                Element::new("text")
                    .attr("x", 28)
                    .attr("y", 44)
                    .attr("fill", "#fff")
                    .child(VNode::text("ok"))
                    .into(),
            )
            .into()
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut registry = ComponentRegistry::new();
    register(&mut registry)?;

    let mut host = HostTree::new();
    let app = host.mount_root(AppContext::new("easel-demo"), "App");
    host.provide(app, ACCENT, "#e4572e".to_string())?;
    let layout = host.create_child(app, "Layout")?;
    host.provide(layout, TITLE, "Quarterly report".to_string())?;
    let canvas_bridge = host.create_child(layout, "SurfaceFrame")?;
    let document_bridge = host.create_child(layout, "SurfaceFrame")?;

    let output = OutputTree::shared();
    let mut runtime = BridgeRuntime::scene(output.clone(), BridgeConfig::default());

    let declared: serde_json::Map<String, serde_json::Value> = serde_json::from_value(json!({
        "type": "canvas", "id": "badge", "width": 80, "height": 80, "margin": 0,
        "ctxConfig": {"alpha": true}
    }))?;
    let canvas_props = props_from_declaration(&registry, &declared)?;
    let canvas = runtime.mount(
        canvas_props,
        host.context(canvas_bridge)?,
        Some(slot(|_| vec![VNode::component(Badge, vec![])])),
    )?;

    let document = runtime.mount(
        BridgeProps::document("report", 595.0, 842.0, 36.0),
        host.context(document_bridge)?,
        Some(slot(|scope| {
            let title = scope.inject(TITLE).map(|t| t.as_ref().clone()).unwrap_or_default();
            vec![
                Element::new("h1").child(VNode::text(title)).into(),
                Element::new("p").child(VNode::text("Revenue grew in every region.")).into(),
                Element::new("page-break").into(),
                Element::new("p").child(VNode::text("Appendix")).into(),
            ]
        })),
    )?;

    if let Some(target) = runtime.target(&canvas).and_then(|t| t.as_canvas()) {
        info!("Canvas #{} received {} command(s)", target.surface_id(), target.commands().len());
        println!("{}", serde_json::to_string_pretty(target.commands())?);
    }

    if let Some(target) = runtime.target(&document).and_then(|t| t.as_document()) {
        for page in target.pages() {
            println!("page {}: {:?}", page.number, page.lines);
        }
    }

    let tree = output.read().map_err(|_| "output tree poisoned")?;
    for id in [canvas.as_str(), document.as_str()] {
        if let Some(element) = tree.element(id) {
            println!("#{id} <{}> {}", element.tag, serde_json::to_string(&element.attrs)?);
        }
    }

    for diagnostic in runtime.diagnostics() {
        println!("diagnostic: {diagnostic}");
    }

    Ok(())
}
