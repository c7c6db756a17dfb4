//! Render targets.
//!
//! Two variants, mirroring the two ways a surface can be backed:
//!
//! 1. **Canvas**: bound to an addressable drawing surface; holds the
//!    display list drawn into it.
//! 2. **Document**: produces a paginated byte stream and announces each
//!    regenerated output through an update callback.
//!
//! A target is flushed, never rebuilt, between render passes of one mount.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::descriptor::{ConfigMap, SurfaceKind};

/// Identity of one constructed target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TargetId(Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Called with the new content source whenever a document is regenerated.
pub type UpdateCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<String>,
    },
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Option<String>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        fill: Option<String>,
    },
}

// ---------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------

pub struct CanvasTarget {
    id: TargetId,
    surface_id: String,
    context_config: ConfigMap,
    layer_config: ConfigMap,
    commands: Vec<DrawCommand>,
    flushes: u64,
    frames: u64,
}

impl CanvasTarget {
    pub fn new(surface_id: impl Into<String>, context_config: ConfigMap, layer_config: ConfigMap) -> Self {
        Self {
            id: TargetId::new(),
            surface_id: surface_id.into(),
            context_config,
            layer_config,
            commands: Vec::new(),
            flushes: 0,
            frames: 0,
        }
    }

    /// Id of the output element this canvas is bound to.
    pub fn surface_id(&self) -> &str {
        &self.surface_id
    }

    pub fn context_config(&self) -> &ConfigMap {
        &self.context_config
    }

    pub fn layer_config(&self) -> &ConfigMap {
        &self.layer_config
    }

    /// Append one frame's worth of commands.
    pub fn draw(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.commands.extend(commands);
        self.frames += 1;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn flush(&mut self) {
        self.commands.clear();
        self.flushes += 1;
    }
}

impl fmt::Debug for CanvasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasTarget")
            .field("id", &self.id)
            .field("surface_id", &self.surface_id)
            .field("commands", &self.commands.len())
            .field("flushes", &self.flushes)
            .finish()
    }
}

// ---------------------------------------------------------------
// Document
// ---------------------------------------------------------------

/// Page geometry of a document target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPage {
    pub number: usize,
    pub lines: Vec<String>,
}

pub struct DocumentTarget {
    id: TargetId,
    frame_id: String,
    layout: PageLayout,
    pages: Vec<DocumentPage>,
    content: Vec<u8>,
    source: Option<String>,
    on_update: UpdateCallback,
    flushes: u64,
    revision: u64,
}

impl DocumentTarget {
    pub fn new(frame_id: impl Into<String>, layout: PageLayout, on_update: UpdateCallback) -> Self {
        Self {
            id: TargetId::new(),
            frame_id: frame_id.into(),
            layout,
            pages: Vec::new(),
            content: Vec::new(),
            source: None,
            on_update,
            flushes: 0,
            revision: 0,
        }
    }

    /// Id of the embedding frame element.
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn pages(&self) -> &[DocumentPage] {
        &self.pages
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Content source most recently announced to the frame.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Store a regenerated document and announce it under a fresh source.
    pub fn publish(&mut self, pages: Vec<DocumentPage>, content: Vec<u8>) -> String {
        self.pages = pages;
        self.content = content;
        self.revision += 1;
        let source = format!("blob://{}", Uuid::new_v4());
        self.notify_update(&source);
        source
    }

    /// Announce `source` as the frame's content source.
    pub fn notify_update(&mut self, source: &str) {
        self.source = Some(source.to_string());
        (self.on_update)(source);
    }

    fn flush(&mut self) {
        self.pages.clear();
        self.content.clear();
        self.flushes += 1;
    }
}

impl fmt::Debug for DocumentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentTarget")
            .field("id", &self.id)
            .field("frame_id", &self.frame_id)
            .field("layout", &self.layout)
            .field("pages", &self.pages.len())
            .field("source", &self.source)
            .field("revision", &self.revision)
            .finish()
    }
}

// ---------------------------------------------------------------
// RenderTarget
// ---------------------------------------------------------------

#[derive(Debug)]
pub enum RenderTarget {
    Canvas(CanvasTarget),
    Document(DocumentTarget),
}

impl RenderTarget {
    pub fn id(&self) -> TargetId {
        match self {
            RenderTarget::Canvas(t) => t.id,
            RenderTarget::Document(t) => t.id,
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        match self {
            RenderTarget::Canvas(_) => SurfaceKind::Canvas,
            RenderTarget::Document(_) => SurfaceKind::Document,
        }
    }

    /// Clear previously rendered content, keeping the binding.
    pub fn flush(&mut self) {
        match self {
            RenderTarget::Canvas(t) => t.flush(),
            RenderTarget::Document(t) => t.flush(),
        }
    }

    pub fn flush_count(&self) -> u64 {
        match self {
            RenderTarget::Canvas(t) => t.flushes,
            RenderTarget::Document(t) => t.flushes,
        }
    }

    pub fn as_canvas(&self) -> Option<&CanvasTarget> {
        match self {
            RenderTarget::Canvas(t) => Some(t),
            RenderTarget::Document(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentTarget> {
        match self {
            RenderTarget::Document(t) => Some(t),
            RenderTarget::Canvas(_) => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut DocumentTarget> {
        match self {
            RenderTarget::Document(t) => Some(t),
            RenderTarget::Canvas(_) => None,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
