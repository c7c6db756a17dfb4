//! Foreign renderer boundary.
//!
//! A `ForeignRenderer` receives a tree and a target and draws one into the
//! other. It runs its own reconciliation pass (`easel_core::expand`) over the
//! tree, outside the host's traversal, so whatever ancestry the tree needs
//! has to travel inside it.

use easel_core::{expand, Scope, VNode};
use thiserror::Error;

use crate::scene::{collect_commands, paginate};
use crate::target::{DocumentPage, PageLayout, RenderTarget};

/// Default line height for document flow, in layout units.
pub const DEFAULT_LINE_HEIGHT: f64 = 16.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Renderer rejected target: {0}")]
    Rejected(String),
}

pub trait ForeignRenderer {
    /// Render `tree` into `target`. Called once per mount pass; the target has
    /// already been flushed when it is reused.
    fn render(&mut self, tree: &VNode, target: &mut RenderTarget) -> Result<(), RenderError>;
}

impl<R: ForeignRenderer + ?Sized> ForeignRenderer for Box<R> {
    fn render(&mut self, tree: &VNode, target: &mut RenderTarget) -> Result<(), RenderError> {
        (**self).render(tree, target)
    }
}

/// Serialized form of a generated document.
#[derive(serde::Serialize)]
struct EncodedDocument<'a> {
    layout: PageLayout,
    pages: &'a [DocumentPage],
}

/// Reference renderer: draw commands for canvases, flowed pages for documents.
#[derive(Debug)]
pub struct SceneRenderer {
    line_height: f64,
    passes: u64,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_HEIGHT)
    }
}

impl SceneRenderer {
    pub fn new(line_height: f64) -> Self {
        Self {
            line_height,
            passes: 0,
        }
    }

    /// Number of completed render calls.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}

impl ForeignRenderer for SceneRenderer {
    fn render(&mut self, tree: &VNode, target: &mut RenderTarget) -> Result<(), RenderError> {
        let expanded = expand(tree, &Scope::detached());

        match target {
            RenderTarget::Canvas(canvas) => {
                let commands = collect_commands(&expanded);
                log::trace!("Drawing {} command(s) into #{}", commands.len(), canvas.surface_id());
                canvas.draw(commands);
            }
            RenderTarget::Document(document) => {
                let layout = document.layout();
                let pages = paginate(&expanded, layout, self.line_height);
                let content = serde_json::to_vec(&EncodedDocument { layout, pages: &pages })?;
                let source = document.publish(pages, content);
                log::trace!("Published document for #{} as {source}", document.frame_id());
            }
        }

        self.passes += 1;
        Ok(())
    }
}

// ===================================================================
// Tests
// ===================================================================
