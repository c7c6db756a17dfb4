//! Expanded tree → target content.
//!
//! Converts a component-free `VNode` tree into canvas draw commands or
//! document pages. Unknown elements are treated as groups and walked.

use easel_core::{Element, VNode};

use crate::target::{DocumentPage, DrawCommand, PageLayout};

/// Tags that start a new document page.
const PAGE_BREAK_TAGS: &[&str] = &["page", "page-break"];

/// Tags laid out as a single line of text in documents.
const BLOCK_TAGS: &[&str] = &["p", "text", "h1", "h2", "h3", "li", "line"];

/// Build draw commands for every drawable element, in tree order.
pub fn collect_commands(node: &VNode) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    collect_into(node, &mut commands);
    commands
}

fn collect_into(node: &VNode, commands: &mut Vec<DrawCommand>) {
    match node {
        VNode::Element(el) => match draw_command(el) {
            Some(command) => commands.push(command),
            None => el.children.iter().for_each(|child| collect_into(child, commands)),
        },
        // Free-floating text has no position on a canvas.
        VNode::Text(_) => {}
        other => other
            .child_nodes()
            .iter()
            .for_each(|child| collect_into(child, commands)),
    }
}

fn draw_command(el: &Element) -> Option<DrawCommand> {
    let num = |name: &str| el.number(name).unwrap_or(0.0);
    let color = |name: &str| el.string(name).map(str::to_string);

    match el.tag.as_str() {
        "rect" => Some(DrawCommand::Rect {
            x: num("x"),
            y: num("y"),
            width: num("width"),
            height: num("height"),
            fill: color("fill"),
        }),
        "circle" => Some(DrawCommand::Circle {
            cx: num("x"),
            cy: num("y"),
            radius: num("radius"),
            fill: color("fill"),
        }),
        "line" => Some(DrawCommand::Line {
            x1: num("x1"),
            y1: num("y1"),
            x2: num("x2"),
            y2: num("y2"),
            stroke: color("stroke"),
        }),
        "text" => Some(DrawCommand::Text {
            x: num("x"),
            y: num("y"),
            content: el
                .string("text")
                .map(str::to_string)
                .unwrap_or_else(|| VNode::Element(el.clone()).text_content()),
            fill: color("fill"),
        }),
        _ => None,
    }
}

/// Lines that fit on one page of `layout`. Always at least one.
pub fn lines_per_page(layout: PageLayout, line_height: f64) -> usize {
    if line_height <= 0.0 {
        return 1;
    }
    let usable = layout.height - 2.0 * layout.margin;
    ((usable / line_height).floor() as usize).max(1)
}

/// Flow the tree's text onto pages. The result always holds at least one page.
pub fn paginate(node: &VNode, layout: PageLayout, line_height: f64) -> Vec<DocumentPage> {
    let capacity = lines_per_page(layout, line_height);
    let mut flow = PageFlow {
        capacity,
        pages: vec![DocumentPage { number: 1, lines: Vec::new() }],
    };
    flow.walk(node);
    flow.pages
}

struct PageFlow {
    capacity: usize,
    pages: Vec<DocumentPage>,
}

impl PageFlow {
    fn walk(&mut self, node: &VNode) {
        match node {
            VNode::Text(text) => text.lines().for_each(|line| self.push_line(line)),
            VNode::Element(el) if PAGE_BREAK_TAGS.contains(&el.tag.as_str()) => {
                self.break_page();
                el.children.iter().for_each(|child| self.walk(child));
            }
            VNode::Element(el) if BLOCK_TAGS.contains(&el.tag.as_str()) => {
                let text = el
                    .string("text")
                    .map(str::to_string)
                    .unwrap_or_else(|| node.text_content());
                self.push_line(&text);
            }
            other => other.child_nodes().iter().for_each(|child| self.walk(child)),
        }
    }

    fn current(&mut self) -> &mut DocumentPage {
        let next = self.pages.len() + 1;
        if self.pages.is_empty() {
            self.pages.push(DocumentPage { number: next, lines: Vec::new() });
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn push_line(&mut self, line: &str) {
        if self.current().lines.len() >= self.capacity {
            self.break_page();
        }
        self.current().lines.push(line.to_string());
    }

    /// Start a new page unless the current one is still empty.
    fn break_page(&mut self) {
        if self.current().lines.is_empty() {
            return;
        }
        let number = self.pages.len() + 1;
        self.pages.push(DocumentPage { number, lines: Vec::new() });
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(height: f64, margin: f64) -> PageLayout {
        PageLayout { width: 200.0, height, margin }
    }

    #[test]
    fn test_collect_commands_walks_groups() {
        let tree = VNode::fragment([
            Element::new("group")
                .child(
                    Element::new("rect")
                        .attr("x", 1)
                        .attr("y", 2)
                        .attr("width", 30)
                        .attr("height", 40)
                        .attr("fill", "#f00")
                        .into(),
                )
                .child(VNode::text("ignored"))
                .into(),
            Element::new("text")
                .attr("x", 5)
                .attr("y", 6)
                .child(VNode::text("hello"))
                .into(),
        ]);

        let commands = collect_commands(&tree);
        assert_eq!(
            commands,
            vec![
                DrawCommand::Rect {
                    x: 1.0,
                    y: 2.0,
                    width: 30.0,
                    height: 40.0,
                    fill: Some("#f00".into()),
                },
                DrawCommand::Text {
                    x: 5.0,
                    y: 6.0,
                    content: "hello".into(),
                    fill: None,
                },
            ]
        );
    }

    #[test]
    fn test_lines_per_page() {
        assert_eq!(lines_per_page(layout(300.0, 10.0), 16.0), 17);
        assert_eq!(lines_per_page(layout(10.0, 10.0), 16.0), 1);
        assert_eq!(lines_per_page(layout(300.0, 0.0), 0.0), 1);
    }

    #[test]
    fn test_paginate_overflows_and_breaks() {
        // 2 lines per page.
        let page = layout(52.0, 10.0);
        let tree = VNode::fragment([
            Element::new("p").child(VNode::text("one")).into(),
            Element::new("p").child(VNode::text("two")).into(),
            Element::new("p").child(VNode::text("three")).into(),
            Element::new("page").into(),
            VNode::text("four\nfive"),
        ]);

        let pages = paginate(&tree, page, 16.0);
        let lines: Vec<Vec<&str>> = pages
            .iter()
            .map(|p| p.lines.iter().map(String::as_str).collect())
            .collect();
        assert_eq!(lines, vec![vec!["one", "two"], vec!["three"], vec!["four", "five"]]);
        assert_eq!(pages.last().unwrap().number, 3);
    }

    #[test]
    fn test_paginate_empty_tree_has_one_page() {
        let pages = paginate(&VNode::Fragment(Vec::new()), layout(300.0, 10.0), 16.0);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }
}
