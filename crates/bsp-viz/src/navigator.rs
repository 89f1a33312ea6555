//! BSP tree navigation utilities for interactive visualization.

use bsp_raster::render::{render_subtree, FrameStats};
use bsp_raster::{BspTree, NodeId, PixelSurface, PointPool, RenderOptions};
use macroquad::prelude::{
    draw_text, is_key_pressed, KeyCode, DARKGRAY, GREEN, LIGHTGRAY, ORANGE, WHITE, YELLOW,
};
use nalgebra::{Matrix4, Point3};

/// Direction taken at each node in the navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Front,
    Back,
}

/// Interactive BSP tree navigator for exploring tree structure.
///
/// The navigator stores the path from the root rather than a node id so it
/// stays meaningful when the tree is rebuilt; a path the new tree cannot
/// follow is cut back to its longest valid prefix.
#[derive(Debug, Default, Clone)]
pub struct TreeNavigator {
    path: Vec<Direction>,
}

impl TreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns the current navigation path.
    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to navigate to the front child. Returns true if successful.
    pub fn go_front(&mut self, tree: &BspTree) -> bool {
        self.descend(tree, Direction::Front)
    }

    /// Attempts to navigate to the back child. Returns true if successful.
    pub fn go_back(&mut self, tree: &BspTree) -> bool {
        self.descend(tree, Direction::Back)
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node. Returns true if the path changed.
    pub fn go_root(&mut self) -> bool {
        let moved = !self.path.is_empty();
        self.path.clear();
        moved
    }

    fn descend(&mut self, tree: &BspTree, direction: Direction) -> bool {
        let Some(id) = self.current(tree) else {
            return false;
        };
        if child(tree, id, direction).is_none() {
            return false;
        }
        self.path.push(direction);
        true
    }

    /// Drops the part of the path `tree` has no node for.
    pub fn revalidate(&mut self, tree: &BspTree) {
        let mut valid = 0;
        let mut current = tree.root();
        for &direction in &self.path {
            match current.and_then(|id| child(tree, id, direction)) {
                Some(next) => {
                    current = Some(next);
                    valid += 1;
                }
                None => break,
            }
        }
        self.path.truncate(valid);
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update(&mut self, tree: &BspTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::F) {
            changed |= self.go_front(tree);
        }
        if is_key_pressed(KeyCode::B) {
            changed |= self.go_back(tree);
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) {
            changed |= self.go_root();
        }

        changed
    }

    /// Returns the id of the current node, if the tree is non-empty and
    /// the path is valid for it.
    pub fn current(&self, tree: &BspTree) -> Option<NodeId> {
        let mut current = tree.root()?;
        for &direction in &self.path {
            current = child(tree, current, direction)?;
        }
        Some(current)
    }

    /// Renders only the triangles of the current subtree, back to front.
    pub fn render<S: PixelSurface + ?Sized>(
        &self,
        tree: &BspTree,
        points: &PointPool,
        eye: Point3<f32>,
        view: &Matrix4<f32>,
        surface: &mut S,
        options: &RenderOptions,
    ) -> FrameStats {
        render_subtree(tree, self.current(tree), points, eye, view, surface, options)
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, tree: &BspTree, y_offset: f32) {
        let current = self.current(tree);
        let subtree_triangles = current
            .map(|id| subtree_triangle_count(tree, id))
            .unwrap_or(0);
        let node = current.map(|id| tree.node(id));
        let has_front = node.is_some_and(|n| n.front().is_some());
        let has_back = node.is_some_and(|n| n.back().is_some());
        let is_leaf = node.is_none_or(|n| n.is_leaf());

        draw_text(
            &format!("Subtree: {} triangles", subtree_triangles),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_string(&self.path), self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}{}{}",
                if has_front { "[F]ront " } else { "" },
                if has_back { "[B]ack " } else { "" },
                if is_leaf { "(leaf)" } else { "" }
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if is_leaf { ORANGE } else { GREEN },
        );
        if let Some(node) = node {
            let c = node.plane().coefficients();
            let indices: Vec<String> = node
                .triangles()
                .iter()
                .map(|t| {
                    let [a, b, c] = t.indices();
                    format!("[{a} {b} {c}]")
                })
                .collect();
            draw_text(
                &format!(
                    "Plane ({:.2}, {:.2}, {:.2}, {:.2}): {}",
                    c.x,
                    c.y,
                    c.z,
                    c.w,
                    indices.join(" ")
                ),
                10.0,
                y_offset + 60.0,
                16.0,
                LIGHTGRAY,
            );
        }
        draw_text(
            "[P]arent | [R]oot",
            10.0,
            y_offset + 80.0,
            16.0,
            DARKGRAY,
        );
    }
}

fn child(tree: &BspTree, id: NodeId, direction: Direction) -> Option<NodeId> {
    let node = tree.node(id);
    match direction {
        Direction::Front => node.front(),
        Direction::Back => node.back(),
    }
}

fn subtree_triangle_count(tree: &BspTree, id: NodeId) -> usize {
    let mut count = 0;
    let mut stack = vec![id];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        count += node.triangle_count();
        stack.extend(node.front());
        stack.extend(node.back());
    }
    count
}

fn path_string(path: &[Direction]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    path.iter()
        .map(|d| match d {
            Direction::Front => "F",
            Direction::Back => "B",
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}
