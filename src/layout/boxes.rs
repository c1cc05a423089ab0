//! Declarative layout tree
//!
//! A [`LayoutBox`] describes *how* space should be split, never *where* things
//! end up. Trees are cheap and rebuilt from scratch on every layout pass; the
//! arrangement step turns them into concrete rectangles.
//!
//! Each node is exactly one of:
//! - a leaf naming a window,
//! - a static parent with a list of children,
//! - a conditional parent whose children are computed from the space it
//!   receives (evaluated once per arrangement pass).
//!
//! Along its parent's main axis a node either has a fixed `size` or a relative
//! `weight`, never both. Mixing the two (or giving a leaf children) is a bug in
//! whatever built the tree, so the builder methods panic instead of guessing.

use std::fmt;
use std::sync::Arc;

/// Main axis of a parent box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Children stacked vertically, each spanning the full width
    #[default]
    Row,
    /// Children placed side by side, each spanning the full height
    Column,
}

/// How much of the parent's main axis a box claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sizing {
    /// Contributes no space
    #[default]
    None,
    /// Fixed number of cells
    Size(u16),
    /// Proportional share of what the fixed siblings leave over
    Weight(u16),
}

/// Children computed from the available `(width, height)`
///
/// Must be pure: the same inputs always yield the same tree.
pub type ChildrenFn = Arc<dyn Fn(i32, i32) -> Vec<LayoutBox> + Send + Sync>;

/// What a box holds
#[derive(Clone)]
pub enum BoxContent {
    /// Leaf: the logical window (panel) name receiving this box's rectangle
    Window(String),
    /// Static children, laid out along the box direction
    Children(Vec<LayoutBox>),
    /// Children decided at arrangement time from the box's own size
    Conditional(ChildrenFn),
}

impl fmt::Debug for BoxContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxContent::Window(name) => f.debug_tuple("Window").field(name).finish(),
            BoxContent::Children(children) => f.debug_tuple("Children").field(children).finish(),
            BoxContent::Conditional(_) => f.write_str("Conditional(..)"),
        }
    }
}

/// Node of the layout tree
#[derive(Debug, Clone)]
pub struct LayoutBox {
    pub direction: Direction,
    pub sizing: Sizing,
    /// Separator cells reserved between adjacent children
    pub spacing: u16,
    pub content: BoxContent,
}

impl LayoutBox {
    /// Leaf box for a named window
    pub fn window(name: impl Into<String>) -> Self {
        Self {
            direction: Direction::default(),
            sizing: Sizing::None,
            spacing: 0,
            content: BoxContent::Window(name.into()),
        }
    }

    /// Parent stacking `children` vertically
    pub fn rows(children: Vec<LayoutBox>) -> Self {
        Self::parent(Direction::Row, children)
    }

    /// Parent placing `children` side by side
    pub fn columns(children: Vec<LayoutBox>) -> Self {
        Self::parent(Direction::Column, children)
    }

    pub fn parent(direction: Direction, children: Vec<LayoutBox>) -> Self {
        Self {
            direction,
            sizing: Sizing::None,
            spacing: 0,
            content: BoxContent::Children(children),
        }
    }

    /// Parent whose children depend on the space it ends up with
    pub fn conditional<F>(direction: Direction, children: F) -> Self
    where
        F: Fn(i32, i32) -> Vec<LayoutBox> + Send + Sync + 'static,
    {
        Self {
            direction,
            sizing: Sizing::None,
            spacing: 0,
            content: BoxContent::Conditional(Arc::new(children)),
        }
    }

    /// Claim a fixed number of cells along the parent's axis
    ///
    /// # Panics
    /// If the box already has a weight.
    pub fn size(mut self, cells: u16) -> Self {
        if let Sizing::Weight(w) = self.sizing {
            panic!("layout box already has weight {w}; size and weight are exclusive");
        }
        self.sizing = Sizing::Size(cells);
        self
    }

    /// Claim a proportional share of the parent's remaining space
    ///
    /// # Panics
    /// If the box already has a fixed size.
    pub fn weight(mut self, weight: u16) -> Self {
        if let Sizing::Size(s) = self.sizing {
            panic!("layout box already has size {s}; size and weight are exclusive");
        }
        self.sizing = Sizing::Weight(weight);
        self
    }

    /// Reserve `cells` between adjacent children
    pub fn spacing(mut self, cells: u16) -> Self {
        self.spacing = cells;
        self
    }

    /// Append a static child
    ///
    /// # Panics
    /// If the box is a window leaf or has conditional children.
    pub fn child(mut self, child: LayoutBox) -> Self {
        match &mut self.content {
            BoxContent::Children(children) => children.push(child),
            BoxContent::Window(name) => {
                panic!("layout box for window {name:?} cannot also have children")
            }
            BoxContent::Conditional(_) => {
                panic!("layout box with conditional children cannot take static children")
            }
        }
        self
    }

    /// Window name when this box is a leaf
    pub fn window_name(&self) -> Option<&str> {
        match &self.content {
            BoxContent::Window(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.content, BoxContent::Window(_))
    }
}
