//! Input model: tools, mouse buttons, and the gesture state machine.
//!
//! `Tool` is the user's drawing intent at the time of a pointer-down.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. A `Draft` carries everything needed to preview the shape while
//! the pointer moves and to build the committed [`Shape`] on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use frames::Shape;

use crate::camera::Point;

/// Which drawing tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Axis-aligned rectangle dragged from an anchor corner (default).
    #[default]
    Rect,
    /// Circle sized from the drag's bounding box.
    Circle,
    /// Freehand polyline.
    Pencil,
}

impl Tool {
    /// Parse the host's tool name (`"rect"`, `"circle"`, `"pencil"`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rect" => Some(Self::Rect),
            "circle" => Some(Self::Circle),
            "pencil" => Some(Self::Pencil),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Pencil => "pencil",
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value. Unknown buttons are ignored.
    #[must_use]
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// An in-progress shape, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Rect { anchor: Point, current: Point },
    Circle { anchor: Point, current: Point },
    /// Every world point visited since pointer-down, in order.
    Pencil { points: Vec<Point> },
}

impl Draft {
    /// Start a draft for `tool` at the world-space pointer-down position.
    #[must_use]
    pub fn begin(tool: Tool, world: Point) -> Self {
        match tool {
            Tool::Rect => Self::Rect { anchor: world, current: world },
            Tool::Circle => Self::Circle { anchor: world, current: world },
            Tool::Pencil => Self::Pencil { points: vec![world] },
        }
    }

    /// Track a pointer move. Pencil drafts record the point.
    pub fn update(&mut self, world: Point) {
        match self {
            Self::Rect { current, .. } | Self::Circle { current, .. } => *current = world,
            Self::Pencil { points } => points.push(world),
        }
    }

    /// The shape this draft would commit to right now.
    #[must_use]
    pub fn shape(&self) -> Shape {
        match self {
            Self::Rect { anchor, current } => rect_between(*anchor, *current),
            Self::Circle { anchor, current } => circle_between(*anchor, *current),
            Self::Pencil { points } => Shape::Pencil { points: points.clone() },
        }
    }

    /// Build the committed shape for a pointer-up at `world`.
    ///
    /// Rect and circle use the release point. A pencil stroke is exactly the
    /// points gathered through pointer-down and moves; the release point is
    /// not appended.
    #[must_use]
    pub fn finish(self, world: Point) -> Shape {
        match self {
            Self::Rect { anchor, .. } => rect_between(anchor, world),
            Self::Circle { anchor, .. } => circle_between(anchor, world),
            Self::Pencil { points } => Shape::Pencil { points },
        }
    }
}

/// Width and height may be negative; the rect is not normalized.
fn rect_between(anchor: Point, p: Point) -> Shape {
    Shape::Rect { x: anchor.x, y: anchor.y, width: p.x - anchor.x, height: p.y - anchor.y }
}

/// One radius drives both axes: `r = max(w, h) / 2`, centered `r` past the anchor.
fn circle_between(anchor: Point, p: Point) -> Shape {
    let radius = (p.x - anchor.x).max(p.y - anchor.y) / 2.0;
    Shape::Circle { center_x: anchor.x + radius, center_y: anchor.y + radius, radius }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas with the middle or secondary button.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// The user is dragging out a new shape with the primary button.
    Drawing(Draft),
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The draft being drawn, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Drawing(draft) => Some(draft),
            _ => None,
        }
    }
}
