//! A surface that records filled and stroked kurbo paths.

use crate::renderer::{Surface, replay};
use inkboard_core::Canvas;
use kurbo::{Arc, BezPath, Point, Rect, Vec2};
use peniko::{Color, Compose};

/// Arc flattening tolerance, in surface units.
const ARC_TOLERANCE: f64 = 0.1;

/// How a recorded path is painted.
#[derive(Debug, Clone)]
pub enum SceneBrush {
    Fill(Color),
    Stroke { color: Color, width: f64 },
}

/// One fill or stroke call with the path it applied to.
#[derive(Debug, Clone)]
pub struct SceneItem {
    pub path: BezPath,
    pub brush: SceneBrush,
    pub compose: Compose,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    line_width: f64,
    stroke: Color,
    fill: Color,
    compose: Compose,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            stroke: Color::from_rgba8(0, 0, 0, 255),
            fill: Color::from_rgba8(0, 0, 0, 255),
            compose: Compose::SrcOver,
        }
    }
}

/// Records paint calls as a list of [`SceneItem`]s.
///
/// Follows 2D canvas path semantics: `line_to` or `arc` with no current
/// point starts a new subpath, and `save`/`restore` cover style state only,
/// never the path.
#[derive(Debug, Clone, Default)]
pub struct SceneRecorder {
    state: DrawState,
    stack: Vec<DrawState>,
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
    items: Vec<SceneItem>,
}

impl SceneRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full repaint of a canvas.
    pub fn record_canvas(canvas: &Canvas) -> Vec<SceneItem> {
        let mut recorder = Self::new();
        replay(&canvas.paint_operations(), &mut recorder);
        recorder.into_items()
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<SceneItem> {
        self.items
    }

    /// Forget everything recorded so far and reset the style state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn connect(&mut self, point: Point) {
        if self.current.is_some() {
            self.path.line_to(point);
        } else {
            self.path.move_to(point);
            self.subpath_start = Some(point);
        }
        self.current = Some(point);
    }
}

impl Surface for SceneRecorder {
    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::warn!("restore without a matching save"),
        }
    }

    fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_compose(&mut self, compose: Compose) {
        self.state.compose = compose;
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
        self.current = Some(point);
        self.subpath_start = Some(point);
    }

    fn line_to(&mut self, point: Point) {
        self.connect(point);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        let arc = Arc::new(
            center,
            Vec2::new(radius, radius),
            start_angle,
            end_angle - start_angle,
            0.0,
        );
        self.connect(center + Vec2::from_angle(start_angle) * radius);
        self.path.extend(arc.append_iter(ARC_TOLERANCE));
        self.current = Some(center + Vec2::from_angle(end_angle) * radius);
    }

    fn rect(&mut self, rect: Rect) {
        let origin = Point::new(rect.x0, rect.y0);
        self.move_to(origin);
        self.path.line_to((rect.x1, rect.y0));
        self.path.line_to((rect.x1, rect.y1));
        self.path.line_to((rect.x0, rect.y1));
        self.path.close_path();
        self.current = Some(origin);
    }

    fn close_path(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.path.close_path();
        self.current = self.subpath_start;
    }

    fn fill(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.items.push(SceneItem {
            path: self.path.clone(),
            brush: SceneBrush::Fill(self.state.fill),
            compose: self.state.compose,
        });
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        self.items.push(SceneItem {
            path: self.path.clone(),
            brush: SceneBrush::Stroke {
                color: self.state.stroke,
                width: self.state.line_width,
            },
            compose: self.state.compose,
        });
    }
}
