//! Drawing surface abstraction.

use inkboard_core::paint::{Compositing, PaintOp};
use kurbo::{Point, Rect};
use peniko::{Color, Compose};

/// A 2D drawing surface that accepts primitive paint commands.
///
/// Implementations wrap whatever the host platform draws with (an HTML
/// canvas, a Vello scene, a recorder for tests). The surface is expected to
/// be cleared by its owner before each full replay.
pub trait Surface {
    /// Push the current style state.
    fn save(&mut self);

    /// Pop the most recently saved style state.
    fn restore(&mut self);

    fn set_line_width(&mut self, width: f64);

    fn set_stroke_color(&mut self, color: Color);

    fn set_fill_color(&mut self, color: Color);

    fn set_compose(&mut self, compose: Compose);

    fn begin_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Circular arc, continuing the current subpath.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64);

    /// Closed rectangular subpath. The rect may be unnormalized.
    fn rect(&mut self, rect: Rect);

    fn close_path(&mut self);

    fn fill(&mut self);

    fn stroke(&mut self);
}

/// Map a core compositing mode onto peniko's Porter-Duff operator.
pub fn compose_for(compositing: Compositing) -> Compose {
    match compositing {
        Compositing::SourceOver => Compose::SrcOver,
        Compositing::DestinationOut => Compose::DestOut,
    }
}

/// Replay paint operations onto a surface, in order.
pub fn replay<S: Surface + ?Sized>(ops: &[PaintOp], surface: &mut S) {
    log::trace!("replaying {} paint ops", ops.len());
    for op in ops {
        match *op {
            PaintOp::Save => surface.save(),
            PaintOp::Restore => surface.restore(),
            PaintOp::SetLineWidth(width) => surface.set_line_width(width),
            PaintOp::SetStrokeColor(color) => surface.set_stroke_color(color.into()),
            PaintOp::SetFillColor(color) => surface.set_fill_color(color.into()),
            PaintOp::SetCompositing(compositing) => surface.set_compose(compose_for(compositing)),
            PaintOp::BeginPath => surface.begin_path(),
            PaintOp::MoveTo(point) => surface.move_to(point),
            PaintOp::LineTo(point) => surface.line_to(point),
            PaintOp::Arc {
                center,
                radius,
                start_angle,
                end_angle,
            } => surface.arc(center, radius, start_angle, end_angle),
            PaintOp::Rect { origin, size } => surface.rect(Rect::new(
                origin.x,
                origin.y,
                origin.x + size.x,
                origin.y + size.y,
            )),
            PaintOp::ClosePath => surface.close_path(),
            PaintOp::Fill => surface.fill(),
            PaintOp::Stroke => surface.stroke(),
        }
    }
}
