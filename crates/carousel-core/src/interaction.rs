//! Direct manipulation: pointer drags that move or resize text boxes and the image box.
//!
//! A drag captures the target's geometry when it starts. Every move event recomputes the
//! geometry from that snapshot plus the total pointer delta, so rounding never accumulates
//! across events.

use crate::model::{LayerId, MIN_IMAGE_BOX, POSITION_RANGE, Slide, WIDTH_RANGE};
use kurbo::{Point, Size, Vec2};

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A text layer's body.
    TextLayer(LayerId),
    /// The width handle on a selected text layer's right edge.
    TextWidthHandle(LayerId),
    /// The image box.
    ImageBox,
    /// The resize handle in the image box's bottom-right corner.
    ImageResizeHandle,
    /// Empty canvas.
    Background,
}

/// Kind of drag operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    MoveText,
    ResizeTextWidth,
    MoveImageBox,
    ResizeImageBox,
}

impl DragKind {
    /// The drag started by pressing on `target`, if any.
    pub fn for_target(target: &HitTarget) -> Option<(DragKind, Option<&str>)> {
        match target {
            HitTarget::TextLayer(id) => Some((DragKind::MoveText, Some(id.as_str()))),
            HitTarget::TextWidthHandle(id) => Some((DragKind::ResizeTextWidth, Some(id.as_str()))),
            HitTarget::ImageBox => Some((DragKind::MoveImageBox, None)),
            HitTarget::ImageResizeHandle => Some((DragKind::ResizeImageBox, None)),
            HitTarget::Background => None,
        }
    }
}

/// Geometry captured when a drag starts.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSnapshot {
    /// Text layer top-left, percent.
    TextPosition { layer_id: LayerId, position: Point },
    /// Text layer width, percent.
    TextWidth { layer_id: LayerId, width: f64 },
    /// Image box top-left, percent.
    ImageBoxOrigin(Point),
    /// Image box size, percent.
    ImageBoxSize(Size),
}

impl DragSnapshot {
    pub fn kind(&self) -> DragKind {
        match self {
            DragSnapshot::TextPosition { .. } => DragKind::MoveText,
            DragSnapshot::TextWidth { .. } => DragKind::ResizeTextWidth,
            DragSnapshot::ImageBoxOrigin(_) => DragKind::MoveImageBox,
            DragSnapshot::ImageBoxSize(_) => DragKind::ResizeImageBox,
        }
    }
}

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    /// Geometry before the drag.
    pub snapshot: DragSnapshot,
    /// Pointer position at drag start, screen pixels.
    pub pointer_origin: Point,
}

impl Interaction {
    /// Pointer delta in percent of the rendered canvas.
    ///
    /// Returns `None` when the canvas has no measurable size yet.
    pub fn percent_delta(&self, pointer: Point, canvas: Size) -> Option<Vec2> {
        let measurable = canvas.width.is_finite()
            && canvas.height.is_finite()
            && canvas.width > 0.0
            && canvas.height > 0.0;
        if !measurable {
            return None;
        }
        let delta = pointer - self.pointer_origin;
        Some(Vec2::new(
            delta.x * (100.0 / canvas.width),
            delta.y * (100.0 / canvas.height),
        ))
    }
}

/// Replacement geometry produced by a move event.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryUpdate {
    TextPosition { layer_id: LayerId, x: f64, y: f64 },
    TextWidth { layer_id: LayerId, w: f64 },
    ImageBoxOrigin { x: f64, y: f64 },
    ImageBoxSize { w: f64, h: f64 },
}

fn clamp_range(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
}

/// Idle/dragging state machine for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    active: Option<Interaction>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The in-progress drag, if any.
    pub fn active(&self) -> Option<&Interaction> {
        self.active.as_ref()
    }

    /// Start a drag. Returns `false` (and stays as it was) if a drag is already active or the
    /// target layer does not exist on `slide`.
    pub fn begin(&mut self, kind: DragKind, target: Option<&str>, pointer: Point, slide: &Slide) -> bool {
        if self.active.is_some() {
            log::debug!("Ignoring {:?} drag start: a drag is already active", kind);
            return false;
        }

        let layer = target.and_then(|id| slide.layer(id));
        let snapshot = match (kind, layer) {
            (DragKind::MoveText, Some(layer)) => DragSnapshot::TextPosition {
                layer_id: layer.id.clone(),
                position: Point::new(layer.x, layer.y),
            },
            (DragKind::ResizeTextWidth, Some(layer)) => DragSnapshot::TextWidth {
                layer_id: layer.id.clone(),
                width: layer.w,
            },
            (DragKind::MoveImageBox, _) => DragSnapshot::ImageBoxOrigin(slide.image_box_origin()),
            (DragKind::ResizeImageBox, _) => DragSnapshot::ImageBoxSize(slide.image_box_size()),
            (DragKind::MoveText | DragKind::ResizeTextWidth, None) => {
                log::debug!("Ignoring {:?} drag start: layer {:?} not found", kind, target);
                return false;
            }
        };

        log::debug!("Drag started: {:?} at ({:.1}, {:.1})", kind, pointer.x, pointer.y);
        self.active = Some(Interaction {
            snapshot,
            pointer_origin: pointer,
        });
        true
    }

    /// Compute the target's geometry for the current pointer position.
    ///
    /// `canvas` is the rendered canvas size in screen pixels; when it is unknown or degenerate
    /// the move is skipped.
    pub fn update(&self, pointer: Point, canvas: Option<Size>) -> Option<GeometryUpdate> {
        let interaction = self.active.as_ref()?;
        let d = interaction.percent_delta(pointer, canvas?)?;

        let update = match &interaction.snapshot {
            DragSnapshot::TextPosition { layer_id, position } => GeometryUpdate::TextPosition {
                layer_id: layer_id.clone(),
                x: clamp_range(position.x + d.x, POSITION_RANGE),
                y: clamp_range(position.y + d.y, POSITION_RANGE),
            },
            DragSnapshot::TextWidth { layer_id, width } => GeometryUpdate::TextWidth {
                layer_id: layer_id.clone(),
                w: clamp_range(width + d.x, WIDTH_RANGE),
            },
            DragSnapshot::ImageBoxOrigin(origin) => GeometryUpdate::ImageBoxOrigin {
                x: clamp_range(origin.x + d.x, POSITION_RANGE),
                y: clamp_range(origin.y + d.y, POSITION_RANGE),
            },
            DragSnapshot::ImageBoxSize(size) => GeometryUpdate::ImageBoxSize {
                w: (size.width + d.x).max(MIN_IMAGE_BOX),
                h: (size.height + d.y).max(MIN_IMAGE_BOX),
            },
        };
        Some(update)
    }

    /// End the drag, wherever the pointer was released.
    pub fn end(&mut self) -> Option<Interaction> {
        let ended = self.active.take();
        if let Some(interaction) = &ended {
            log::debug!("Drag ended: {:?}", interaction.snapshot.kind());
        }
        ended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Option<Size> {
        Some(Size::new(400.0, 500.0))
    }

    fn start_text_drag(ctrl: &mut InteractionController, slide: &Slide) -> LayerId {
        let id = slide.text_layers[0].id.clone();
        assert!(ctrl.begin(DragKind::MoveText, Some(&id), Point::new(100.0, 100.0), slide));
        id
    }

    #[test]
    fn test_move_converts_pixels_to_percent() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        let id = start_text_drag(&mut ctrl, &slide);

        let update = ctrl.update(Point::new(140.0, 150.0), canvas()).unwrap();
        assert_eq!(update, GeometryUpdate::TextPosition { layer_id: id, x: 20.0, y: 20.0 });
    }

    #[test]
    fn test_updates_are_relative_to_snapshot() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        start_text_drag(&mut ctrl, &slide);

        // Many intermediate events do not compound.
        for step in 1..50 {
            ctrl.update(Point::new(100.0 + step as f64, 100.0), canvas());
        }
        match ctrl.update(Point::new(140.0, 100.0), canvas()).unwrap() {
            GeometryUpdate::TextPosition { x, y, .. } => {
                assert!((x - 20.0).abs() < 1e-9);
                assert!((y - 10.0).abs() < 1e-9);
            }
            other => panic!("unexpected update {:?}", other),
        }
    }

    #[test]
    fn test_text_position_clamps_every_event() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        start_text_drag(&mut ctrl, &slide);

        for (px, py) in [(-5000.0, -5000.0), (9000.0, 9000.0), (-20.0, 3000.0), (120.0, 90.0)] {
            match ctrl.update(Point::new(px, py), canvas()).unwrap() {
                GeometryUpdate::TextPosition { x, y, .. } => {
                    assert!((0.0..=100.0).contains(&x));
                    assert!((0.0..=100.0).contains(&y));
                }
                other => panic!("unexpected update {:?}", other),
            }
        }
    }

    #[test]
    fn test_text_width_clamps() {
        let slide = Slide::new();
        let id = slide.text_layers[1].id.clone();
        let mut ctrl = InteractionController::new();
        assert!(ctrl.begin(DragKind::ResizeTextWidth, Some(&id), Point::ZERO, &slide));

        for px in [-10_000.0, -100.0, 0.0, 37.0, 10_000.0] {
            match ctrl.update(Point::new(px, 0.0), canvas()).unwrap() {
                GeometryUpdate::TextWidth { w, .. } => assert!((10.0..=100.0).contains(&w)),
                other => panic!("unexpected update {:?}", other),
            }
        }
    }

    #[test]
    fn test_image_box_size_floor() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        assert!(ctrl.begin(DragKind::ResizeImageBox, None, Point::new(200.0, 200.0), &slide));

        for (px, py) in [(0.0, 0.0), (-900.0, -900.0), (210.0, 150.0)] {
            match ctrl.update(Point::new(px, py), canvas()).unwrap() {
                GeometryUpdate::ImageBoxSize { w, h } => {
                    assert!(w >= 10.0);
                    assert!(h >= 10.0);
                }
                other => panic!("unexpected update {:?}", other),
            }
        }
    }

    #[test]
    fn test_image_box_move() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        assert!(ctrl.begin(DragKind::MoveImageBox, None, Point::ZERO, &slide));
        let update = ctrl.update(Point::new(40.0, 100.0), canvas()).unwrap();
        assert_eq!(update, GeometryUpdate::ImageBoxOrigin { x: 10.0, y: 20.0 });
    }

    #[test]
    fn test_unmeasured_canvas_is_noop() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        start_text_drag(&mut ctrl, &slide);
        assert!(ctrl.update(Point::new(150.0, 150.0), None).is_none());
        assert!(ctrl.update(Point::new(150.0, 150.0), Some(Size::ZERO)).is_none());
        assert!(ctrl.is_dragging());
    }

    #[test]
    fn test_single_drag_at_a_time() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        start_text_drag(&mut ctrl, &slide);
        assert!(!ctrl.begin(DragKind::MoveImageBox, None, Point::ZERO, &slide));
        assert_eq!(ctrl.active().unwrap().snapshot.kind(), DragKind::MoveText);
    }

    #[test]
    fn test_end_returns_to_idle() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        start_text_drag(&mut ctrl, &slide);
        assert!(ctrl.end().is_some());
        assert!(!ctrl.is_dragging());
        assert!(ctrl.update(Point::new(1.0, 1.0), canvas()).is_none());
        assert!(ctrl.end().is_none());
    }

    #[test]
    fn test_missing_layer_does_not_start() {
        let slide = Slide::new();
        let mut ctrl = InteractionController::new();
        assert!(!ctrl.begin(DragKind::MoveText, Some("nope"), Point::ZERO, &slide));
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn test_drag_kind_for_target() {
        assert_eq!(DragKind::for_target(&HitTarget::Background), None);
        assert_eq!(
            DragKind::for_target(&HitTarget::ImageResizeHandle),
            Some((DragKind::ResizeImageBox, None))
        );
        let target = HitTarget::TextWidthHandle("a".into());
        assert_eq!(
            DragKind::for_target(&target),
            Some((DragKind::ResizeTextWidth, Some("a")))
        );
    }
}
