//! Drag controller state machine.
//!
//! One gesture at a time moves through `Idle -> Pending -> Dragging -> Idle`.
//! Mouse gestures start dragging once the pointer has travelled
//! [`DragConfig::threshold_px`] from the press position. Touch gestures also
//! start dragging when the long-press timer fires first.
//!
//! While dragging, each move converts the pixel delta since the previous
//! move into centimeters, adds it to the entity's offsets, clamps each axis
//! and emits the new absolute offsets. The reference point is then reset, so
//! updates are relative to the immediately preceding pointer position.
//!
//! The controller performs no I/O. Everything it wants to happen is returned
//! as a list of [`DragEffect`]s that the host applies in order.
//!
//! Only one pointer is tracked. A second pointer-down during an active
//! gesture is ignored; multi-touch is not supported.

use std::fmt;
use std::time::Duration;

use heightcomp_core::{Entity, EntityEvent, EntityId, OffsetUpdate};
use heightcomp_layout::Scene;
use serde::{Deserialize, Serialize};

use crate::long_press::{LongPressTimer, LongPressToken};
use crate::pointer::{PointerId, PointerKind, PointerPosition, PointerSample};

/// Distance a pointer must travel before a press becomes a drag
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 20.0;
/// Touch hold time that activates dragging without movement
pub const DEFAULT_LONG_PRESS_MS: u64 = 100;
/// Offsets are clamped to this many viewport spans
pub const DEFAULT_CLAMP_FACTOR: f64 = 1.5;

/// Tunables of the drag controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    pub threshold_px: f64,
    pub long_press: Duration,
    pub clamp_factor: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            long_press: Duration::from_millis(DEFAULT_LONG_PRESS_MS),
            clamp_factor: DEFAULT_CLAMP_FACTOR,
        }
    }
}

/// Scale information needed to turn pixel deltas into centimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragContext {
    pub pixels_per_cm: f64,
    pub horizontal_scale_factor: f64,
    pub viewport_width_px: f64,
    pub viewport_height_px: f64,
}

impl DragContext {
    /// Context of the scene currently on screen
    pub fn from_scene(scene: &Scene) -> Self {
        Self {
            pixels_per_cm: scene.pixels_per_cm(),
            horizontal_scale_factor: scene.horizontal_scale_factor(),
            viewport_width_px: scene.viewport.available_width_px,
            viewport_height_px: scene.viewport.container_height_px,
        }
    }

    /// Whether pixel deltas can be converted at all
    pub fn can_drag(&self) -> bool {
        self.pixels_per_cm.is_finite()
            && self.pixels_per_cm > 0.0
            && self.horizontal_scale_factor.is_finite()
            && self.horizontal_scale_factor > 0.0
    }

    /// Physical delta for a pixel delta (screen y grows downwards)
    pub fn delta_cm(&self, dx_px: f64, dy_px: f64) -> Option<(f64, f64)> {
        if !self.can_drag() {
            return None;
        }
        Some((
            dx_px / (self.pixels_per_cm * self.horizontal_scale_factor),
            -dy_px / self.pixels_per_cm,
        ))
    }

    /// Largest allowed absolute offset per axis
    pub fn offset_limits_cm(&self, clamp_factor: f64) -> (f64, f64) {
        if !self.can_drag() {
            return (0.0, 0.0);
        }
        (
            (self.viewport_width_px * clamp_factor / self.pixels_per_cm).max(0.0),
            (self.viewport_height_px * clamp_factor / self.pixels_per_cm).max(0.0),
        )
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pressed, waiting for threshold or long press
    Pending,
    Dragging,
}

impl fmt::Display for DragPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pending => write!(f, "pending"),
            Self::Dragging => write!(f, "dragging"),
        }
    }
}

/// Entity under the pointer at press time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTarget<Id> {
    pub id: Id,
    pub horizontal_offset_cm: f64,
    pub vertical_offset_cm: f64,
}

impl<Id> DragTarget<Id> {
    pub fn new(id: Id, horizontal_offset_cm: f64, vertical_offset_cm: f64) -> Self {
        Self {
            id,
            horizontal_offset_cm,
            vertical_offset_cm,
        }
    }
}

impl From<&Entity> for DragTarget<EntityId> {
    fn from(entity: &Entity) -> Self {
        Self::new(
            entity.id,
            entity.horizontal_offset_cm,
            entity.vertical_offset_cm,
        )
    }
}

/// Request for the entity store or its UI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityRequest<Id> {
    /// New absolute offsets after a drag move
    OffsetsChanged { id: Id, update: OffsetUpdate },
    /// Mouse click without drag
    EditRequested { id: Id },
    /// Touch tap without drag
    TapOptionsRequested { id: Id },
}

impl<Id: Copy> EntityRequest<Id> {
    pub fn id(&self) -> Id {
        match self {
            Self::OffsetsChanged { id, .. }
            | Self::EditRequested { id }
            | Self::TapOptionsRequested { id } => *id,
        }
    }
}

impl From<EntityRequest<EntityId>> for EntityEvent {
    fn from(request: EntityRequest<EntityId>) -> Self {
        match request {
            EntityRequest::OffsetsChanged { id, update } => {
                EntityEvent::OffsetsChanged { id, update }
            }
            EntityRequest::EditRequested { id } => EntityEvent::EditRequested { id },
            EntityRequest::TapOptionsRequested { id } => EntityEvent::TapOptionsRequested { id },
        }
    }
}

/// Side effect requested by the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect<Id> {
    Entity(EntityRequest<Id>),
    /// Call [`DragController::long_press_elapsed`] with `token` after `delay`
    ScheduleLongPress {
        token: LongPressToken,
        delay: Duration,
    },
    /// The scheduled callback for `token` is no longer wanted
    CancelLongPress { token: LongPressToken },
    /// Dismiss any options overlay shown for the target
    HideOptions,
}

impl<Id> DragEffect<Id> {
    /// Entity request carried by this effect, if any
    pub fn entity_request(&self) -> Option<&EntityRequest<Id>> {
        match self {
            Self::Entity(request) => Some(request),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Gesture<Id> {
    pointer: PointerId,
    kind: PointerKind,
    target: Id,
    origin: PointerPosition,
    reference: PointerPosition,
    horizontal_offset_cm: f64,
    vertical_offset_cm: f64,
    phase: DragPhase,
    threshold_crossed: bool,
    moved: bool,
}

impl<Id: Copy> Gesture<Id> {
    fn is_click(&self) -> bool {
        !self.threshold_crossed && !self.moved
    }

    /// Apply the movement since the reference point, returning the new
    /// offsets when they changed
    fn drag_to(
        &mut self,
        position: PointerPosition,
        ctx: &DragContext,
        clamp_factor: f64,
    ) -> Option<EntityRequest<Id>> {
        let (dx, dy) = position.delta_from(self.reference);
        self.reference = position;

        let (dx_cm, dy_cm) = ctx.delta_cm(dx, dy)?;
        let (limit_x, limit_y) = ctx.offset_limits_cm(clamp_factor);
        let horizontal = (self.horizontal_offset_cm + dx_cm).clamp(-limit_x, limit_x);
        let vertical = (self.vertical_offset_cm + dy_cm).clamp(-limit_y, limit_y);

        if horizontal == self.horizontal_offset_cm && vertical == self.vertical_offset_cm {
            return None;
        }

        self.horizontal_offset_cm = horizontal;
        self.vertical_offset_cm = vertical;
        self.moved = true;
        Some(EntityRequest::OffsetsChanged {
            id: self.target,
            update: OffsetUpdate::both(horizontal, vertical),
        })
    }
}

/// Gesture state machine shared by mouse and touch input
#[derive(Debug, Clone)]
pub struct DragController<Id> {
    config: DragConfig,
    timer: LongPressTimer,
    gesture: Option<Gesture<Id>>,
}

impl<Id: Copy + fmt::Display> Default for DragController<Id> {
    fn default() -> Self {
        Self::new(DragConfig::default())
    }
}

impl<Id: Copy + fmt::Display> DragController<Id> {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            timer: LongPressTimer::new(),
            gesture: None,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Replace the tunables; an active gesture keeps running with them
    pub fn set_config(&mut self, config: DragConfig) {
        self.config = config;
    }

    pub fn phase(&self) -> DragPhase {
        self.gesture.as_ref().map_or(DragPhase::Idle, |g| g.phase)
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Entity of the active gesture
    pub fn target(&self) -> Option<Id> {
        self.gesture.as_ref().map(|g| g.target)
    }

    /// Pointer pressed on an entity.
    pub fn pointer_down(
        &mut self,
        sample: PointerSample,
        target: DragTarget<Id>,
    ) -> Vec<DragEffect<Id>> {
        if let Some(active) = &self.gesture {
            tracing::debug!(
                "drag: ignoring {} pointer {:?}, gesture on {} still active",
                sample.kind,
                sample.id,
                active.target
            );
            return Vec::new();
        }

        let mut effects = Vec::new();
        if sample.kind == PointerKind::Touch {
            let token = self.timer.arm();
            effects.push(DragEffect::ScheduleLongPress {
                token,
                delay: self.config.long_press,
            });
        }

        tracing::debug!(
            "drag: idle -> pending on {} ({} at {:.1},{:.1})",
            target.id,
            sample.kind,
            sample.position.x,
            sample.position.y
        );

        self.gesture = Some(Gesture {
            pointer: sample.id,
            kind: sample.kind,
            target: target.id,
            origin: sample.position,
            reference: sample.position,
            horizontal_offset_cm: target.horizontal_offset_cm,
            vertical_offset_cm: target.vertical_offset_cm,
            phase: DragPhase::Pending,
            threshold_crossed: false,
            moved: false,
        });
        effects
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, sample: PointerSample, ctx: &DragContext) -> Vec<DragEffect<Id>> {
        let mut effects = Vec::new();
        let Some(gesture) = self.gesture.as_mut() else {
            return effects;
        };
        if gesture.pointer != sample.id {
            return effects;
        }

        if gesture.phase == DragPhase::Pending {
            if sample.position.distance_to(gesture.origin) < self.config.threshold_px {
                return effects;
            }
            gesture.threshold_crossed = true;
            gesture.phase = DragPhase::Dragging;
            if let Some(token) = self.timer.disarm() {
                effects.push(DragEffect::CancelLongPress { token });
            }
            effects.push(DragEffect::HideOptions);
            tracing::debug!("drag: pending -> dragging on {} (threshold)", gesture.target);
        }

        match gesture.drag_to(sample.position, ctx, self.config.clamp_factor) {
            Some(request) => {
                tracing::trace!("drag: {:?}", request_offsets(&request));
                effects.push(DragEffect::Entity(request));
            }
            None if !ctx.can_drag() => {
                tracing::debug!("drag: no scale available, movement ignored");
            }
            None => {}
        }
        effects
    }

    /// Pointer released.
    ///
    /// The release position is processed like a final move first. A gesture
    /// that never became a drag is a click: mouse asks for the editor, touch
    /// for the tap options.
    pub fn pointer_up(&mut self, sample: PointerSample, ctx: &DragContext) -> Vec<DragEffect<Id>> {
        if !self.owns(sample.id) {
            return Vec::new();
        }
        let mut effects = self.pointer_move(sample, ctx);

        let Some(gesture) = self.gesture.take() else {
            return effects;
        };
        if let Some(token) = self.timer.disarm() {
            effects.push(DragEffect::CancelLongPress { token });
        }

        if gesture.is_click() {
            let request = match gesture.kind {
                PointerKind::Mouse => EntityRequest::EditRequested { id: gesture.target },
                PointerKind::Touch => EntityRequest::TapOptionsRequested { id: gesture.target },
            };
            tracing::debug!("drag: {} -> idle, click on {}", gesture.phase, gesture.target);
            effects.push(DragEffect::Entity(request));
        } else {
            tracing::debug!("drag: {} -> idle on {}", gesture.phase, gesture.target);
        }
        effects
    }

    /// Gesture aborted by the platform; nothing is reported for the entity.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Vec<DragEffect<Id>> {
        if !self.owns(pointer) {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(token) = self.timer.disarm() {
            effects.push(DragEffect::CancelLongPress { token });
        }
        if let Some(gesture) = self.gesture.take() {
            tracing::debug!("drag: {} -> idle on {} (cancelled)", gesture.phase, gesture.target);
        }
        effects
    }

    /// Host callback for a scheduled long press.
    pub fn long_press_elapsed(&mut self, token: LongPressToken) -> Vec<DragEffect<Id>> {
        if !self.timer.fire(token) {
            tracing::debug!("drag: stale {} ignored", token);
            return Vec::new();
        }
        match self.gesture.as_mut() {
            Some(gesture) if gesture.phase == DragPhase::Pending => {
                gesture.phase = DragPhase::Dragging;
                tracing::debug!("drag: pending -> dragging on {} (long press)", gesture.target);
                vec![DragEffect::HideOptions]
            }
            _ => Vec::new(),
        }
    }

    fn owns(&self, pointer: PointerId) -> bool {
        self.gesture.as_ref().is_some_and(|g| g.pointer == pointer)
    }
}

fn request_offsets<Id>(request: &EntityRequest<Id>) -> Option<(Option<f64>, Option<f64>)> {
    match request {
        EntityRequest::OffsetsChanged { update, .. } => {
            Some((update.horizontal_offset_cm, update.vertical_offset_cm))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DragContext {
        DragContext {
            pixels_per_cm: 2.0,
            horizontal_scale_factor: 0.5,
            viewport_width_px: 400.0,
            viewport_height_px: 800.0,
        }
    }

    fn offsets(effects: &[DragEffect<u32>]) -> Vec<OffsetUpdate> {
        effects
            .iter()
            .filter_map(|e| match e.entity_request() {
                Some(EntityRequest::OffsetsChanged { update, .. }) => Some(*update),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_mouse_click_requests_edit() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::mouse(100.0, 100.0);
        assert!(drag.pointer_down(down, DragTarget::new(1, 0.0, 0.0)).is_empty());
        assert_eq!(drag.phase(), DragPhase::Pending);

        assert!(drag.pointer_move(down.at(110.0, 105.0), &ctx()).is_empty());
        let effects = drag.pointer_up(down.at(110.0, 105.0), &ctx());
        assert_eq!(
            effects,
            vec![DragEffect::Entity(EntityRequest::EditRequested { id: 1 })]
        );
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_threshold_starts_drag() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::mouse(100.0, 100.0);
        drag.pointer_down(down, DragTarget::new(1, 0.0, 0.0));

        // Exactly 20px away crosses the threshold
        let effects = drag.pointer_move(down.at(120.0, 100.0), &ctx());
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert!(effects.contains(&DragEffect::HideOptions));
        // x: 20 / (2 * 0.5) = 20 cm
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(20.0, 0.0)]);

        let effects = drag.pointer_up(down.at(120.0, 100.0), &ctx());
        assert!(effects.is_empty());
        assert!(!drag.is_active());
    }

    #[test]
    fn test_moves_are_incremental() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::mouse(0.0, 0.0);
        drag.pointer_down(down, DragTarget::new(1, 5.0, 5.0));
        // Moving down 40px lowers the entity by 20cm
        let effects = drag.pointer_move(down.at(0.0, 40.0), &ctx());
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(5.0, -15.0)]);

        let effects = drag.pointer_move(down.at(0.0, 20.0), &ctx());
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(5.0, -5.0)]);
        let effects = drag.pointer_move(down.at(2.0, 20.0), &ctx());
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(7.0, -5.0)]);
    }

    #[test]
    fn test_offsets_are_clamped_per_axis() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::mouse(0.0, 0.0);
        drag.pointer_down(down, DragTarget::new(1, 0.0, 0.0));

        let effects = drag.pointer_move(down.at(10_000.0, -10_000.0), &ctx());
        // Limits: 400*1.5/2 = 300cm, 800*1.5/2 = 600cm
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(300.0, 600.0)]);

        // Further pushes against both limits change nothing
        let effects = drag.pointer_move(down.at(20_000.0, -20_000.0), &ctx());
        assert!(offsets(&effects).is_empty());
    }

    #[test]
    fn test_zero_scale_ignores_movement() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::mouse(0.0, 0.0);
        drag.pointer_down(down, DragTarget::new(1, 0.0, 0.0));

        let degenerate = DragContext::default();
        let effects = drag.pointer_move(down.at(50.0, 50.0), &degenerate);
        assert!(offsets(&effects).is_empty());
        assert_eq!(drag.phase(), DragPhase::Dragging);

        // Not a click either
        assert!(drag.pointer_up(down.at(50.0, 50.0), &degenerate).is_empty());
    }

    #[test]
    fn test_touch_schedules_and_cancels_long_press() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::touch(3, 0.0, 0.0);
        let effects = drag.pointer_down(down, DragTarget::new(9, 0.0, 0.0));
        let token = match effects.as_slice() {
            [DragEffect::ScheduleLongPress { token, delay }] => {
                assert_eq!(*delay, Duration::from_millis(100));
                *token
            }
            other => panic!("unexpected effects {other:?}"),
        };

        let effects = drag.pointer_up(down, &ctx());
        assert_eq!(
            effects,
            vec![
                DragEffect::CancelLongPress { token },
                DragEffect::Entity(EntityRequest::TapOptionsRequested { id: 9 }),
            ]
        );
        // The timer firing late does nothing
        assert!(drag.long_press_elapsed(token).is_empty());
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_long_press_activates_drag_without_threshold() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::touch(3, 0.0, 0.0);
        let token = match drag.pointer_down(down, DragTarget::new(9, 0.0, 0.0))[0] {
            DragEffect::ScheduleLongPress { token, .. } => token,
            _ => unreachable!(),
        };

        assert_eq!(drag.long_press_elapsed(token), vec![DragEffect::HideOptions]);
        assert_eq!(drag.phase(), DragPhase::Dragging);

        // A 4px move is now applied right away
        let effects = drag.pointer_move(down.at(0.0, -4.0), &ctx());
        assert_eq!(offsets(&effects), vec![OffsetUpdate::both(0.0, 2.0)]);

        let effects = drag.pointer_up(down.at(0.0, -4.0), &ctx());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_long_press_without_movement_is_a_tap() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::touch(1, 0.0, 0.0);
        let token = match drag.pointer_down(down, DragTarget::new(2, 0.0, 0.0))[0] {
            DragEffect::ScheduleLongPress { token, .. } => token,
            _ => unreachable!(),
        };
        drag.long_press_elapsed(token);
        assert_eq!(
            drag.pointer_up(down, &ctx()),
            vec![DragEffect::Entity(EntityRequest::TapOptionsRequested { id: 2 })]
        );
    }

    #[test]
    fn test_threshold_cancels_long_press() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::touch(1, 0.0, 0.0);
        drag.pointer_down(down, DragTarget::new(2, 0.0, 0.0));
        let effects = drag.pointer_move(down.at(30.0, 0.0), &ctx());
        assert!(matches!(effects[0], DragEffect::CancelLongPress { .. }));
        assert_eq!(effects[1], DragEffect::HideOptions);
        assert_eq!(offsets(&effects).len(), 1);
    }

    #[test]
    fn test_cancel_emits_no_entity_effect() {
        let mut drag = DragController::<u32>::default();
        let down = PointerSample::touch(1, 0.0, 0.0);
        drag.pointer_down(down, DragTarget::new(2, 0.0, 0.0));
        let effects = drag.pointer_cancel(PointerId(1));
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], DragEffect::CancelLongPress { .. }));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_second_pointer_is_ignored() {
        let mut drag = DragController::<u32>::default();
        drag.pointer_down(PointerSample::touch(1, 0.0, 0.0), DragTarget::new(2, 0.0, 0.0));
        let second = PointerSample::touch(2, 50.0, 50.0);
        assert!(drag.pointer_down(second, DragTarget::new(3, 0.0, 0.0)).is_empty());
        assert!(drag.pointer_move(second.at(200.0, 200.0), &ctx()).is_empty());
        assert!(drag.pointer_up(second, &ctx()).is_empty());
        assert_eq!(drag.target(), Some(2));
    }

    #[test]
    fn test_request_converts_to_entity_event() {
        let id = EntityId::new();
        let event: EntityEvent = EntityRequest::EditRequested { id }.into();
        assert_eq!(event, EntityEvent::EditRequested { id });
    }
}
