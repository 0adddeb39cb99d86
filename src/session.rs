//! Host facade tying the store, the layout pipeline and the drag controller
//! together.
//!
//! Every mutation recomputes the [`Scene`] before returning, so a renderer
//! reading [`ComparisonSession::scene`] after any call always sees the
//! current state.

use heightcomp_core::{
    Entity, EntityEvent, EntityId, EntityStorage, EntityStore, ImageRef, Result, Silhouette,
};
use heightcomp_interaction::{
    DragConfig, DragContext, DragController, DragEffect, DragPhase, DragTarget, EntityRequest,
    LongPressToken, PointerId, PointerSample,
};
use heightcomp_layout::{compute_scene, LayoutParams, Scene, ViewportSize, ZoomLevel};
use heightcomp_settings::Config;

/// Startup parameters of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionOptions {
    pub zoom: ZoomLevel,
    pub viewport: ViewportSize,
    pub layout: LayoutParams,
    pub drag: DragConfig,
    /// Persist after every change
    pub autosave: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            zoom: ZoomLevel::default(),
            viewport: ViewportSize::new(0.0, 0.0),
            layout: LayoutParams::default(),
            drag: DragConfig::default(),
            autosave: true,
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            zoom: config.zoom_level(),
            layout: config.layout_params(),
            drag: config.drag_config(),
            autosave: config.storage.autosave,
            ..Self::default()
        }
    }
}

/// One height comparison with its storage
pub struct ComparisonSession<S: EntityStorage> {
    store: EntityStore,
    storage: S,
    autosave: bool,
    zoom: ZoomLevel,
    viewport: ViewportSize,
    params: LayoutParams,
    drag: DragController<EntityId>,
    drag_dirty: bool,
    scene: Scene,
}

impl<S: EntityStorage> ComparisonSession<S> {
    /// Load the entity list from `storage` and compute the first scene
    pub fn open(storage: S, options: SessionOptions) -> Result<Self> {
        let store = EntityStore::load_from(&storage)?;
        Ok(Self::with_store(store, storage, options))
    }

    /// Start from an existing store
    pub fn with_store(store: EntityStore, storage: S, options: SessionOptions) -> Self {
        let scene = compute_scene(
            store.entities(),
            options.zoom,
            options.viewport,
            &options.layout,
        );
        tracing::info!(
            "Session opened with {} entities at zoom {}",
            store.len(),
            options.zoom
        );
        Self {
            store,
            storage,
            autosave: options.autosave,
            zoom: options.zoom,
            viewport: options.viewport,
            params: options.layout,
            drag: DragController::new(options.drag),
            drag_dirty: false,
            scene,
        }
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn entities(&self) -> &[Entity] {
        self.store.entities()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Scene for the current inputs
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn layout_params(&self) -> &LayoutParams {
        &self.params
    }

    /// Ruler step for dependent UI such as the nudge step display
    pub fn major_step_cm(&self) -> f64 {
        self.scene.major_step_cm()
    }

    pub fn drag_phase(&self) -> DragPhase {
        self.drag.phase()
    }

    /// Recompute the scene from the current inputs.
    pub fn recompute(&mut self) {
        self.scene = compute_scene(
            self.store.entities(),
            self.zoom,
            self.viewport,
            &self.params,
        );
    }

    /// Save the entity list now; false when the backend failed
    pub fn save(&mut self) -> bool {
        self.store.persist(&mut self.storage)
    }

    // Entity editing

    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId> {
        let id = self.store.add(entity)?;
        self.entities_changed();
        Ok(id)
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity> {
        let entity = self.store.remove(id)?;
        self.entities_changed();
        Ok(entity)
    }

    /// Remove every entity
    pub fn clear_entities(&mut self) {
        self.store.clear();
        self.entities_changed();
    }

    /// Delete affordance of an entity
    pub fn request_delete(&mut self, id: EntityId) -> Result<()> {
        self.apply_event(&EntityEvent::DeleteRequested { id })?;
        Ok(())
    }

    pub fn set_height(&mut self, id: EntityId, height_cm: f64) -> Result<()> {
        self.store.set_height(id, height_cm)?;
        self.entities_changed();
        Ok(())
    }

    pub fn set_name(&mut self, id: EntityId, name: impl Into<String>) -> Result<()> {
        self.store.set_name(id, name)?;
        self.entities_changed();
        Ok(())
    }

    pub fn set_color(&mut self, id: EntityId, color: impl Into<String>) -> Result<()> {
        self.store.set_color(id, color)?;
        self.entities_changed();
        Ok(())
    }

    pub fn set_silhouette(&mut self, id: EntityId, silhouette: Silhouette) -> Result<()> {
        self.store.set_silhouette(id, silhouette)?;
        self.entities_changed();
        Ok(())
    }

    pub fn set_image(&mut self, id: EntityId, image_ref: ImageRef, aspect_ratio: f64) -> Result<()> {
        self.store.set_image(id, image_ref, aspect_ratio)?;
        self.entities_changed();
        Ok(())
    }

    pub fn reset_offsets(&mut self, id: EntityId) -> Result<()> {
        self.store.reset_offsets(id)?;
        self.entities_changed();
        Ok(())
    }

    /// Move an entity to another slot in the row
    pub fn move_entity(&mut self, id: EntityId, index: usize) -> Result<()> {
        self.store.move_to(id, index)?;
        self.entities_changed();
        Ok(())
    }

    /// Apply an event addressed to the store; returns whether anything changed
    pub fn apply_event(&mut self, event: &EntityEvent) -> Result<bool> {
        let changed = self.store.apply(event)?;
        if changed {
            self.entities_changed();
        }
        Ok(changed)
    }

    // Zoom and viewport

    /// Set the zoom level, clamped to 10-100
    pub fn set_zoom(&mut self, level: u8) {
        self.zoom.set(level);
        self.recompute();
    }

    pub fn zoom_in(&mut self) {
        self.zoom.zoom_in();
        self.recompute();
    }

    pub fn zoom_out(&mut self) {
        self.zoom.zoom_out();
        self.recompute();
    }

    /// New container dimensions measured by the host
    pub fn resize(&mut self, viewport: ViewportSize) {
        if viewport != self.viewport {
            tracing::debug!("Viewport resized to {}", viewport);
            self.viewport = viewport;
            self.recompute();
        }
    }

    // Pointer input

    /// Pointer pressed at a container position; hits the topmost entity box
    pub fn pointer_down(&mut self, sample: PointerSample) -> Vec<DragEffect<EntityId>> {
        let hit = self
            .scene
            .hit_test(sample.position.x, sample.position.y)
            .map(|p| p.id);
        match hit {
            Some(id) => self.pointer_down_on(sample, id),
            None => Vec::new(),
        }
    }

    /// Pointer pressed on a known entity
    pub fn pointer_down_on(
        &mut self,
        sample: PointerSample,
        id: EntityId,
    ) -> Vec<DragEffect<EntityId>> {
        let Some(target) = self.store.get(id).map(DragTarget::<EntityId>::from) else {
            tracing::debug!("Pointer down on unknown entity {}", id);
            return Vec::new();
        };
        let effects = self.drag.pointer_down(sample, target);
        self.handle_effects(effects)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> Vec<DragEffect<EntityId>> {
        let ctx = DragContext::from_scene(&self.scene);
        let effects = self.drag.pointer_move(sample, &ctx);
        self.handle_effects(effects)
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> Vec<DragEffect<EntityId>> {
        let ctx = DragContext::from_scene(&self.scene);
        let effects = self.drag.pointer_up(sample, &ctx);
        let effects = self.handle_effects(effects);
        self.finish_gesture();
        effects
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Vec<DragEffect<EntityId>> {
        let effects = self.drag.pointer_cancel(pointer);
        let effects = self.handle_effects(effects);
        self.finish_gesture();
        effects
    }

    /// Host timer callback for a scheduled long press
    pub fn long_press_elapsed(&mut self, token: LongPressToken) -> Vec<DragEffect<EntityId>> {
        let effects = self.drag.long_press_elapsed(token);
        self.handle_effects(effects)
    }

    /// Apply offset updates to the store and hand everything else to the host.
    fn handle_effects(&mut self, effects: Vec<DragEffect<EntityId>>) -> Vec<DragEffect<EntityId>> {
        let mut changed = false;
        let mut for_host = Vec::with_capacity(effects.len());

        for effect in effects {
            match effect {
                DragEffect::Entity(request @ EntityRequest::OffsetsChanged { .. }) => {
                    match self.store.apply(&EntityEvent::from(request)) {
                        Ok(applied) => changed |= applied,
                        Err(e) => tracing::warn!("Dropping drag update: {}", e),
                    }
                }
                other => for_host.push(other),
            }
        }

        if changed {
            // Saved once the gesture ends rather than on every move
            self.drag_dirty = true;
            self.recompute();
        }
        for_host
    }

    fn finish_gesture(&mut self) {
        if self.drag_dirty && !self.drag.is_active() {
            self.drag_dirty = false;
            self.autosave();
        }
    }

    fn entities_changed(&mut self) {
        self.recompute();
        self.autosave();
    }

    fn autosave(&mut self) {
        if self.autosave {
            self.store.persist(&mut self.storage);
        }
    }
}
