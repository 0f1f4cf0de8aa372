//! # Engine — The Frame Driver
//!
//! The engine owns the [`Scene`], the frame clock, and the shared
//! [`RenderQueue`], and runs the fixed per-frame sequence:
//!
//! ```text
//! advance clock → physics pass → update pass → late-update pass
//!              → clear queue + render pass → gizmo pass (optional)
//!              → apply queued structural mutations
//! ```
//!
//! Two ways to drive it: [`tick`](Engine::tick) follows the real clock (the
//! shape of a windowed main loop), [`advance`](Engine::advance) steps by an
//! explicit delta for deterministic, headless frames. Both run the exact same
//! pipeline.
//!
//! The engine collects draw submissions but never draws; a renderer reads
//! [`render_queue`](Engine::render_queue) between frames and rasterizes the
//! layer buckets back to front.

use std::time::Duration;

use crate::render::RenderQueue;
use crate::scene::Scene;
use crate::time::Time;

/// Startup configuration for an [`Engine`].
pub struct EngineSettings {
    /// Number of render layers (at least 1).
    pub layers: usize,
    /// Run the debug-overlay pass each frame.
    pub show_gizmos: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            layers: 1,
            show_gizmos: false,
        }
    }
}

/// Owns the scene and drives its passes, one frame at a time.
pub struct Engine {
    scene: Scene,
    time: Time,
    queue: RenderQueue,
    settings: EngineSettings,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        log::debug!(
            "Engine starting with {} render layer(s), gizmos {}",
            settings.layers,
            if settings.show_gizmos { "on" } else { "off" }
        );
        Self {
            scene: Scene::with_layers(settings.layers),
            time: Time::new(),
            queue: RenderQueue::new(settings.layers),
            settings,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Frame timing as of the last tick.
    pub fn time(&self) -> Time {
        self.time
    }

    /// Draw submissions collected during the last frame's render pass.
    pub fn render_queue(&self) -> &RenderQueue {
        &self.queue
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn set_show_gizmos(&mut self, show: bool) {
        self.settings.show_gizmos = show;
    }

    /// Run one frame against the real clock.
    pub fn tick(&mut self) {
        self.time.update();
        self.step();
    }

    /// Run one frame with an explicit delta, ignoring the real clock.
    pub fn advance(&mut self, dt: Duration) {
        self.time.advance(dt);
        self.step();
    }

    /// Run `frames` frames of `dt` each.
    pub fn advance_frames(&mut self, frames: usize, dt: Duration) {
        for _ in 0..frames {
            self.advance(dt);
        }
    }

    fn step(&mut self) {
        self.scene.set_time(self.time);
        self.scene.physics_pass();
        self.scene.update_pass();
        self.scene.late_update_pass();
        self.queue.clear();
        self.scene.render_pass(&mut self.queue);
        if self.settings.show_gizmos {
            self.scene.gizmo_pass();
        }
        self.scene.apply_pending();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
