//! Deferred draw-command pipeline.
//!
//! Commands are queued during a frame's render phase and consumed by
//! `flush`, which sorts them into batches, resolves resource handles and
//! issues backend draws. A command whose handles are stale or which the
//! backend rejects is logged and skipped; the rest of the frame still draws.

use glam::Mat4;

use super::backend::{DrawCall, GpuBackend, Viewport};
use super::camera::Camera;
use super::command::DrawCommand;
use crate::assets::manager::ResourceManagementSystem;
use crate::error::{EngineError, EngineResult};

/// Counters for one flushed frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub drawn: usize,
    pub rejected: usize,
    /// Runs of consecutive draws sharing mesh, texture and blend state.
    pub batches: usize,
}

pub struct Renderer {
    commands: Vec<DrawCommand>,
    clear_color: [f32; 4],
    viewport: Viewport,
    pending_viewport: Option<Viewport>,
    view_projection: Mat4,
    last_stats: FrameStats,
}

impl Renderer {
    pub fn new(viewport: Viewport, clear_color: [f32; 4]) -> Self {
        Self {
            commands: Vec::with_capacity(512),
            clear_color,
            viewport,
            // Pushed to the backend on the first flush.
            pending_viewport: Some(viewport),
            view_projection: Mat4::IDENTITY,
            last_stats: FrameStats::default(),
        }
    }

    /// Queue a command for the next flush.
    pub fn submit_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Takes effect on the next flush.
    pub fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Takes effect on the next flush.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pending_viewport = Some(viewport);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Capture the camera's view-projection for this frame's draws.
    pub fn begin_frame(&mut self, camera: &Camera) {
        self.view_projection = camera.view_projection();
    }

    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Sort, resolve and draw every queued command, then empty the queue.
    pub fn flush(&mut self, gpu: &mut dyn GpuBackend, resources: &ResourceManagementSystem) -> FrameStats {
        if let Some(viewport) = self.pending_viewport.take() {
            if let Err(e) = gpu.set_viewport(viewport) {
                log::warn!("set_viewport failed: {}", e);
            }
        }
        if let Err(e) = gpu.clear(self.clear_color) {
            log::warn!("clear failed: {}", e);
        }

        // Stable: equal keys keep submission order.
        self.commands.sort_by_key(DrawCommand::batch_key);

        let mut stats = FrameStats {
            submitted: self.commands.len(),
            ..FrameStats::default()
        };
        let mut previous: Option<&DrawCommand> = None;
        for command in &self.commands {
            let result = resolve(command, self.view_projection, resources).and_then(|call| {
                gpu.draw(&call)
                    .map_err(|e| EngineError::GpuCommandRejected(e.to_string()))
            });
            match result {
                Ok(()) => {
                    if previous.map_or(true, |prev| command.breaks_batch(prev)) {
                        stats.batches += 1;
                    }
                    previous = Some(command);
                    stats.drawn += 1;
                }
                Err(e) => {
                    log::warn!("skipping draw command: {}", e);
                    stats.rejected += 1;
                }
            }
        }

        self.commands.clear();
        self.last_stats = stats;
        log::trace!(
            "flushed {} commands in {} batches ({} rejected)",
            stats.submitted,
            stats.batches,
            stats.rejected
        );
        stats
    }

    /// Drop queued commands without drawing them.
    pub fn discard(&mut self) {
        self.commands.clear();
    }
}

fn resolve(
    command: &DrawCommand,
    view_projection: Mat4,
    resources: &ResourceManagementSystem,
) -> EngineResult<DrawCall> {
    let mesh = resources.meshes().get(command.mesh)?;
    let texture = match command.texture {
        Some(handle) => Some(resources.textures().get(handle)?.gpu),
        None => None,
    };
    Ok(DrawCall {
        buffer: mesh.gpu,
        vertex_count: mesh.vertex_count,
        texture,
        model: command.model_matrix(),
        view_projection,
        tint: command.tint.to_array(),
        uv_rect: command.uv_rect,
        blend: command.blend,
    })
}
