// Tween component: animates its own object's transform or visual.
//
// Usage:
//   let mut tweens = TweenComponent::new();
//   tweens.add(Tween::scale(Vec2::ZERO, Vec2::ONE, 0.5, Easing::BackOut));
//   object.add_component(tweens)?;

use glam::{Vec2, Vec3};

use super::{ComponentContext, ComponentHooks};
use crate::api::types::GameEvent;
use crate::extensions::easing::{ease, Easing};

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Local position.
    Position { from: Vec2, to: Vec2 },
    /// Local rotation in degrees.
    Rotation { from: f32, to: f32 },
    /// Local scale.
    Scale { from: Vec2, to: Vec2 },
    /// Opacity of the sprite (or button when there is no sprite).
    Fade { from: f32, to: f32 },
    /// Color of the sprite (or button when there is no sprite).
    Color { from: Vec3, to: Vec3 },
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction (ping-pong).
    PingPong,
}

#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in seconds.
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    pub playing: bool,
    /// For ping-pong: current direction (true = forward).
    forward: bool,
    /// Game event kind emitted when a `Once` tween completes.
    pub on_complete: Option<u32>,
}

impl Tween {
    pub fn new(target: TweenTarget, duration: f32, easing: Easing) -> Self {
        Self {
            target,
            duration,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            playing: true,
            forward: true,
            on_complete: None,
        }
    }

    pub fn position(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, duration, easing)
    }

    pub fn rotation(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, duration, easing)
    }

    pub fn scale(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from, to }, duration, easing)
    }

    pub fn fade(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Fade { from, to }, duration, easing)
    }

    pub fn color(from: Vec3, to: Vec3, duration: f32, easing: Easing) -> Self {
        Self::new(TweenTarget::Color { from, to }, duration, easing)
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_on_complete(mut self, event_kind: u32) -> Self {
        self.on_complete = Some(event_kind);
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn eased_t(&self) -> f32 {
        let t = self.progress();
        if self.forward {
            t
        } else {
            1.0 - t
        }
    }

    /// Carry time past the end into the next cycle. Returns how many
    /// cycles were completed.
    fn wrap(&mut self) -> u32 {
        if self.duration <= 0.0 {
            self.elapsed = 0.0;
            return 1;
        }
        let cycles = (self.elapsed / self.duration).floor();
        self.elapsed -= cycles * self.duration;
        cycles as u32
    }

    fn apply(&self, ctx: &mut ComponentContext<'_, '_>) {
        let t = self.eased_t();
        match self.target {
            TweenTarget::Position { from, to } => ctx.transform.position = ease(from, to, t, self.easing),
            TweenTarget::Rotation { from, to } => ctx.transform.rotation = ease(from, to, t, self.easing),
            TweenTarget::Scale { from, to } => ctx.transform.scale = ease(from, to, t, self.easing),
            TweenTarget::Fade { from, to } => ctx.set_opacity(ease(from, to, t, self.easing)),
            TweenTarget::Color { from, to } => ctx.set_color(ease(from, to, t, self.easing)),
        }
    }
}

/// Handle to a tween within its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

#[derive(Debug, Default)]
pub struct TweenComponent {
    tweens: Vec<(TweenId, Tween)>,
    next_id: u32,
    /// Destroy the owning object once every tween has finished.
    pub destroy_object_when_done: bool,
    /// Remove just this component once every tween has finished.
    pub remove_when_done: bool,
}

impl TweenComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tween: Tween) -> Self {
        self.add(tween);
        self
    }

    pub fn destroy_object_when_done(mut self) -> Self {
        self.destroy_object_when_done = true;
        self
    }

    pub fn remove_when_done(mut self) -> Self {
        self.remove_when_done = true;
        self
    }

    pub fn add(&mut self, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, tween));
        id
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|(t, _)| *t == id).map(|(_, tween)| tween)
    }

    fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|(t, _)| *t == id).map(|(_, tween)| tween)
    }

    pub fn pause(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.playing = false;
        }
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some(tween) = self.get_mut(id) {
            tween.playing = true;
        }
    }

    /// Remove a tween without completing it. No completion event is emitted.
    pub fn stop(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(t, _)| *t != id);
        self.tweens.len() != before
    }

    pub fn stop_all(&mut self) {
        self.tweens.clear();
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl ComponentHooks for TweenComponent {
    fn update(&mut self, ctx: &mut ComponentContext<'_, '_>) {
        let had_tweens = !self.tweens.is_empty();
        let dt = ctx.dt;

        self.tweens.retain_mut(|(_, tween)| {
            if !tween.playing {
                return true;
            }
            tween.elapsed += dt;
            tween.apply(ctx);

            if tween.elapsed < tween.duration {
                return true;
            }
            match tween.loop_mode {
                TweenLoop::Once => {
                    if let Some(kind) = tween.on_complete {
                        ctx.emit_event(GameEvent::new(kind));
                    }
                    false
                }
                TweenLoop::Loop => {
                    tween.wrap();
                    true
                }
                TweenLoop::PingPong => {
                    if tween.wrap() % 2 == 1 {
                        tween.forward = !tween.forward;
                    }
                    true
                }
            }
        });

        if had_tweens && self.tweens.is_empty() {
            if self.destroy_object_when_done {
                ctx.destroy_object();
            } else if self.remove_when_done {
                ctx.destroy_self();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{AudioCommand, ObjectId};
    use crate::assets::manager::ResourceManagementSystem;
    use crate::assets::source::MemoryAssets;
    use crate::components::{GameObject, Services, SpriteRenderer};
    use crate::input::InputState;
    use crate::renderer::headless::RecordingBackend;

    #[test]
    fn progress_and_direction() {
        let mut tween = Tween::fade(1.0, 0.0, 2.0, Easing::Linear);
        tween.elapsed = 0.5;
        assert_eq!(tween.progress(), 0.25);
        tween.forward = false;
        assert_eq!(tween.eased_t(), 0.75);

        let instant = Tween::fade(1.0, 0.0, 0.0, Easing::Linear);
        assert_eq!(instant.progress(), 1.0);
    }

    #[test]
    fn pause_resume_stop_by_id() {
        let mut tweens = TweenComponent::new();
        let a = tweens.add(Tween::rotation(0.0, 90.0, 1.0, Easing::Linear));
        let b = tweens.add(Tween::scale(Vec2::ZERO, Vec2::ONE, 1.0, Easing::Linear));

        tweens.pause(a);
        assert!(!tweens.get(a).unwrap().playing);
        tweens.resume(a);
        assert!(tweens.get(a).unwrap().playing);

        assert!(tweens.stop(b));
        assert!(!tweens.stop(b));
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn loop_carries_overshoot_into_next_cycle() {
        let tween = Tween::position(Vec2::ZERO, Vec2::new(10.0, 0.0), 1.0, Easing::Linear);
        let mut obj = object(tween.with_loop(TweenLoop::Loop));
        let mut h = Harness::new();

        h.update(&mut obj, 0.75);
        assert_eq!(obj.transform.position, Vec2::new(7.5, 0.0));
        h.update(&mut obj, 0.5);
        // Lands on the end value, then the extra 0.25s starts the next cycle.
        assert_eq!(obj.transform.position, Vec2::new(10.0, 0.0));
        let tween = first(&obj);
        assert!((tween.elapsed - 0.25).abs() < 1e-6);
        assert!(tween.forward);

        h.update(&mut obj, 0.25);
        assert!((obj.transform.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn ping_pong_reverses_each_cycle() {
        let mut obj = object(Tween::rotation(0.0, 90.0, 1.0, Easing::Linear).with_loop(TweenLoop::PingPong));
        let mut h = Harness::new();

        h.update(&mut obj, 1.0);
        assert_eq!(obj.transform.rotation, 90.0);
        assert!(!first(&obj).forward);

        h.update(&mut obj, 0.25);
        assert!((obj.transform.rotation - 67.5).abs() < 1e-4);

        h.update(&mut obj, 0.75);
        assert!(first(&obj).forward);
        h.update(&mut obj, 0.5);
        assert!((obj.transform.rotation - 45.0).abs() < 1e-4);

        // Two whole cycles in one step keep the direction.
        h.update(&mut obj, 2.0);
        assert!(first(&obj).forward);
    }

    #[test]
    fn once_emits_completion_event_once() {
        let mut obj = object(Tween::scale(Vec2::ZERO, Vec2::ONE, 0.5, Easing::Linear).with_on_complete(7));
        let mut h = Harness::new();

        h.update(&mut obj, 0.3);
        assert!(h.events.is_empty());
        h.update(&mut obj, 0.3);
        assert_eq!(obj.transform.scale, Vec2::ONE);
        assert_eq!(h.events.len(), 1);
        h.update(&mut obj, 0.3);
        assert_eq!(h.events.len(), 1);
        assert_eq!(h.events[0].kind_id(), 7);
        assert!(obj.get::<TweenComponent>().unwrap().is_empty());
    }

    #[test]
    fn color_tween_tints_sprite() {
        let mut obj = object(Tween::color(Vec3::ZERO, Vec3::new(1.0, 0.5, 0.0), 1.0, Easing::Linear));
        obj.add_component(SpriteRenderer::solid(Vec3::ONE)).unwrap();
        let mut h = Harness::new();

        h.update(&mut obj, 0.5);
        let sprite = obj.get::<SpriteRenderer>().unwrap();
        assert_eq!(sprite.color, Vec3::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn overshooting_fade_stays_in_range() {
        let mut obj = object(Tween::fade(0.0, 1.0, 1.0, Easing::BackOut));
        obj.add_component(SpriteRenderer::solid(Vec3::ONE)).unwrap();
        let mut h = Harness::new();

        // BackOut passes 1.0 around the middle of the curve.
        assert!(Easing::BackOut.apply(0.6) > 1.0);
        h.update(&mut obj, 0.6);
        assert_eq!(obj.get::<SpriteRenderer>().unwrap().opacity, 1.0);
    }

    fn object(tween: Tween) -> GameObject {
        GameObject::new(ObjectId(1), "tweened")
            .with(TweenComponent::new().with(tween))
            .unwrap()
    }

    fn first(obj: &GameObject) -> &Tween {
        &obj.get::<TweenComponent>().unwrap().tweens[0].1
    }

    struct Harness {
        gpu: RecordingBackend,
        resources: ResourceManagementSystem,
        input: InputState,
        events: Vec<GameEvent>,
        audio: Vec<AudioCommand>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                gpu: RecordingBackend::new(),
                resources: ResourceManagementSystem::new(Box::new(MemoryAssets::new()), 1, 4, 4),
                input: InputState::new(),
                events: Vec::new(),
                audio: Vec::new(),
            }
        }

        fn update(&mut self, obj: &mut GameObject, dt: f32) {
            let mut services = Services {
                input: &self.input,
                resources: &mut self.resources,
                gpu: &mut self.gpu,
                events: &mut self.events,
                audio: &mut self.audio,
            };
            obj.update(dt, &mut services);
        }
    }
}
