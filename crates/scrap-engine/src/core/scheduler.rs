// core/scheduler.rs
//
// Frame-driven task runner. Tasks are closures owned by the scheduler and
// run during the engine tick, after objects update.
//
// Usage:
//   scheduler.add_delayed(2.0, |ctx| ctx.transitions.request("MainMenu"));
//   scheduler.add_repeating(|ctx, dt| { ...; TaskStatus::Continue });

use crate::api::types::GameEvent;

use super::collection::GameObjectCollection;
use super::scene::TransitionRequest;

/// What a repeating task wants after running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Continue,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u32);

/// What a task may touch while it runs.
pub struct TaskContext<'a> {
    pub objects: &'a mut GameObjectCollection,
    pub transitions: &'a mut TransitionRequest,
    pub events: &'a mut Vec<GameEvent>,
}

type DelayedFn = Box<dyn FnOnce(&mut TaskContext<'_>)>;
type RepeatingFn = Box<dyn FnMut(&mut TaskContext<'_>, f32) -> TaskStatus>;

enum TaskKind {
    Delayed { remaining: f32, run: Option<DelayedFn> },
    Repeating { run: RepeatingFn },
}

struct Task {
    id: TaskId,
    kind: TaskKind,
}

#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<Task>,
    next_id: u32,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler").field("tasks", &self.tasks.len()).finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: TaskKind) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task { id, kind });
        id
    }

    /// Run `task` once, on the first update at which `delay` seconds have
    /// elapsed. A zero delay runs on the next update.
    pub fn add_delayed(&mut self, delay: f32, task: impl FnOnce(&mut TaskContext<'_>) + 'static) -> TaskId {
        self.push(TaskKind::Delayed {
            remaining: delay,
            run: Some(Box::new(task)),
        })
    }

    /// Run `task` every update, with the frame delta, until it returns
    /// [`TaskStatus::Done`].
    pub fn add_repeating(
        &mut self,
        task: impl FnMut(&mut TaskContext<'_>, f32) -> TaskStatus + 'static,
    ) -> TaskId {
        self.push(TaskKind::Repeating { run: Box::new(task) })
    }

    /// Returns false if the task already ran to completion or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Advance every task by `dt`, in the order they were added.
    pub fn update(&mut self, dt: f32, ctx: &mut TaskContext<'_>) {
        self.tasks.retain_mut(|task| match &mut task.kind {
            TaskKind::Delayed { remaining, run } => {
                *remaining -= dt;
                if *remaining > 0.0 {
                    return true;
                }
                if let Some(run) = run.take() {
                    run(ctx);
                }
                false
            }
            TaskKind::Repeating { run } => run(ctx, dt) == TaskStatus::Continue,
        });
    }

    /// Drop every task without running it.
    pub fn clear(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("scheduler: dropping {} tasks", self.tasks.len());
        }
        self.tasks.clear();
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
