//! # Tasks — Cooperative, Frame-Interleaved Routines
//!
//! A task is a resumable routine hosted by an entity or a component. The
//! scheduler resumes each owner's tasks once per frame, right after that
//! owner's `update` slot, in the order the tasks were started. A routine runs
//! until it returns a [`TaskStep`]:
//!
//! - `Yield(Suspend::NextFrame)` — resume on the next frame's pass.
//! - `Yield(Suspend::Seconds(d))` — resume once `d` seconds of frame time
//!   have accumulated since the yield (checked once per resumption attempt).
//! - `Yield(Suspend::Until(h))` — resume after task `h` has fully completed,
//!   enabling sequential "await"-style composition.
//! - `Done` — the task is finished and is removed from its owner.
//!
//! Routines are ordinary `FnMut` closures acting as hand-rolled state
//! machines: captured variables are the "locals", and each resumption call
//! re-enters with them intact. A routine that returns `Err` is removed and
//! the error is logged against its owner; sibling tasks are unaffected.
//!
//! ```ignore
//! let mut step = 0;
//! ctx.start_task(move |ctx| {
//!     step += 1;
//!     match step {
//!         1 => Ok(TaskStep::Yield(Suspend::Seconds(0.5))),
//!         _ => {
//!             ctx.scene.destroy(ctx.entity());
//!             Ok(TaskStep::Done)
//!         }
//!     }
//! });
//! ```

use crate::context::Context;
use crate::handle::{ComponentHandle, EntityHandle, TaskHandle};

/// Why a task is currently suspended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Suspend {
    /// Resume at the next frame's resumption pass.
    NextFrame,
    /// Resume once this many seconds of frame time have accumulated.
    Seconds(f64),
    /// Resume after the referenced task has fully completed (or was stopped).
    Until(TaskHandle),
}

/// What a routine reports back to the scheduler on each resumption.
pub enum TaskStep {
    /// Suspend again; the scheduler re-evaluates the condition next frame.
    Yield(Suspend),
    /// The routine has run to completion.
    Done,
}

/// A resumable routine. Returning `Err` removes the task and logs the error
/// against its owner; the failure never propagates to sibling tasks.
pub type TaskRoutine = Box<dyn FnMut(&mut Context) -> anyhow::Result<TaskStep>>;

/// Who hosts a task: an entity or one of its components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TaskOwner {
    Entity(EntityHandle),
    Component(ComponentHandle),
}

/// Scheduler-side state of one task. Lives in the scene's task arena; the
/// owner keeps an ordered list of handles.
pub(crate) struct TaskSlot {
    pub owner: TaskOwner,
    /// Taken out while the routine is executing, so a re-entrant resume of
    /// the same task is impossible.
    pub routine: Option<TaskRoutine>,
    /// The pending suspension to satisfy before the next resume.
    pub suspend: Suspend,
    /// Frame time accumulated toward a `Suspend::Seconds` wait. Kept in
    /// f64 so sums of exact binary deltas stay exact.
    pub waited: f64,
}

impl TaskSlot {
    pub fn new(owner: TaskOwner, routine: TaskRoutine) -> Self {
        Self {
            owner,
            routine: Some(routine),
            // A fresh task is due on the first resumption pass after it was
            // started, which runs its body up to the first yield.
            suspend: Suspend::NextFrame,
            waited: 0.0,
        }
    }
}
