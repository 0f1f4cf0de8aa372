//! Task sequencing, headless: a countdown task, a second task awaiting it,
//! then self-destruction of the component that launched both.
//!
//! Run with `RUST_LOG=trace` to watch the scene's structural changes.

use std::time::Duration;

use askr::prelude::*;

struct Countdown;

impl Component for Countdown {
    fn start(&mut self, ctx: &mut Context) {
        let mut step = 0;
        let announce = ctx.start_task(move |ctx| {
            step += 1;
            println!(
                "[frame {:>2}] countdown: {}",
                ctx.time().frame_count(),
                3 - step
            );
            if step < 3 {
                Ok(TaskStep::Yield(Suspend::Seconds(0.5)))
            } else {
                Ok(TaskStep::Done)
            }
        });
        ctx.start_task(move |ctx| {
            if ctx.scene.task_alive(announce) {
                return Ok(TaskStep::Yield(Suspend::Until(announce)));
            }
            println!("[frame {:>2}] liftoff!", ctx.time().frame_count());
            ctx.destroy_self();
            Ok(TaskStep::Done)
        });
    }
}

fn main() {
    env_logger::init();

    let mut engine = Engine::new();
    let root = engine.scene().root();
    let rocket = engine.scene_mut().make_child(root, "rocket");
    engine.scene_mut().add_component(rocket, Countdown);

    // 10 fps so the 0.5 s waits span several visible frames.
    while engine.scene().component_count(rocket) > 1 {
        engine.advance(Duration::from_millis(100));
    }
    println!(
        "sequence finished after {} frames ({:.1} s)",
        engine.time().frame_count(),
        engine.time().elapsed_secs()
    );
}
