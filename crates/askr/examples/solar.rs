//! A miniature solar system, headless: nested entities whose components
//! drive their local transforms, stepped deterministically.

use std::time::Duration;

use askr::prelude::*;

/// Circles the parent at a fixed radius and angular speed.
struct Orbit {
    radius: f32,
    speed: f32,
    angle: f32,
}

impl Component for Orbit {
    fn update(&mut self, ctx: &mut Context) {
        self.angle += self.speed * ctx.time().delta_secs();
        let transform = ctx.scene.transform_mut(ctx.entity());
        transform.position = Vec2::new(self.angle.cos(), self.angle.sin()) * self.radius;
    }
}

fn main() {
    env_logger::init();

    let mut engine = Engine::new();
    let root = engine.scene().root();
    let sun = engine.scene_mut().make_child(root, "sun");

    for (name, radius, speed) in [("mercury", 4.0, 1.6), ("venus", 7.0, 1.2)] {
        let planet = engine.scene_mut().make_child(sun, name);
        engine.scene_mut().add_component(
            planet,
            Orbit {
                radius,
                speed,
                angle: 0.0,
            },
        );
    }
    let earth = engine.scene_mut().make_child(sun, "earth");
    engine.scene_mut().add_component(
        earth,
        Orbit {
            radius: 10.0,
            speed: 1.0,
            angle: 0.0,
        },
    );
    let moon = engine.scene_mut().make_child(earth, "moon");
    engine.scene_mut().add_component(
        moon,
        Orbit {
            radius: 1.5,
            speed: 6.0,
            angle: 0.0,
        },
    );

    let dt = Duration::from_secs_f64(1.0 / 60.0);
    for _ in 0..4 {
        engine.advance_frames(30, dt);
        println!("t = {:>4.1} s", engine.time().elapsed_secs());
        for &planet in engine.scene().children(sun) {
            let p = engine.scene().transform(planet).position;
            println!("  {:<8} ({:>6.2}, {:>6.2})", engine.scene().name(planet), p.x, p.y);
        }
        let p = engine.scene().transform(moon).position;
        println!("  {:<8} ({:>6.2}, {:>6.2}) around earth", "moon", p.x, p.y);
    }
}
