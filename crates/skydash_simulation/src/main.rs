//! Headless симуляция SKYDASH
//!
//! Запускает Bevy App без рендера: auto-advance аватар, 600 тиков

use bevy::prelude::*;
use skydash_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting SKYDASH headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    let avatar = {
        let mut commands = app.world_mut().commands();
        spawn_avatar(
            &mut commands,
            MovementConfig {
                auto_move: true,
                ..Default::default()
            },
            Vec3::new(0.0, 1.0, 0.0),
        )
    };
    app.update(); // применяем отложенный spawn

    app.world_mut().send_event(GameInit);
    app.update();
    app.world_mut().send_event(GameStart);

    // Прогоняем 600 тиков симуляции
    for tick in 0..600 {
        app.update();

        if tick % 100 == 0 {
            let state = app.world().get::<MovementState>(avatar).unwrap();
            println!("Tick {}: distance {:.1}", tick, state.distance_traveled);
        }
    }

    println!("Simulation complete!");
}
