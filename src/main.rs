//! Example orrery demonstrating the transform tree
//!
//! Usage: `transform-tree [config.json]`. The optional file holds a
//! `TreeConfig` in JSON; missing fields keep their defaults.

use std::f32::consts::TAU;

use transform_tree::prelude::*;

/// Sun, planet and moon nodes of the demo
struct Orrery {
    tree: TransformTree<&'static str>,
    sun: Entity,
    planet: Entity,
    moon: Entity,
}

impl Orrery {
    fn new(config: TreeConfig) -> Result<Self, TreeError> {
        let mut tree = TransformTree::with_config(config);

        let sun = tree.spawn_with("sun");
        let planet = tree.spawn_with("planet");
        let moon = tree.spawn_with("moon");

        tree.set_parent(planet, Some(sun))?;
        tree.set_parent(moon, Some(planet))?;

        tree.set_uniform_scale(sun, 4.0)?;
        tree.set_position(planet, Vec3::new(5.0, 0.0, 0.0))?;
        tree.set_uniform_scale(planet, 0.25)?;
        tree.set_position(moon, Vec3::new(6.0, 0.0, 0.0))?;

        tree.add_tag(planet, "body")?;
        tree.add_tag(moon, "body")?;

        Ok(Self {
            tree,
            sun,
            planet,
            moon,
        })
    }

    fn step(&mut self, dt: f32) -> Result<(), TreeError> {
        self.tree.rotate_axis(self.sun, Vec3::Y, TAU * 0.1 * dt, Space::Local)?;
        self.tree.rotate_axis(self.planet, Vec3::Y, TAU * 0.5 * dt, Space::Local)?;
        Ok(())
    }
}

fn load_config() -> Result<TreeConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&text)?;
            log::info!("Loaded tree configuration from {path}");
            Ok(config)
        }
        None => Ok(TreeConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut orrery = Orrery::new(load_config()?)?;
    let bodies = orrery.tree.find_children(orrery.sun, "body", true)?;
    log::info!("Orrery with {} tagged bodies", bodies.len());

    for frame in 0..=10 {
        let moon = orrery.tree.world_position(orrery.moon)?;
        let name = orrery.tree.payload(orrery.moon)?.unwrap_or("?");
        println!("frame {frame:2}: {name} at ({:7.3}, {:7.3}, {:7.3})", moon.x, moon.y, moon.z);
        orrery.step(0.1)?;
    }

    // Point the planet's forward axis at the sun
    let sun = orrery.tree.world_position(orrery.sun)?;
    let forward = orrery.tree.config().forward;
    orrery.tree.look_at(orrery.planet, sun, Space::World, forward)?;
    let facing = orrery.tree.world_orientation(orrery.planet)? * forward;
    println!("planet faces ({:.3}, {:.3}, {:.3})", facing.x, facing.y, facing.z);

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Orrery error: {}", e);
    }
}
