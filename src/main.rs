use log::{error, info};
use rsteer::engine::scene_catalog;
use rsteer::{Engine, SceneConfig};

const DEFAULT_STEPS: u64 = 600;
const REPORT_EVERY: u64 = 100;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RSTEER_LOG", "info"))
        .target(env_logger::Target::Stdout)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let scene = args.first().map(String::as_str).unwrap_or("seek");

    if scene == "list" {
        for info in scene_catalog() {
            println!("{:<24} {}", info.id, info.description);
        }
        return;
    }

    let steps = match args.get(1).map(|s| s.parse::<u64>()) {
        None => DEFAULT_STEPS,
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            error!("invalid step count '{}': {}", args[1], e);
            std::process::exit(2);
        }
    };

    let config = match args.get(2) {
        Some(path) => {
            info!("loading scene config from '{}'", path);
            match SceneConfig::load(path) {
                Ok(mut cfg) => {
                    cfg.scene = scene.to_string();
                    cfg
                }
                Err(e) => {
                    error!("failed to load config: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => match SceneConfig::for_scene(scene) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    let mut engine = match Engine::from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!("failed to build scene: {}", e);
            std::process::exit(1);
        }
    };

    // Headless runs have no pointer; park the seek target off to one side.
    let uses_target = scene_catalog()
        .iter()
        .any(|info| info.id == engine.scene_id() && info.uses_target);
    if uses_target {
        if let Err(e) = engine.set_target(Some(nalgebra::Vector3::new(20.0, 10.0, 0.0))) {
            error!("failed to set target: {}", e);
            std::process::exit(1);
        }
    }

    for _ in 0..steps {
        engine.tick();
        if engine.steps() % REPORT_EVERY == 0 {
            report(&engine);
        }
    }

    match engine.config().to_ron_string() {
        Ok(text) => println!("{}", text),
        Err(e) => error!("failed to serialize config: {}", e),
    }
}

fn report(engine: &Engine) {
    let n = engine.len().max(1) as f64;
    let (sum, speed) = engine
        .simulator()
        .vehicles()
        .iter()
        .fold((nalgebra::Vector3::<f64>::zeros(), 0.0), |(s, v), veh| {
            (s + veh.position(), v + veh.velocity().norm())
        });
    let c = sum / n;
    info!(
        "step {:>6}: centroid ({:.2}, {:.2}, {:.2}), mean speed {:.3}",
        engine.steps(),
        c.x,
        c.y,
        c.z,
        speed / n
    );
}
