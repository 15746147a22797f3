use anyhow::{Context, bail};
use binder_core::{MethodRegistry, params};
use binder_ids::ObjectID;
use binder_project::{BinderConfig, load_config};
use binder_runtime::{EventsCollection, Scene, SignalHub, load_bindings};
use binder_variant::{EnumType, ValueType, Variant};
use log::{info, warn};
use serde_json::json;
use std::{env, fs, path::PathBuf};

#[derive(Debug, Default)]
struct DemoState {
    score: i32,
    mood: String,
    said: Vec<String>,
    moves: Vec<(ObjectID, [f32; 3])>,
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn parse_flag_values(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|pair| pair[0] == flag)
        .map(|pair| pair[1].clone())
        .collect()
}

fn current_dir_fallback() -> PathBuf {
    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn demo_events(target: &str) -> EventsCollection<DemoState> {
    let mood = EnumType::new("Mood", ["Calm", "Alert", "Panic"]);
    let mut events = EventsCollection::new(DemoState::default());
    events
        .register(target, "SetScore", params![score: ValueType::Int], |s, args| {
            s.score = args[0].as_i32().unwrap_or_default();
            Ok(Variant::from(s.score))
        })
        .register(target, "AddScore", params![amount: ValueType::Int], |s, args| {
            s.score = s.score.saturating_add(args[0].as_i32().unwrap_or_default());
            Ok(Variant::from(s.score))
        })
        .register(target, "Say", params![text: ValueType::String], |s, args| {
            let text = args[0].as_str().unwrap_or_default().to_string();
            s.said.push(text.clone());
            Ok(Variant::from(text))
        })
        .register(
            target,
            "Teleport",
            params![who: ValueType::Object, to: ValueType::Vector3],
            |s, args| {
                let (Some(who), Some(to)) = (args[0].as_object(), args[1].as_vec3()) else {
                    bail!("Teleport expects (Object, Vector3)");
                };
                s.moves.push((who, to.to_array()));
                Ok(Variant::Null)
            },
        )
        .register(
            target,
            "SetMood",
            params![mood: ValueType::Enum(mood)],
            |s, args| {
                s.mood = args[0].as_enum_name().unwrap_or_default().to_string();
                Ok(Variant::Null)
            },
        );
    events
}

fn load_scene(config: &BinderConfig) -> anyhow::Result<Scene> {
    if !config.scene.exists() {
        warn!("no scene at {}; starting empty", config.scene.display());
        return Ok(Scene::new());
    }
    let source = fs::read_to_string(&config.scene)
        .with_context(|| format!("reading {}", config.scene.display()))?;
    Scene::from_json(&source).with_context(|| format!("loading {}", config.scene.display()))
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let root = parse_flag_value(&args, "--path")
        .map(PathBuf::from)
        .unwrap_or_else(current_dir_fallback);
    let config = load_config(&root).with_context(|| format!("project at {}", root.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    let repeat = match parse_flag_value(&args, "--repeat") {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("--repeat expects a count, got `{raw}`"))?,
        None => 1,
    };

    info!("running `{}` from {}", config.name, root.display());

    let scene = load_scene(&config)?;
    let mut events = demo_events(&config.events_collection);
    let mut registry = MethodRegistry::new();
    registry.refresh(&events, &config.events_collection)?;

    let entries = if config.bindings.exists() {
        let source = fs::read_to_string(&config.bindings)
            .with_context(|| format!("reading {}", config.bindings.display()))?;
        load_bindings(&source).with_context(|| format!("parsing {}", config.bindings.display()))?
    } else {
        warn!("no bindings at {}", config.bindings.display());
        Vec::new()
    };

    let mut to_emit = parse_flag_values(&args, "--emit");
    if to_emit.is_empty() {
        for entry in &entries {
            if !to_emit.contains(&entry.event) {
                to_emit.push(entry.event.clone());
            }
        }
    }

    let mut hub = SignalHub::new();
    for (event, outcome) in hub.connect_entries(entries, &registry) {
        if let Err(err) = outcome {
            println!("{}", json!({ "event": event, "configuration_error": err.to_string() }));
        }
    }

    for round in 0..repeat {
        for event in &to_emit {
            for (binder, outcome) in hub.emit(event, &scene, &registry, &mut events) {
                let line = match outcome {
                    Ok(value) => json!({
                        "round": round,
                        "event": event,
                        "binder": binder.to_string(),
                        "result": value.to_json_value(),
                    }),
                    Err(err) => json!({
                        "round": round,
                        "event": event,
                        "binder": binder.to_string(),
                        "error": err.to_string(),
                    }),
                };
                println!("{line}");
            }
        }
    }

    let state = events.state();
    info!(
        "final score {} | mood `{}` | {} line(s) said | {} teleport(s)",
        state.score,
        state.mood,
        state.said.len(),
        state.moves.len()
    );
    Ok(())
}
