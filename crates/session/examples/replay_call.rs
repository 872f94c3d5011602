//! Example: Replay a scripted call through a proximity session.
//!
//! Run with: cargo run -p proxcall-session --example replay_call [script.jsonl]
//!
//! Each script line is an event as JSON, or `{"type": "wait", "ms": N}` to
//! let time pass. Without a script a built-in call is replayed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use proxcall_events::Event;
use proxcall_policy::{load_default_settings, ProximitySettings, StaticSettings};
use proxcall_session::{
    AudioRouter, BlankTrigger, OrientationSensor, Platform, ProximitySensor, ProximitySession,
};
use proxcall_signals::AudioRoute;

const BUILTIN_SCRIPT: &str = r#"
{"type": "call_phase_changed", "phase": "outgoing"}
{"type": "call_phase_changed", "phase": "active_off_hook"}
{"type": "proximity_raw_sample", "distance": 0.0, "max_range": 5.0}
{"type": "wait", "ms": 1000}
{"type": "proximity_raw_sample", "distance": 5.0, "max_range": 5.0}
{"type": "proximity_raw_sample", "distance": 0.0, "max_range": 5.0}
{"type": "wait", "ms": 3500}
{"type": "audio_route_changed", "route": "speaker"}
{"type": "dialpad_visibility_changed", "visible": true}
{"type": "orientation_changed", "orientation": "horizontal"}
{"type": "call_phase_changed", "phase": "idle"}
"#;

/// Prints every platform call.
struct ConsolePlatform;

impl BlankTrigger for ConsolePlatform {
    fn acquire(&self) {
        println!("  -> blank trigger: acquire");
    }

    fn release(&self, immediate: bool) {
        println!("  -> blank trigger: release (immediate: {})", immediate);
    }
}

impl OrientationSensor for ConsolePlatform {
    fn set_enabled(&self, enabled: bool) {
        println!("  -> orientation sensing: {}", if enabled { "on" } else { "off" });
    }
}

impl ProximitySensor for ConsolePlatform {
    fn set_enabled(&self, enabled: bool) {
        println!("  -> proximity sensing: {}", if enabled { "on" } else { "off" });
    }
}

impl AudioRouter for ConsolePlatform {
    fn set_route(&self, route: AudioRoute) {
        println!("  -> audio route: {}", route);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "proxcall=info".into()),
        )
        .init();

    let script = match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading script {}", path))?,
        None => BUILTIN_SCRIPT.to_string(),
    };

    let settings = ProximitySettings {
        auto_speaker_enabled: true,
        ..load_default_settings()
    };
    println!("=== Proximity Replay ===");
    println!(
        "auto speaker: {}, in-call only: {}, delay: {}ms\n",
        settings.auto_speaker_enabled, settings.in_call_only, settings.switch_delay_ms
    );

    let session = ProximitySession::with_platform(
        Platform::from_shared(Arc::new(ConsolePlatform)),
        Arc::new(StaticSettings(settings)),
    )?;

    for (index, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("line {}: not JSON", index + 1))?;

        if value["type"] == "wait" {
            let ms = value["ms"].as_u64().unwrap_or(0);
            println!("[wait {}ms]", ms);
            tokio::time::sleep(Duration::from_millis(ms)).await;
            continue;
        }

        let event: Event = serde_json::from_value(value)
            .with_context(|| format!("line {}: not an event", index + 1))?;
        println!("[{}] {:?}", event.topic(), event);
        session.apply(event);
    }

    session.teardown();
    println!("\nDone.");
    Ok(())
}
