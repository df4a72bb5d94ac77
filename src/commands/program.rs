//! Build and inspect command handlers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::CommandResult;
use xbows_driver::dump;
use xbows_driver::ProgramConfig;
use xbows_program::{custom_program, decode_program, LightProgram};
use xbows_protocol::{hex_dump, SealedPacket};

fn print_packets(packets: &[SealedPacket], hex: bool) {
    for (i, pkt) in packets.iter().enumerate() {
        println!("{i:3}: {pkt}");
        if hex {
            for line in hex_dump(&pkt.to_bytes()).lines() {
                println!("     {line}");
            }
        }
    }
}

/// Assemble a config into packets, print them, and optionally save a dump
pub fn build(
    config: Option<PathBuf>,
    layer: Option<u8>,
    out: Option<&Path>,
    hex: bool,
) -> CommandResult {
    let path = config.unwrap_or_else(ProgramConfig::default_path);
    let config = ProgramConfig::load(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    let layer = layer.unwrap_or(config.layer);
    let program = config
        .into_program()
        .with_context(|| format!("invalid config {}", path.display()))?;

    let packets = custom_program(layer, &program)
        .with_context(|| format!("failed to assemble program for layer {layer}"))?;
    print_packets(&packets, hex);
    println!(
        "{} packets for layer {layer} ({} keys, {} flashlight programs)",
        packets.len(),
        program.keymap.len(),
        program.flashlights.len()
    );

    if let Some(out) = out {
        dump::write_dump(out, &packets)
            .with_context(|| format!("failed to write {}", out.display()))?;
        info!(path = %out.display(), "dump written");
        println!("Wrote {}", out.display());
    }
    Ok(())
}

fn describe_lights(name: &str, program: &LightProgram) {
    println!(
        "  {name}: {} animation frames, {} pattern frames",
        program.animation.len(),
        program.patterns.len()
    );
    for (i, frame) in program.animation.iter().enumerate() {
        let keys: Vec<&str> = frame.keys.enabled_keys().into_iter().map(|k| k.name()).collect();
        println!("    anim[{i}] {}", keys.join(" "));
    }
    for (i, frame) in program.patterns.iter().enumerate() {
        let keys: Vec<&str> = frame.keys.enabled_keys().into_iter().map(|k| k.name()).collect();
        println!(
            "    pattern[{i}] #{:02X}{:02X}{:02X} mode={} {}ms {}",
            frame.color.r,
            frame.color.g,
            frame.color.b,
            frame.mode,
            frame.duration_ms,
            keys.join(" ")
        );
    }
}

/// Verify a dump's checksums and print what it programs
pub fn inspect(file: &Path) -> CommandResult {
    let packets =
        dump::read_dump(file).with_context(|| format!("failed to read {}", file.display()))?;
    println!("{} packets, all checksums valid", packets.len());

    let decoded = decode_program(&packets).context("failed to decode program")?;
    let program = &decoded.program;
    let flashlight_set = program.flashlight_keys.iter().filter(|&&b| b != 0).count();

    println!("Layer: {} (lights {})", decoded.layer, decoded.light_layer);
    println!("Keymap: {} bindings", program.keymap.len());
    println!("Flashlight keys: {flashlight_set} non-zero bytes");
    println!("Light programs: {}", program.flashlights.len() + 1);
    describe_lights("custom lights", &program.custom_lights);
    for (i, flashlight) in program.flashlights.iter().enumerate() {
        describe_lights(&format!("flashlight {i}"), flashlight);
    }
    Ok(())
}
