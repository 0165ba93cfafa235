//! # Winchcalc CLI Application
//!
//! Terminal front end for the spooling calculator: prompts for the key
//! inputs (defaults come from the built-in electric preset), runs the
//! model, and prints the capacity summary, the per-layer table, and the
//! JSON model for downstream use.

use std::io::{self, BufRead, Write};

use winch_core::calculations::compute;
use winch_core::config::DrivetrainType;
use winch_core::project::BUILTIN_PRESETS;

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{} [{}]: ", prompt, default);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn prompt_drivetrain() -> DrivetrainType {
    print!("Drivetrain (electric/hydraulic) [electric]: ");
    if io::stdout().flush().is_err() {
        return DrivetrainType::Electric;
    }
    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return DrivetrainType::Electric;
    }
    DrivetrainType::from_selector(&input)
}

fn main() {
    println!("Winchcalc CLI - Drum Spooling & Drivetrain Calculator");
    println!("=====================================================");
    println!();

    let drivetrain = prompt_drivetrain();
    let base = match drivetrain {
        DrivetrainType::Electric => &BUILTIN_PRESETS[0],
        DrivetrainType::Hydraulic => &BUILTIN_PRESETS[1],
    };
    let mut config = base.config.clone();
    println!("Starting from preset: {}", base.name);
    println!();

    config.cable_diameter_in = prompt_f64("Cable diameter (in)", config.cable_diameter_in);
    config.operating_depth_m = prompt_f64("Operating depth (m)", config.operating_depth_m);
    config.dead_end_m = prompt_f64("Dead-end allowance (m)", config.dead_end_m);
    config.payload_kg = prompt_f64("Payload (kg)", config.payload_kg);
    config.cable_weight_kg_per_m = prompt_f64("Cable weight (kg/m)", config.cable_weight_kg_per_m);
    config.core_diameter_in = prompt_f64("Drum core diameter (in)", config.core_diameter_in);
    config.flange_diameter_in = prompt_f64("Flange diameter (in)", config.flange_diameter_in);
    config.flange_to_flange_in =
        prompt_f64("Flange-to-flange width (in)", config.flange_to_flange_in);

    println!();
    println!("Computing...");
    println!();

    let model = compute(&config);

    println!("═══════════════════════════════════════════════════════════");
    println!("  SPOOLING SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!("  Required length:  {:.1} m", model.summary.required_len_m);
    println!("  Drum capacity:    {:.1} m", model.summary.drum_capacity_m);
    println!(
        "  Layers / wraps:   {} / {} ({} wraps per layer{})",
        model.summary.layer_count,
        model.summary.wrap_count,
        model.meta.wraps_per_layer,
        if model.meta.wraps_per_layer_overridden {
            ", override"
        } else {
            ""
        }
    );
    if model.summary.capacity_exceeded {
        println!("  WARNING: drum capacity exceeded, spooling truncated at flange");
    }
    println!();

    match drivetrain {
        DrivetrainType::Electric => print_electric_table(&model),
        DrivetrainType::Hydraulic => print_hydraulic_table(&model),
    }

    println!();
    println!("JSON Output (for API/report use):");
    if let Ok(json) = serde_json::to_string_pretty(&model) {
        println!("{}", json);
    }
}

fn print_electric_table(model: &winch_core::ComputationModel) {
    println!("  ELECTRIC DRIVETRAIN, PER LAYER");
    println!(
        "  {:>5} {:>9} {:>10} {:>11} {:>10} {:>11} {:>11}",
        "layer", "dia (in)", "wraps", "tension", "rpm", "speed", "avail (kgf)"
    );
    for layer in &model.electric_layers {
        println!(
            "  {:>5} {:>9.2} {:>10} {:>11.1} {:>10.1} {:>11.2} {:>11.1}",
            layer.layer_no,
            layer.layer_diameter_in,
            layer.wrap_count,
            layer.required_tension_kgf,
            layer.achieved_rpm,
            layer.achieved_speed_m_min,
            layer.available_tension_kgf,
        );
    }
}

fn print_hydraulic_table(model: &winch_core::ComputationModel) {
    println!("  HYDRAULIC DRIVETRAIN, PER LAYER");
    println!(
        "  {:>5} {:>9} {:>10} {:>11} {:>10} {:>11} {:>11}",
        "layer", "dia (in)", "wraps", "tension", "psi", "speed", "avail (kgf)"
    );
    for layer in &model.hydraulic_layers {
        println!(
            "  {:>5} {:>9.2} {:>10} {:>11.1} {:>10.1} {:>11.2} {:>11.1}",
            layer.layer_no,
            layer.layer_diameter_in,
            layer.wrap_count,
            layer.required_tension_kgf,
            layer.required_pressure_psi,
            layer.achieved_speed_m_min,
            layer.available_tension_kgf,
        );
    }
}
