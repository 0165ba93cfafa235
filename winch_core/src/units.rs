//! # Units & Physical Constants
//!
//! Conversion constants and the small pure formulas shared by the geometry
//! engine and both drivetrain passes. Everything here is a stateless
//! `f64 -> f64` (or small-arity) function; no struct carries state.
//!
//! ## Design Philosophy
//!
//! We use plain `f64` values with unit-suffixed names rather than a full
//! units library because:
//! - The calculator uses a small, fixed set of mixed units (drum geometry in
//!   inches, lengths in meters, tension in kgf, pressure in psi)
//! - We want JSON serialization to be clean (just numbers)
//! - Minimal runtime overhead
//!
//! ## Numeric Safety
//!
//! Formulas in this module never panic and never emit NaN into formatted
//! output: denominators are floored at [`EPSILON`] and the rounding helpers
//! coerce non-finite intermediates to zero. See [`positive_or`] for the
//! sanitizing combinator applied to configuration inputs.
//!
//! ## Example
//!
//! ```rust
//! use winch_core::units::{tension_kgf, round1};
//!
//! // 500 kg payload, 1000 m of 1.2 kg/m cable paid out
//! let t = tension_kgf(500.0, 1000.0, 1.2);
//! assert_eq!(round1(t), 1700.0);
//! ```

use std::f64::consts::PI;

// ============================================================================
// Physical Constants
// ============================================================================

/// Standard gravity (m/s²)
pub const GRAVITY_M_S2: f64 = 9.80665;

/// Mechanical horsepower to watts
pub const HP_TO_WATTS: f64 = 745.699_872;

/// Pounds per square inch to pascals
pub const PSI_TO_PASCAL: f64 = 6_894.757_293_168;

/// Cubic centimeters per US gallon
pub const CC_PER_GALLON: f64 = 3_785.411_784;

/// Inches to meters
pub const INCH_TO_METER: f64 = 0.0254;

/// Floor applied to every gear-ratio, motor-count, displacement and
/// efficiency denominator before dividing.
pub const EPSILON: f64 = 1e-6;

// ============================================================================
// Sanitizing Combinators
// ============================================================================

/// Return `value` if it is finite and strictly positive, otherwise `default`.
///
/// This is the single input-sanitizing combinator used by
/// [`crate::config::WinchConfig::sanitized`]: ratios and counts default to 1,
/// geometry/power/capacity terms default to 0, so bad input degrades the
/// outputs toward zero instead of failing.
pub fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

/// Coerce a non-finite intermediate to 0.0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Floor a denominator at [`EPSILON`].
pub fn non_zero(value: f64) -> f64 {
    if value.is_finite() && value > EPSILON {
        value
    } else {
        EPSILON
    }
}

/// Round to one decimal place; non-finite values become 0.0.
pub fn round1(value: f64) -> f64 {
    (finite_or_zero(value) * 10.0).round() / 10.0
}

/// Round to two decimal places; non-finite values become 0.0.
pub fn round2(value: f64) -> f64 {
    (finite_or_zero(value) * 100.0).round() / 100.0
}

// ============================================================================
// Length / Geometry Conversions
// ============================================================================

/// Convert a drum diameter in inches to meters.
pub fn inches_to_meters(inches: f64) -> f64 {
    inches * INCH_TO_METER
}

/// Circumference in meters of a layer diameter given in inches.
pub fn layer_circumference_m(layer_diameter_in: f64) -> f64 {
    PI * inches_to_meters(layer_diameter_in)
}

// ============================================================================
// Tension & Torque
// ============================================================================

/// Theoretical line tension in kgf: payload plus the weight of the
/// deployed cable. Spooled cable contributes nothing.
pub fn tension_kgf(payload_kg: f64, deployed_m: f64, cable_kg_per_m: f64) -> f64 {
    payload_kg + deployed_m * cable_kg_per_m
}

/// Torque at the drum (N·m) to hold `tension_kgf` at the given layer.
///
/// Tension is converted to newtons and applied at the layer radius.
pub fn drum_torque_nm(tension_kgf: f64, layer_diameter_in: f64) -> f64 {
    tension_kgf * GRAVITY_M_S2 * inches_to_meters(layer_diameter_in) / 2.0
}

/// Maximum sustainable line tension (kgf) at a layer, given the motor's
/// rated torque reflected through both gear stages and the motor count.
pub fn available_tension_kgf(
    max_motor_torque_nm: f64,
    gear_ratio: f64,
    motor_count: f64,
    layer_diameter_in: f64,
) -> f64 {
    let radius_m = non_zero(inches_to_meters(layer_diameter_in) / 2.0);
    max_motor_torque_nm * gear_ratio * motor_count / radius_m / GRAVITY_M_S2
}

// ============================================================================
// Hydraulic Conversions
// ============================================================================

/// Torque (N·m) produced by a hydraulic motor at `pressure_psi` with the
/// given displacement (cc/rev): T = ΔP · D / 2π.
pub fn torque_from_pressure_nm(pressure_psi: f64, displacement_cc: f64) -> f64 {
    pressure_psi * PSI_TO_PASCAL * displacement_cc * 1e-6 / (2.0 * PI)
}

/// Pressure (psi) a hydraulic motor needs to produce `torque_nm`, the
/// inverse of [`torque_from_pressure_nm`]. Clamped to ≥ 0 and finite.
pub fn pressure_for_torque_psi(torque_nm: f64, displacement_cc: f64) -> f64 {
    let pa = torque_nm * 2.0 * PI / non_zero(displacement_cc * 1e-6);
    finite_or_zero(pa / PSI_TO_PASCAL).max(0.0)
}

/// Pump delivery in US gpm for a displacement (cc/rev) at `rpm`.
pub fn flow_gpm(displacement_cc: f64, rpm: f64) -> f64 {
    displacement_cc * rpm / CC_PER_GALLON
}

/// Motor speed (rpm) realized by `gpm` through a displacement (cc/rev),
/// the inverse of [`flow_gpm`].
pub fn rpm_from_flow(gpm: f64, displacement_cc: f64) -> f64 {
    gpm * CC_PER_GALLON / non_zero(displacement_cc)
}

// ============================================================================
// Speed Conversions
// ============================================================================

/// Line speed (m/min) for a motor turning at `motor_rpm` through a total
/// gear reduction onto a layer of the given diameter: drum rpm times
/// circumference.
pub fn line_speed_m_per_min(motor_rpm: f64, gear_ratio: f64, layer_diameter_in: f64) -> f64 {
    motor_rpm / non_zero(gear_ratio) * layer_circumference_m(layer_diameter_in)
}

/// Drum speed (rpm) equivalent to a line speed (m/min) at a layer.
pub fn drum_rpm_from_speed(speed_m_per_min: f64, layer_diameter_in: f64) -> f64 {
    speed_m_per_min / non_zero(layer_circumference_m(layer_diameter_in))
}
