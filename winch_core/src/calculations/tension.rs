//! # Tension & Base Torque Pass
//!
//! Fills the drivetrain-independent fields of every wrap row: suspended
//! load, and the torque the drum must react to hold it.
//!
//! The unrounded theoretical tension is kept alongside the 1-decimal display
//! value because the hydraulic power path divides by it and is sensitive to
//! rounding error. The per-motor split and reassembly
//! (`torque / (r1·r2·n) * r1·r2·n`) is an intentional idempotent round trip:
//! it establishes the per-motor-then-aggregate pattern both drivetrain
//! passes reuse.

use crate::config::WinchConfig;
use crate::units::{drum_torque_nm, non_zero, round1, tension_kgf};

use super::geometry::WrapRow;

/// Compute tension and drum torque for every row, in place.
///
/// Expects a sanitized config; gear ratios and the motor count are floored
/// at epsilon before dividing regardless.
pub fn apply_tension(rows: &mut [WrapRow], config: &WinchConfig) {
    let ratio = non_zero(config.total_gear_ratio());
    let motors = non_zero(config.motor_count);

    for row in rows.iter_mut() {
        let theoretical = tension_kgf(
            config.payload_kg,
            row.deployed_m,
            config.cable_weight_kg_per_m,
        );
        let required = round1(theoretical);
        let drum = drum_torque_nm(required, row.layer_diameter_in);
        let per_motor = drum / (ratio * motors);
        // Reassemble from the per-motor value rather than reusing `drum`
        let reassembled = per_motor * ratio * motors;

        row.theoretical_tension_kgf = theoretical;
        row.required_tension_kgf = required;
        row.torque_per_motor_nm = round1(per_motor);
        row.drum_torque_nm = round1(reassembled);
        // Same number under two names for different downstream consumers
        row.gearbox_torque_nm = row.drum_torque_nm;
    }
}
