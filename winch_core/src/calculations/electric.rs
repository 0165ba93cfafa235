//! # Electric Drivetrain Pass
//!
//! Augments each wrap row with the electric motor's torque demand, the two
//! speed limits (rated power vs. nameplate rpm), the achieved speed, and the
//! torque-limited available tension.
//!
//! Runs only when the electric drivetrain is enabled; otherwise every
//! electric field stays exactly 0. The pass is independent of the hydraulic
//! pass and both may populate the same rows.

use crate::config::WinchConfig;
use crate::units::{
    available_tension_kgf, drum_torque_nm, line_speed_m_per_min, non_zero, round1, round2,
    HP_TO_WATTS,
};

use super::geometry::{ElectricWrap, WrapRow};

/// Motor speed sustainable at `torque_nm` with `usable_power_w` of drive
/// power, from P = T·ω.
///
/// Zero usable power means the drive cannot turn at all; positive power
/// against zero torque is the no-load condition and is unbounded. The
/// caller is expected to min() the result against a finite cap before
/// formatting.
pub fn power_limited_rpm(usable_power_w: f64, torque_nm: f64) -> f64 {
    if usable_power_w <= 0.0 {
        0.0
    } else if torque_nm <= 0.0 {
        f64::INFINITY
    } else {
        usable_power_w / torque_nm * 60.0 / (2.0 * std::f64::consts::PI)
    }
}

/// Compute the electric fields for every row, in place.
pub fn apply_electric(rows: &mut [WrapRow], config: &WinchConfig) {
    if !config.electric_enabled {
        return;
    }
    let params = config.electric;
    let ratio = non_zero(config.total_gear_ratio());
    let motors = non_zero(config.motor_count);
    let usable_power_w = params.rated_power_hp * HP_TO_WATTS * params.efficiency;
    let rpm_cap = if params.motor_max_rpm > 0.0 {
        params.motor_max_rpm
    } else {
        f64::INFINITY
    };

    for row in rows.iter_mut() {
        let drum = drum_torque_nm(row.required_tension_kgf, row.layer_diameter_in);
        let motor_torque = drum / (ratio * motors);

        let power_rpm = power_limited_rpm(usable_power_w, motor_torque);
        let achieved_rpm = power_rpm.min(rpm_cap).max(0.0);

        let power_speed = line_speed_m_per_min(power_rpm, ratio, row.layer_diameter_in);
        let cap_speed = line_speed_m_per_min(rpm_cap, ratio, row.layer_diameter_in);
        let achieved_speed = power_speed.min(cap_speed).max(0.0);

        row.electric = ElectricWrap {
            motor_torque_nm: round2(motor_torque),
            power_limited_rpm: round1(power_rpm),
            gearbox_limited_rpm: round1(rpm_cap),
            achieved_rpm: round1(achieved_rpm),
            power_limited_speed_m_min: round2(power_speed),
            gearbox_limited_speed_m_min: round2(cap_speed),
            achieved_speed_m_min: round2(achieved_speed),
            available_tension_kgf: round1(available_tension_kgf(
                params.motor_max_torque_nm,
                ratio,
                motors,
                row.layer_diameter_in,
            )),
        };
    }
}
