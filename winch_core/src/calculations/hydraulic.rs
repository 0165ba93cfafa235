//! # Hydraulic Drivetrain Pass
//!
//! Augments each wrap row with the hydraulic circuit's pressure demand, the
//! flow- and power-limited speeds, the achieved speed with its drum-rpm
//! equivalents, the power actually consumed at that speed, and the
//! pressure-limited available tension.
//!
//! Runs only when the hydraulic drivetrain is enabled; otherwise every
//! hydraulic field stays exactly 0. Independent of the electric pass.

use crate::config::WinchConfig;
use crate::units::{
    drum_rpm_from_speed, drum_torque_nm, finite_or_zero, flow_gpm, line_speed_m_per_min, non_zero,
    pressure_for_torque_psi, round1, round2, rpm_from_flow, torque_from_pressure_nm,
    CC_PER_GALLON, GRAVITY_M_S2, HP_TO_WATTS, PSI_TO_PASCAL,
};

use super::geometry::{HydraulicWrap, WrapRow};

/// Line speed (m/min) the usable hydraulic input power can sustain against
/// the *unrounded* theoretical tension. Zero whenever either side is
/// non-positive; never non-finite.
pub fn power_limited_speed_m_min(usable_power_w: f64, theoretical_tension_kgf: f64) -> f64 {
    let force_n = theoretical_tension_kgf * GRAVITY_M_S2;
    if usable_power_w <= 0.0 || force_n <= 0.0 {
        return 0.0;
    }
    finite_or_zero(usable_power_w / force_n * 60.0).max(0.0)
}

/// Compute the hydraulic fields for every row, in place.
pub fn apply_hydraulic(rows: &mut [WrapRow], config: &WinchConfig) {
    if !config.hydraulic_enabled {
        return;
    }
    let params = config.hydraulic;
    let ratio = non_zero(config.total_gear_ratio());
    let motors = non_zero(config.motor_count);

    // Supply side is constant across the spooling range
    let pump_gpm = flow_gpm(params.pump_displacement_cc, params.pump_rpm);
    let total_gpm = pump_gpm * params.pump_count;
    let usable_power_w =
        params.pump_power_hp * HP_TO_WATTS * params.pump_efficiency * params.pump_count;
    let rpm_cap = if params.motor_max_rpm > 0.0 {
        params.motor_max_rpm
    } else {
        f64::INFINITY
    };
    let flow_rpm = rpm_from_flow(total_gpm / motors, params.motor_displacement_cc).min(rpm_cap);

    for row in rows.iter_mut() {
        let drum = drum_torque_nm(row.required_tension_kgf, row.layer_diameter_in);
        let motor_torque = drum / (ratio * motors);
        let pressure_psi = pressure_for_torque_psi(motor_torque, params.motor_displacement_cc);

        let flow_speed = line_speed_m_per_min(flow_rpm, ratio, row.layer_diameter_in);
        let power_speed = power_limited_speed_m_min(usable_power_w, row.theoretical_tension_kgf);
        let achieved_speed = power_speed.min(flow_speed).max(0.0);

        // Back-solve the flow needed to realize the achieved speed, capped
        // at what the pumps can actually deliver
        let achieved_drum_rpm = drum_rpm_from_speed(achieved_speed, row.layer_diameter_in);
        let motor_rpm_used = achieved_drum_rpm * ratio;
        let gpm_used = (flow_gpm(params.motor_displacement_cc, motor_rpm_used) * motors)
            .min(total_gpm);
        let q_m3_s = gpm_used * CC_PER_GALLON * 1e-6 / 60.0;
        let hydraulic_w = (pressure_psi * PSI_TO_PASCAL * q_m3_s).min(usable_power_w);
        let electric_w = hydraulic_w / non_zero(params.pump_efficiency);

        // Drum torque the relief pressure could produce, reflected back to
        // line pull at this layer
        let max_motor_torque =
            torque_from_pressure_nm(params.max_pressure_psi, params.motor_displacement_cc);
        let max_drum_torque = max_motor_torque * ratio * motors;
        let radius_m = non_zero(row.layer_diameter_in * crate::units::INCH_TO_METER / 2.0);
        let available = max_drum_torque / radius_m / GRAVITY_M_S2;

        row.hydraulic = HydraulicWrap {
            motor_torque_nm: round2(motor_torque),
            required_pressure_psi: round1(pressure_psi),
            pump_flow_gpm: round2(pump_gpm),
            total_flow_gpm: round2(total_gpm),
            flow_limited_rpm: round1(flow_rpm),
            flow_limited_speed_m_min: round2(flow_speed),
            power_limited_speed_m_min: round2(power_speed),
            achieved_speed_m_min: round2(achieved_speed),
            flow_limited_drum_rpm: round2(drum_rpm_from_speed(flow_speed, row.layer_diameter_in)),
            power_limited_drum_rpm: round2(drum_rpm_from_speed(power_speed, row.layer_diameter_in)),
            achieved_drum_rpm: round2(achieved_drum_rpm),
            consumed_hydraulic_kw: round2(hydraulic_w / 1000.0),
            consumed_electric_kw: round2(electric_w / 1000.0),
            available_tension_kgf: round1(available),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::layer_geometry;
    use crate::calculations::tension::apply_tension;
    use crate::config::HydraulicParams;

    fn test_config() -> WinchConfig {
        WinchConfig {
            cable_diameter_in: 1.0,
            operating_depth_m: 800.0,
            dead_end_m: 20.0,
            core_diameter_in: 20.0,
            flange_diameter_in: 60.0,
            flange_to_flange_in: 30.0,
            packing_factor: 0.9,
            payload_kg: 1500.0,
            cable_weight_kg_per_m: 1.5,
            gear_ratio_1: 5.0,
            gear_ratio_2: 6.0,
            motor_count: 2.0,
            electric_enabled: false,
            hydraulic_enabled: true,
            hydraulic: HydraulicParams {
                pump_count: 2.0,
                pump_power_hp: 200.0,
                pump_efficiency: 0.85,
                pump_rpm: 1800.0,
                pump_displacement_cc: 125.0,
                max_pressure_psi: 5000.0,
                motor_displacement_cc: 250.0,
                motor_max_rpm: 2400.0,
            },
            ..WinchConfig::default()
        }
        .sanitized()
    }

    fn augmented_rows(config: &WinchConfig) -> Vec<WrapRow> {
        let (mut rows, _, _) = layer_geometry(config);
        apply_tension(&mut rows, config);
        apply_hydraulic(&mut rows, config);
        rows
    }

    #[test]
    fn test_disabled_pass_leaves_zeros() {
        let mut config = test_config();
        config.hydraulic_enabled = false;
        for row in augmented_rows(&config) {
            assert_eq!(row.hydraulic, HydraulicWrap::default());
        }
    }

    #[test]
    fn test_supply_side_is_constant() {
        let config = test_config();
        let rows = augmented_rows(&config);
        let expected_pump = round2(flow_gpm(125.0, 1800.0));
        for row in &rows {
            assert_eq!(row.hydraulic.pump_flow_gpm, expected_pump);
            assert_eq!(row.hydraulic.total_flow_gpm, round2(expected_pump * 2.0));
            assert_eq!(row.hydraulic.flow_limited_rpm, rows[0].hydraulic.flow_limited_rpm);
        }
    }

    #[test]
    fn test_achieved_speed_is_min_of_limits() {
        let config = test_config();
        for row in augmented_rows(&config) {
            let h = row.hydraulic;
            assert!(h.achieved_speed_m_min <= h.power_limited_speed_m_min + 1e-9);
            assert!(h.achieved_speed_m_min <= h.flow_limited_speed_m_min + 1e-9);
            let matches_power = (h.achieved_speed_m_min - h.power_limited_speed_m_min).abs() < 1e-9;
            let matches_flow = (h.achieved_speed_m_min - h.flow_limited_speed_m_min).abs() < 1e-9;
            assert!(matches_power || matches_flow);
            assert!(h.achieved_speed_m_min >= 0.0);
        }
    }

    #[test]
    fn test_power_limited_speed_guards() {
        assert_eq!(power_limited_speed_m_min(0.0, 1000.0), 0.0);
        assert_eq!(power_limited_speed_m_min(-5.0, 1000.0), 0.0);
        assert_eq!(power_limited_speed_m_min(10_000.0, 0.0), 0.0);

        // 10 kW against 1000 kgf: v = P/F * 60
        let expected = 10_000.0 / (1000.0 * GRAVITY_M_S2) * 60.0;
        assert!((power_limited_speed_m_min(10_000.0, 1000.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_solves_motor_torque() {
        let config = test_config();
        for row in augmented_rows(&config) {
            let drum = drum_torque_nm(row.required_tension_kgf, row.layer_diameter_in);
            let motor_torque = drum / (config.total_gear_ratio() * config.motor_count);
            let expected = round1(pressure_for_torque_psi(motor_torque, 250.0));
            assert_eq!(row.hydraulic.required_pressure_psi, expected);
            assert!(row.hydraulic.required_pressure_psi >= 0.0);
        }
    }

    #[test]
    fn test_consumed_power_capped_at_usable() {
        let config = test_config();
        let usable_kw =
            200.0 * HP_TO_WATTS * 0.85 * 2.0 / 1000.0;
        for row in augmented_rows(&config) {
            assert!(row.hydraulic.consumed_hydraulic_kw <= usable_kw + 0.01);
            // Electrical input is never less than the hydraulic output
            assert!(row.hydraulic.consumed_electric_kw >= row.hydraulic.consumed_hydraulic_kw);
        }
    }

    #[test]
    fn test_flow_limited_rpm_capped_by_motor_max() {
        let mut config = test_config();
        config.hydraulic.motor_max_rpm = 10.0;
        let config = config.sanitized();
        for row in augmented_rows(&config) {
            assert!(row.hydraulic.flow_limited_rpm <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_available_tension_at_relief_pressure() {
        let config = test_config();
        let rows = augmented_rows(&config);
        let row = &rows[0];
        let max_motor = torque_from_pressure_nm(5000.0, 250.0);
        let expected = round1(
            max_motor * 30.0 * 2.0
                / (row.layer_diameter_in * crate::units::INCH_TO_METER / 2.0)
                / GRAVITY_M_S2,
        );
        assert_eq!(row.hydraulic.available_tension_kgf, expected);
    }

    #[test]
    fn test_drum_rpm_consistent_with_speed() {
        let config = test_config();
        for row in augmented_rows(&config) {
            let h = row.hydraulic;
            let expected =
                round2(drum_rpm_from_speed(h.achieved_speed_m_min, row.layer_diameter_in));
            // achieved_drum_rpm was derived before rounding the speed, so
            // allow one rounding step of slack
            assert!((h.achieved_drum_rpm - expected).abs() < 0.05);
        }
    }
}
