//! # Drum Spooling Geometry Engine
//!
//! Lays cable onto the drum wrap by wrap, layer by layer, until the required
//! length (operating depth + dead end) is accounted for or the flange
//! diameter is reached.
//!
//! ## Layering Model
//!
//! - The lebus liner sits under the first layer, so the effective core
//!   diameter is the nominal core plus twice the liner thickness.
//! - The first layer's diameter is the effective core plus one cable
//!   diameter (cable centerline).
//! - Each further layer grows by twice the cable diameter scaled by the
//!   packing factor: cable nests into the grooves of the layer below.
//! - One wrap adds the circumference at the current layer diameter; the
//!   final wrap is partial so the spooled length never overshoots.
//!
//! Running out of drum is not an error: the row sequence is truncated at the
//! flange and [`SpoolSummary::capacity_exceeded`] is set.

use serde::{Deserialize, Serialize};

use crate::config::WinchConfig;
use crate::units::{layer_circumference_m, EPSILON};

/// Length comparisons tolerance (m).
const LEN_TOL: f64 = 1e-9;

/// Hard stop on layer count for degenerate geometry, applied to both the
/// spooling loop and the capacity scan.
const MAX_CAPACITY_LAYERS: u32 = 10_000;

/// Electric pass outputs for one wrap. All zero when electric is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ElectricWrap {
    /// Torque each motor must produce (N·m, 2 decimals)
    pub motor_torque_nm: f64,
    /// Motor speed the rated power can sustain at this torque (rpm, 1 decimal)
    pub power_limited_rpm: f64,
    /// Nameplate/gearbox speed cap (rpm, 1 decimal; 0 when uncapped)
    pub gearbox_limited_rpm: f64,
    /// min(power-limited, gearbox-limited), floored at 0 (rpm, 1 decimal)
    pub achieved_rpm: f64,
    /// Line speed at the power-limited rpm (m/min)
    pub power_limited_speed_m_min: f64,
    /// Line speed at the gearbox-limited rpm (m/min)
    pub gearbox_limited_speed_m_min: f64,
    /// min of the two speeds, clamped to >= 0 (m/min)
    pub achieved_speed_m_min: f64,
    /// Maximum sustainable load at this layer (kgf, 1 decimal)
    pub available_tension_kgf: f64,
}

/// Hydraulic pass outputs for one wrap. All zero when hydraulic is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HydraulicWrap {
    /// Torque each hydraulic motor must produce (N·m, 2 decimals)
    pub motor_torque_nm: f64,
    /// Pressure needed for that torque (psi, 1 decimal)
    pub required_pressure_psi: f64,
    /// Delivery of one pump string (gpm)
    pub pump_flow_gpm: f64,
    /// Delivery of all pump strings (gpm)
    pub total_flow_gpm: f64,
    /// Motor speed the available flow can sustain (rpm, 1 decimal)
    pub flow_limited_rpm: f64,
    /// Line speed at the flow-limited rpm (m/min)
    pub flow_limited_speed_m_min: f64,
    /// Line speed the usable hydraulic power can sustain (m/min)
    pub power_limited_speed_m_min: f64,
    /// min(power-limited, flow-limited), clamped to >= 0 (m/min)
    pub achieved_speed_m_min: f64,
    /// Drum rpm equivalent of the flow-limited speed
    pub flow_limited_drum_rpm: f64,
    /// Drum rpm equivalent of the power-limited speed
    pub power_limited_drum_rpm: f64,
    /// Drum rpm equivalent of the achieved speed
    pub achieved_drum_rpm: f64,
    /// Hydraulic power consumed at the achieved speed (kW)
    pub consumed_hydraulic_kw: f64,
    /// Equivalent electrical input power via pump efficiency (kW)
    pub consumed_electric_kw: f64,
    /// Pressure-limited maximum load at this layer (kgf, 1 decimal)
    pub available_tension_kgf: f64,
}

/// One cable wrap on the drum.
///
/// Geometry fields are produced by [`layer_geometry`]; tension/torque and the
/// drivetrain substructures are filled in by the performance passes. For
/// every row `deployed_m + spooled_after_m == total_len_m` within floating
/// tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrapRow {
    /// Layer this wrap belongs to (1-based)
    pub layer_no: u32,
    /// Global wrap number (1-based, monotonic)
    pub wrap_no: u32,
    /// Cable centerline diameter at this layer (in); constant per layer
    pub layer_diameter_in: f64,
    /// Cable length this wrap adds to the drum (m)
    pub wrap_len_m: f64,
    /// Cumulative spooled length before this wrap (m)
    pub spooled_before_m: f64,
    /// Cumulative spooled length after this wrap (m)
    pub spooled_after_m: f64,
    /// Cable paid out when this wrap is the next to come off (m)
    pub deployed_m: f64,
    /// Total cable length the drum must hold (m); identical on every row
    pub total_len_m: f64,

    /// Unrounded suspended load: payload + deployed cable weight (kgf)
    pub theoretical_tension_kgf: f64,
    /// Display tension, theoretical rounded to 1 decimal (kgf)
    pub required_tension_kgf: f64,
    /// Drum torque split across gear train and motors (N·m, 1 decimal)
    pub torque_per_motor_nm: f64,
    /// Torque required at the drum (N·m, 1 decimal)
    pub drum_torque_nm: f64,
    /// Same quantity as `drum_torque_nm`, named for the gearbox check
    pub gearbox_torque_nm: f64,

    /// Electric pass outputs
    pub electric: ElectricWrap,
    /// Hydraulic pass outputs
    pub hydraulic: HydraulicWrap,
}

/// Capacity summary for one spooling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SpoolSummary {
    /// Length the drum must hold: operating depth + dead end (m)
    pub required_len_m: f64,
    /// Length actually laid onto the drum (m)
    pub spooled_len_m: f64,
    /// Length the drum could hold up to the flange (m)
    pub drum_capacity_m: f64,
    /// Number of layers used
    pub layer_count: u32,
    /// Number of wraps used
    pub wrap_count: u32,
    /// True when the flange was reached before the required length fit
    pub capacity_exceeded: bool,
}

/// Echo of the derived geometry parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SpoolMeta {
    /// Wraps per layer actually used
    pub wraps_per_layer: u32,
    /// True when the override supplied in the config was used
    pub wraps_per_layer_overridden: bool,
    /// Core diameter including the lebus liner (in)
    pub effective_core_diameter_in: f64,
}

/// Diameter of the first cable layer (in).
fn first_layer_diameter_in(effective_core_in: f64, cable_in: f64) -> f64 {
    effective_core_in + cable_in
}

/// Per-layer diameter growth (in).
fn layer_growth_in(cable_in: f64, packing_factor: f64) -> f64 {
    2.0 * cable_in * packing_factor
}

/// Wraps per layer: explicit override, else floor(width / cable diameter),
/// never less than 1.
fn wraps_per_layer(config: &WinchConfig) -> (u32, bool) {
    if let Some(n) = config.wraps_per_layer_override {
        return (n.max(1), true);
    }
    let computed = if config.cable_diameter_in > EPSILON {
        (config.flange_to_flange_in / config.cable_diameter_in).floor() as u32
    } else {
        1
    };
    (computed.max(1), false)
}

/// Does a layer at this centerline diameter still fit inside the flange?
fn fits_inside_flange(layer_diameter_in: f64, cable_in: f64, flange_in: f64) -> bool {
    layer_diameter_in + cable_in <= flange_in + EPSILON
}

/// Total length the drum can hold before the flange is reached (m).
fn drum_capacity_m(config: &WinchConfig, wraps: u32, effective_core_in: f64) -> f64 {
    let cable = config.cable_diameter_in;
    let growth = layer_growth_in(cable, config.packing_factor);
    let mut diameter = first_layer_diameter_in(effective_core_in, cable);
    let mut capacity = 0.0;
    let mut layers = 0;
    while fits_inside_flange(diameter, cable, config.flange_diameter_in) {
        let circumference = layer_circumference_m(diameter);
        if circumference <= EPSILON {
            break;
        }
        capacity += circumference * wraps as f64;
        layers += 1;
        // Zero growth means there is no second layer to climb to
        if growth <= EPSILON || layers >= MAX_CAPACITY_LAYERS {
            break;
        }
        diameter += growth;
    }
    capacity
}

/// Lay the required cable length onto the drum.
///
/// Rows are emitted strictly in spooling order (ascending wrap number,
/// ascending or held layer number); the tension/torque and drivetrain fields
/// of each row are zero and are filled in by the performance passes.
///
/// Expects a sanitized config (see [`WinchConfig::sanitized`]); degenerate
/// geometry terminates with the capacity flag set rather than spinning.
pub fn layer_geometry(config: &WinchConfig) -> (Vec<WrapRow>, SpoolSummary, SpoolMeta) {
    let cable = config.cable_diameter_in;
    let total = config.required_cable_len_m();
    let effective_core = config.core_diameter_in + 2.0 * config.lebus_thickness_in;
    let (wraps, overridden) = wraps_per_layer(config);
    let growth = layer_growth_in(cable, config.packing_factor);

    let mut rows: Vec<WrapRow> = Vec::new();
    let mut layer_diameter = first_layer_diameter_in(effective_core, cable);
    let mut layer_no: u32 = 1;
    let mut wrap_no: u32 = 0;
    let mut wrap_in_layer: u32 = 0;
    let mut spooled = 0.0;
    let mut capacity_exceeded = false;

    while spooled + LEN_TOL < total {
        if wrap_in_layer == wraps {
            // Same stopping rule as `drum_capacity_m`: a drum that cannot
            // grow another layer is out of capacity, not an infinite spool
            if growth <= EPSILON || layer_no >= MAX_CAPACITY_LAYERS {
                capacity_exceeded = true;
                break;
            }
            layer_no += 1;
            wrap_in_layer = 0;
            layer_diameter += growth;
        }
        if !fits_inside_flange(layer_diameter, cable, config.flange_diameter_in) {
            capacity_exceeded = true;
            break;
        }
        let circumference = layer_circumference_m(layer_diameter);
        if circumference <= EPSILON {
            // Zero-size drum cannot take up any length
            capacity_exceeded = true;
            break;
        }
        let wrap_len = circumference.min(total - spooled);
        wrap_no += 1;
        wrap_in_layer += 1;
        rows.push(WrapRow {
            layer_no,
            wrap_no,
            layer_diameter_in: layer_diameter,
            wrap_len_m: wrap_len,
            spooled_before_m: spooled,
            spooled_after_m: spooled + wrap_len,
            deployed_m: total - (spooled + wrap_len),
            total_len_m: total,
            theoretical_tension_kgf: 0.0,
            required_tension_kgf: 0.0,
            torque_per_motor_nm: 0.0,
            drum_torque_nm: 0.0,
            gearbox_torque_nm: 0.0,
            electric: ElectricWrap::default(),
            hydraulic: HydraulicWrap::default(),
        });
        spooled += wrap_len;
    }

    let summary = SpoolSummary {
        required_len_m: total,
        spooled_len_m: spooled,
        drum_capacity_m: drum_capacity_m(config, wraps, effective_core),
        layer_count: rows.last().map(|r| r.layer_no).unwrap_or(0),
        wrap_count: wrap_no,
        capacity_exceeded,
    };
    let meta = SpoolMeta {
        wraps_per_layer: wraps,
        wraps_per_layer_overridden: overridden,
        effective_core_diameter_in: effective_core,
    };
    (rows, summary, meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WinchConfig {
        WinchConfig {
            cable_diameter_in: 1.0,
            operating_depth_m: 500.0,
            dead_end_m: 20.0,
            core_diameter_in: 20.0,
            flange_diameter_in: 40.0,
            flange_to_flange_in: 30.0,
            lebus_thickness_in: 0.5,
            packing_factor: 0.9,
            payload_kg: 1000.0,
            cable_weight_kg_per_m: 1.0,
            ..WinchConfig::default()
        }
        .sanitized()
    }

    #[test]
    fn test_spooled_plus_deployed_is_total() {
        let (rows, _, _) = layer_geometry(&test_config());
        assert!(!rows.is_empty());
        for row in &rows {
            assert!((row.deployed_m + row.spooled_after_m - row.total_len_m).abs() < 1e-6);
            assert!((row.spooled_after_m - row.spooled_before_m - row.wrap_len_m).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spooled_monotonic_deployed_antitonic() {
        let (rows, _, _) = layer_geometry(&test_config());
        for pair in rows.windows(2) {
            assert!(pair[1].spooled_after_m >= pair[0].spooled_after_m);
            assert!(pair[1].deployed_m <= pair[0].deployed_m);
            assert_eq!(pair[1].wrap_no, pair[0].wrap_no + 1);
            assert!(pair[1].layer_no >= pair[0].layer_no);
        }
    }

    #[test]
    fn test_layer_diameter_strictly_increasing() {
        let (rows, _, _) = layer_geometry(&test_config());
        let mut last: Option<(u32, f64)> = None;
        for row in &rows {
            if let Some((layer, dia)) = last {
                if row.layer_no != layer {
                    assert!(row.layer_diameter_in > dia);
                } else {
                    assert_eq!(row.layer_diameter_in, dia);
                }
            }
            last = Some((row.layer_no, row.layer_diameter_in));
        }
    }

    #[test]
    fn test_wraps_per_layer_computed() {
        let (_, _, meta) = layer_geometry(&test_config());
        // floor(30 / 1.0) = 30
        assert_eq!(meta.wraps_per_layer, 30);
        assert!(!meta.wraps_per_layer_overridden);
    }

    #[test]
    fn test_wraps_per_layer_override_wins() {
        let mut config = test_config();
        config.wraps_per_layer_override = Some(12);
        let (rows, _, meta) = layer_geometry(&config);
        assert_eq!(meta.wraps_per_layer, 12);
        assert!(meta.wraps_per_layer_overridden);
        let layer1: Vec<_> = rows.iter().filter(|r| r.layer_no == 1).collect();
        assert_eq!(layer1.len(), 12);
    }

    #[test]
    fn test_effective_core_includes_liner() {
        let (rows, _, meta) = layer_geometry(&test_config());
        assert_eq!(meta.effective_core_diameter_in, 21.0);
        // first layer lies one cable diameter above the effective core
        assert_eq!(rows[0].layer_diameter_in, 22.0);
    }

    #[test]
    fn test_final_wrap_is_partial() {
        let (rows, summary, _) = layer_geometry(&test_config());
        let last = rows.last().unwrap();
        assert!((last.spooled_after_m - summary.required_len_m).abs() < 1e-9);
        assert!(last.deployed_m.abs() < 1e-9);
        assert!(last.wrap_len_m <= layer_circumference_m(last.layer_diameter_in) + 1e-9);
    }

    #[test]
    fn test_capacity_exceeded_truncates_and_flags() {
        let mut config = test_config();
        config.operating_depth_m = 1.0e6;
        let (rows, summary, _) = layer_geometry(&config);
        assert!(summary.capacity_exceeded);
        assert!(summary.spooled_len_m < summary.required_len_m);
        assert!((summary.spooled_len_m - summary.drum_capacity_m).abs() < 1e-6);
        // every emitted row still fits inside the flange
        for row in &rows {
            assert!(row.layer_diameter_in + config.cable_diameter_in <= config.flange_diameter_in + 1e-9);
        }
    }

    #[test]
    fn test_degenerate_geometry_terminates() {
        let config = WinchConfig {
            operating_depth_m: 100.0,
            ..WinchConfig::default()
        }
        .sanitized();
        let (rows, summary, _) = layer_geometry(&config);
        assert!(rows.is_empty());
        assert!(summary.capacity_exceeded);
    }

    #[test]
    fn test_zero_cable_diameter_cannot_layer_up() {
        let mut config = test_config();
        config.cable_diameter_in = 0.0;
        let config = config.sanitized();
        let (rows, summary, meta) = layer_geometry(&config);
        // wraps-per-layer falls back to 1 and there is no second layer to
        // climb to, so exactly one wrap fits and the drum is out of capacity
        assert_eq!(meta.wraps_per_layer, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(summary.layer_count, 1);
        assert!(summary.capacity_exceeded);
        assert!(summary.spooled_len_m <= summary.drum_capacity_m + 1e-9);
    }

    #[test]
    fn test_zero_required_length_yields_no_rows() {
        let mut config = test_config();
        config.operating_depth_m = 0.0;
        config.dead_end_m = 0.0;
        let (rows, summary, _) = layer_geometry(&config);
        assert!(rows.is_empty());
        assert!(!summary.capacity_exceeded);
        assert_eq!(summary.wrap_count, 0);
    }

    #[test]
    fn test_capacity_larger_than_requirement_for_small_depth() {
        let (_, summary, _) = layer_geometry(&test_config());
        assert!(!summary.capacity_exceeded);
        assert!(summary.drum_capacity_m >= summary.required_len_m);
    }
}
