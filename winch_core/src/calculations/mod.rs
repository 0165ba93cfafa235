//! # Spooling & Drivetrain Calculations
//!
//! The computational core of Winchcalc. One entry point, [`compute`], runs
//! the full pipeline:
//!
//! 1. [`geometry`] lays the cable onto the drum wrap by wrap;
//! 2. [`tension`] derives suspended load and drum torque for every wrap;
//! 3. [`electric`] and [`hydraulic`] augment the rows for whichever
//!    drivetrains are enabled (both may run at once);
//! 4. [`layers`] rolls the rows up per layer and projects the slim table
//!    views.
//!
//! The whole pipeline is pure and synchronous: no I/O, no shared state, no
//! caching. The same configuration always produces a bit-identical
//! [`ComputationModel`], so callers may invoke it concurrently and treat
//! every call as cheap and idempotent. Bad numeric input never raises; it
//! is sanitized to neutral defaults first (see [`WinchConfig::sanitized`]).

pub mod electric;
pub mod geometry;
pub mod hydraulic;
pub mod layers;
pub mod tension;

use serde::{Deserialize, Serialize};

use crate::config::{ElectricParams, HydraulicParams, WinchConfig};

// Re-export commonly used types
pub use geometry::{ElectricWrap, HydraulicWrap, SpoolMeta, SpoolSummary, WrapRow};
pub use layers::{
    ElectricLayerSummary, ElectricTableRow, HydraulicLayerSummary, HydraulicTableRow,
};

/// Complete output of one model invocation.
///
/// Constructed fresh by every [`compute`] call and never mutated afterwards;
/// the caller owns it exclusively. Renderers should read only the documented
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationModel {
    /// Sanitized configuration echo
    pub config: WinchConfig,
    /// Capacity summary
    pub summary: SpoolSummary,
    /// Derived geometry parameters
    pub meta: SpoolMeta,
    /// Full per-wrap sequence in spooling order
    pub rows: Vec<WrapRow>,
    /// Whether the electric pass ran
    pub electric_enabled: bool,
    /// Whether the hydraulic pass ran
    pub hydraulic_enabled: bool,
    /// Normalized electric parameters actually used
    pub electric_params: ElectricParams,
    /// Normalized hydraulic parameters actually used
    pub hydraulic_params: HydraulicParams,
    /// Per-layer electric roll-up, ascending by layer
    pub electric_layers: Vec<ElectricLayerSummary>,
    /// Per-layer hydraulic roll-up, ascending by layer
    pub hydraulic_layers: Vec<HydraulicLayerSummary>,
    /// Slim electric table rows in wrap order
    pub electric_table: Vec<ElectricTableRow>,
    /// Slim hydraulic table rows in wrap order
    pub hydraulic_table: Vec<HydraulicTableRow>,
}

/// Run the full spooling and drivetrain model for one configuration.
///
/// This is the only entry point the external collaborators (request
/// boundary, renderers, CLI) drive. It cannot fail: numeric input is
/// sanitized internally and a drum that cannot hold the required cable is
/// reported through [`SpoolSummary::capacity_exceeded`], not an error.
///
/// # Example
///
/// ```rust
/// use winch_core::calculations::compute;
/// use winch_core::config::WinchConfig;
///
/// let config = WinchConfig {
///     cable_diameter_in: 0.75,
///     operating_depth_m: 1000.0,
///     core_diameter_in: 24.0,
///     flange_diameter_in: 48.0,
///     flange_to_flange_in: 36.0,
///     packing_factor: 0.9,
///     payload_kg: 500.0,
///     cable_weight_kg_per_m: 1.2,
///     ..WinchConfig::default()
/// };
///
/// let model = compute(&config);
/// assert!(!model.rows.is_empty());
/// assert_eq!(model.rows[0].total_len_m, 1000.0);
/// ```
pub fn compute(config: &WinchConfig) -> ComputationModel {
    let config = config.sanitized();

    let (mut rows, summary, meta) = geometry::layer_geometry(&config);
    tension::apply_tension(&mut rows, &config);
    electric::apply_electric(&mut rows, &config);
    hydraulic::apply_hydraulic(&mut rows, &config);

    let electric_layers = layers::aggregate_electric(&rows, &config);
    let hydraulic_layers = layers::aggregate_hydraulic(&rows, &config);
    let electric_table = layers::electric_table(&rows);
    let hydraulic_table = layers::hydraulic_table(&rows);

    ComputationModel {
        electric_enabled: config.electric_enabled,
        hydraulic_enabled: config.hydraulic_enabled,
        electric_params: config.electric,
        hydraulic_params: config.hydraulic,
        config,
        summary,
        meta,
        rows,
        electric_layers,
        hydraulic_layers,
        electric_table,
        hydraulic_table,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ElectricParams, HydraulicParams};

    fn full_config() -> WinchConfig {
        WinchConfig {
            cable_diameter_in: 0.75,
            operating_depth_m: 2000.0,
            dead_end_m: 50.0,
            core_diameter_in: 24.0,
            flange_diameter_in: 48.0,
            flange_to_flange_in: 36.0,
            lebus_thickness_in: 0.5,
            packing_factor: 0.88,
            payload_kg: 2000.0,
            cable_weight_kg_per_m: 1.2,
            gear_ratio_1: 5.0,
            gear_ratio_2: 6.0,
            motor_count: 2.0,
            electric_enabled: true,
            hydraulic_enabled: true,
            electric: ElectricParams {
                motor_max_rpm: 1800.0,
                rated_power_hp: 150.0,
                efficiency: 0.94,
                motor_max_torque_nm: 900.0,
                gearbox_max_torque_nm: 30_000.0,
            },
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
    }

    #[test]
    fn test_compute_is_idempotent() {
        let config = full_config();
        let a = compute(&config);
        let b = compute(&config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_both_drivetrains_coexist() {
        let model = compute(&full_config());
        let row = &model.rows[0];
        assert!(row.electric.achieved_speed_m_min > 0.0);
        assert!(row.hydraulic.achieved_speed_m_min > 0.0);
        assert_eq!(model.electric_layers.len(), model.hydraulic_layers.len());
    }

    #[test]
    fn test_disabled_drivetrain_fields_are_zero() {
        let mut config = full_config();
        config.hydraulic_enabled = false;
        let model = compute(&config);
        for row in &model.rows {
            assert_eq!(row.hydraulic, HydraulicWrap::default());
        }
        assert!(model.rows.iter().any(|r| r.electric.achieved_rpm > 0.0));
    }

    #[test]
    fn test_model_echoes_sanitized_config() {
        let mut config = full_config();
        config.gear_ratio_1 = f64::NAN;
        let model = compute(&config);
        assert_eq!(model.config.gear_ratio_1, 1.0);
        assert_eq!(model.electric_params, model.config.electric);
    }

    #[test]
    fn test_tables_match_row_count() {
        let model = compute(&full_config());
        assert_eq!(model.electric_table.len(), model.rows.len());
        assert_eq!(model.hydraulic_table.len(), model.rows.len());
    }

    #[test]
    fn test_invariants_hold_end_to_end() {
        let model = compute(&full_config());
        for row in &model.rows {
            assert!((row.deployed_m + row.spooled_after_m - row.total_len_m).abs() < 1e-6);
            assert!(row.electric.achieved_speed_m_min >= 0.0);
            assert!(row.hydraulic.achieved_speed_m_min >= 0.0);
        }
    }

    #[test]
    fn test_hostile_config_cannot_panic() {
        let config = WinchConfig {
            cable_diameter_in: f64::NAN,
            operating_depth_m: f64::INFINITY,
            dead_end_m: -5.0,
            core_diameter_in: f64::NEG_INFINITY,
            flange_diameter_in: f64::NAN,
            flange_to_flange_in: -1.0,
            lebus_thickness_in: f64::NAN,
            packing_factor: -0.5,
            payload_kg: f64::NAN,
            cable_weight_kg_per_m: f64::INFINITY,
            gear_ratio_1: 0.0,
            gear_ratio_2: f64::NAN,
            motor_count: -2.0,
            ..WinchConfig::default()
        };
        let model = compute(&config);
        assert!(model.rows.is_empty());
        assert!(model.summary.required_len_m.is_finite());
        assert!(model.config.gear_ratio_2.is_finite());
        // And the model still serializes cleanly
        serde_json::to_string(&model).unwrap();
    }

    #[test]
    fn test_serialization_roundtrip() {
        let model = compute(&full_config());
        let json = serde_json::to_string_pretty(&model).unwrap();
        let roundtrip: ComputationModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, roundtrip);
    }
}
