//! # Winch Configuration
//!
//! Input types for the spooling model: drum and cable geometry, payload,
//! gear train, and the electric/hydraulic drivetrain parameter blocks.
//!
//! All fields are plain numbers so the JSON representation stays flat and
//! predictable. The engine never computes on a raw config: [`WinchConfig::sanitized`]
//! replaces every non-finite or non-positive value with a documented neutral
//! default (1 for ratios/counts/packing, 0 for geometry, power and capacity
//! terms) so that bad input degrades the outputs toward zero instead of
//! producing NaN cascades or panics.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "cable_diameter_in": 0.75,
//!   "operating_depth_m": 3000.0,
//!   "dead_end_m": 50.0,
//!   "core_diameter_in": 24.0,
//!   "flange_diameter_in": 48.0,
//!   "flange_to_flange_in": 36.0,
//!   "lebus_thickness_in": 0.5,
//!   "packing_factor": 0.88,
//!   "wraps_per_layer_override": null,
//!   "payload_kg": 2000.0,
//!   "cable_weight_kg_per_m": 1.2,
//!   "gear_ratio_1": 5.0,
//!   "gear_ratio_2": 6.0,
//!   "motor_count": 2.0,
//!   "electric_enabled": true,
//!   "hydraulic_enabled": false,
//!   "electric": {
//!     "motor_max_rpm": 1800.0,
//!     "rated_power_hp": 150.0,
//!     "efficiency": 0.94,
//!     "motor_max_torque_nm": 900.0,
//!     "gearbox_max_torque_nm": 30000.0
//!   },
//!   "hydraulic": {
//!     "pump_count": 2.0,
//!     "pump_power_hp": 200.0,
//!     "pump_efficiency": 0.85,
//!     "pump_rpm": 1800.0,
//!     "pump_displacement_cc": 125.0,
//!     "max_pressure_psi": 5000.0,
//!     "motor_displacement_cc": 250.0,
//!     "motor_max_rpm": 2400.0
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::units::positive_or;

/// Which drivetrain family a request wants rendered.
///
/// The engine itself can run both passes at once; this selector only drives
/// the request boundary (which parameter block is required) and downstream
/// table/report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrivetrainType {
    #[default]
    Electric,
    Hydraulic,
}

impl DrivetrainType {
    /// Parse a selector string; anything other than `"hydraulic"` falls back
    /// to [`DrivetrainType::Electric`].
    pub fn from_selector(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "hydraulic" => DrivetrainType::Hydraulic,
            _ => DrivetrainType::Electric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrivetrainType::Electric => "electric",
            DrivetrainType::Hydraulic => "hydraulic",
        }
    }
}

/// Electric drivetrain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricParams {
    /// Nameplate maximum motor speed (rpm); 0 means uncapped
    pub motor_max_rpm: f64,
    /// Rated motor power (hp)
    pub rated_power_hp: f64,
    /// Drive efficiency, 0..=1
    pub efficiency: f64,
    /// Rated motor torque (N·m), used for available tension
    pub motor_max_torque_nm: f64,
    /// Gearbox torque rating (N·m)
    pub gearbox_max_torque_nm: f64,
}

impl Default for ElectricParams {
    fn default() -> Self {
        ElectricParams {
            motor_max_rpm: 0.0,
            rated_power_hp: 0.0,
            efficiency: 1.0,
            motor_max_torque_nm: 0.0,
            gearbox_max_torque_nm: 0.0,
        }
    }
}

impl ElectricParams {
    /// Neutral-default copy: power/capacity terms to 0, efficiency to 1.
    pub fn sanitized(&self) -> Self {
        ElectricParams {
            motor_max_rpm: positive_or(self.motor_max_rpm, 0.0),
            rated_power_hp: positive_or(self.rated_power_hp, 0.0),
            efficiency: positive_or(self.efficiency, 1.0),
            motor_max_torque_nm: positive_or(self.motor_max_torque_nm, 0.0),
            gearbox_max_torque_nm: positive_or(self.gearbox_max_torque_nm, 0.0),
        }
    }
}

/// Hydraulic drivetrain parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicParams {
    /// Number of pump strings feeding the circuit
    pub pump_count: f64,
    /// Rated power of each pump's prime mover (hp)
    pub pump_power_hp: f64,
    /// Pump efficiency, 0..=1
    pub pump_efficiency: f64,
    /// Pump shaft speed (rpm)
    pub pump_rpm: f64,
    /// Pump displacement (cc/rev)
    pub pump_displacement_cc: f64,
    /// System relief pressure (psi)
    pub max_pressure_psi: f64,
    /// Hydraulic motor displacement (cc/rev)
    pub motor_displacement_cc: f64,
    /// Hydraulic motor speed limit (rpm); 0 means uncapped
    pub motor_max_rpm: f64,
}

impl Default for HydraulicParams {
    fn default() -> Self {
        HydraulicParams {
            pump_count: 1.0,
            pump_power_hp: 0.0,
            pump_efficiency: 1.0,
            pump_rpm: 0.0,
            pump_displacement_cc: 0.0,
            max_pressure_psi: 0.0,
            motor_displacement_cc: 0.0,
            motor_max_rpm: 0.0,
        }
    }
}

impl HydraulicParams {
    /// Neutral-default copy: counts/efficiency to 1, capacity terms to 0.
    pub fn sanitized(&self) -> Self {
        HydraulicParams {
            pump_count: positive_or(self.pump_count, 1.0),
            pump_power_hp: positive_or(self.pump_power_hp, 0.0),
            pump_efficiency: positive_or(self.pump_efficiency, 1.0),
            pump_rpm: positive_or(self.pump_rpm, 0.0),
            pump_displacement_cc: positive_or(self.pump_displacement_cc, 0.0),
            max_pressure_psi: positive_or(self.max_pressure_psi, 0.0),
            motor_displacement_cc: positive_or(self.motor_displacement_cc, 0.0),
            motor_max_rpm: positive_or(self.motor_max_rpm, 0.0),
        }
    }
}

/// Full model input: drum geometry, cable, payload, gear train and the two
/// drivetrain parameter blocks.
///
/// Immutable per invocation; [`crate::calculations::compute`] takes it by
/// reference and echoes the sanitized copy back in the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinchConfig {
    /// Cable diameter (in)
    pub cable_diameter_in: f64,
    /// Operating depth the cable must reach (m)
    pub operating_depth_m: f64,
    /// Dead-end allowance left on the drum (m)
    pub dead_end_m: f64,
    /// Drum core (barrel) diameter (in)
    pub core_diameter_in: f64,
    /// Flange diameter (in); spooling stops at this outer limit
    pub flange_diameter_in: f64,
    /// Flange-to-flange width (in)
    pub flange_to_flange_in: f64,
    /// Lebus liner thickness under the first layer (in)
    pub lebus_thickness_in: f64,
    /// How tightly successive layers nest (dimensionless, ~0.8..1.0)
    pub packing_factor: f64,
    /// Explicit wraps-per-layer; overrides the computed value when set
    pub wraps_per_layer_override: Option<u32>,
    /// Payload mass (kg)
    pub payload_kg: f64,
    /// Cable linear weight (kg/m)
    pub cable_weight_kg_per_m: f64,
    /// First gear stage ratio
    pub gear_ratio_1: f64,
    /// Second gear stage ratio
    pub gear_ratio_2: f64,
    /// Number of drive motors on the drum
    pub motor_count: f64,
    /// Run the electric pass
    pub electric_enabled: bool,
    /// Run the hydraulic pass
    pub hydraulic_enabled: bool,
    /// Electric drivetrain parameters
    pub electric: ElectricParams,
    /// Hydraulic drivetrain parameters
    pub hydraulic: HydraulicParams,
}

impl Default for WinchConfig {
    fn default() -> Self {
        WinchConfig {
            cable_diameter_in: 0.0,
            operating_depth_m: 0.0,
            dead_end_m: 0.0,
            core_diameter_in: 0.0,
            flange_diameter_in: 0.0,
            flange_to_flange_in: 0.0,
            lebus_thickness_in: 0.0,
            packing_factor: 1.0,
            wraps_per_layer_override: None,
            payload_kg: 0.0,
            cable_weight_kg_per_m: 0.0,
            gear_ratio_1: 1.0,
            gear_ratio_2: 1.0,
            motor_count: 1.0,
            electric_enabled: true,
            hydraulic_enabled: false,
            electric: ElectricParams::default(),
            hydraulic: HydraulicParams::default(),
        }
    }
}

impl WinchConfig {
    /// Copy with every numeric field passed through the neutral defaults:
    /// ratios, counts and the packing factor fall back to 1; geometry,
    /// payload and capacity terms fall back to 0. The liner thickness and
    /// dead end may legitimately be zero, so only non-finite/negative values
    /// are replaced there.
    pub fn sanitized(&self) -> Self {
        WinchConfig {
            cable_diameter_in: positive_or(self.cable_diameter_in, 0.0),
            operating_depth_m: positive_or(self.operating_depth_m, 0.0),
            dead_end_m: non_negative(self.dead_end_m),
            core_diameter_in: positive_or(self.core_diameter_in, 0.0),
            flange_diameter_in: positive_or(self.flange_diameter_in, 0.0),
            flange_to_flange_in: positive_or(self.flange_to_flange_in, 0.0),
            lebus_thickness_in: non_negative(self.lebus_thickness_in),
            packing_factor: positive_or(self.packing_factor, 1.0),
            wraps_per_layer_override: self.wraps_per_layer_override.filter(|&w| w > 0),
            payload_kg: non_negative(self.payload_kg),
            cable_weight_kg_per_m: non_negative(self.cable_weight_kg_per_m),
            gear_ratio_1: positive_or(self.gear_ratio_1, 1.0),
            gear_ratio_2: positive_or(self.gear_ratio_2, 1.0),
            motor_count: positive_or(self.motor_count, 1.0),
            electric_enabled: self.electric_enabled,
            hydraulic_enabled: self.hydraulic_enabled,
            electric: self.electric.sanitized(),
            hydraulic: self.hydraulic.sanitized(),
        }
    }

    /// Combined reduction of both gear stages.
    pub fn total_gear_ratio(&self) -> f64 {
        self.gear_ratio_1 * self.gear_ratio_2
    }

    /// Total cable length the drum must hold (m).
    pub fn required_cable_len_m(&self) -> f64 {
        self.operating_depth_m + self.dead_end_m
    }
}

/// Zero-or-positive filter for fields where zero is a valid input.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> WinchConfig {
        WinchConfig {
            cable_diameter_in: 0.75,
            operating_depth_m: 3000.0,
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
            ..WinchConfig::default()
        }
    }

    #[test]
    fn test_sanitized_passes_valid_values_through() {
        let config = test_config();
        assert_eq!(config.sanitized(), config);
    }

    #[test]
    fn test_sanitized_replaces_bad_ratios_with_one() {
        let mut config = test_config();
        config.gear_ratio_1 = f64::NAN;
        config.gear_ratio_2 = -4.0;
        config.motor_count = 0.0;
        let clean = config.sanitized();
        assert_eq!(clean.gear_ratio_1, 1.0);
        assert_eq!(clean.gear_ratio_2, 1.0);
        assert_eq!(clean.motor_count, 1.0);
    }

    #[test]
    fn test_sanitized_zeroes_bad_geometry() {
        let mut config = test_config();
        config.cable_diameter_in = f64::INFINITY;
        config.flange_diameter_in = -48.0;
        let clean = config.sanitized();
        assert_eq!(clean.cable_diameter_in, 0.0);
        assert_eq!(clean.flange_diameter_in, 0.0);
    }

    #[test]
    fn test_sanitized_keeps_zero_dead_end() {
        let mut config = test_config();
        config.dead_end_m = 0.0;
        config.lebus_thickness_in = 0.0;
        let clean = config.sanitized();
        assert_eq!(clean.dead_end_m, 0.0);
        assert_eq!(clean.lebus_thickness_in, 0.0);
    }

    #[test]
    fn test_sanitized_drops_zero_override() {
        let mut config = test_config();
        config.wraps_per_layer_override = Some(0);
        assert_eq!(config.sanitized().wraps_per_layer_override, None);
    }

    #[test]
    fn test_drivetrain_selector_defaults_to_electric() {
        assert_eq!(DrivetrainType::from_selector("hydraulic"), DrivetrainType::Hydraulic);
        assert_eq!(DrivetrainType::from_selector("Hydraulic"), DrivetrainType::Hydraulic);
        assert_eq!(DrivetrainType::from_selector("electric"), DrivetrainType::Electric);
        assert_eq!(DrivetrainType::from_selector("diesel"), DrivetrainType::Electric);
        assert_eq!(DrivetrainType::from_selector(""), DrivetrainType::Electric);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = test_config();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let roundtrip: WinchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, roundtrip);
    }

    #[test]
    fn test_required_cable_len() {
        let config = test_config();
        assert_eq!(config.required_cable_len_m(), 3050.0);
    }
}
