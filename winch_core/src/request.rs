//! # Request Boundary
//!
//! Validation and conversion for the JSON body the HTTP collaborator
//! receives. This is the only place a user-facing hard failure exists:
//! missing or non-numeric required fields are collected into a field-level
//! error list and rejected *before* the core is invoked. The HTTP transport
//! itself lives outside this crate; it only needs [`parse_request`] and
//! [`ComputeResponse::build`].
//!
//! ## JSON Body
//!
//! Flat numeric fields, an optional `drivetrain` selector (`"electric"` or
//! `"hydraulic"`, anything else falls back to electric), and an optional
//! free-text `project_name`:
//!
//! ```json
//! {
//!   "drivetrain": "electric",
//!   "project_name": "ROV umbilical winch",
//!   "cable_diameter_in": 0.75,
//!   "operating_depth_m": 3000.0,
//!   "dead_end_m": 50.0,
//!   "core_diameter_in": 24.0,
//!   "flange_diameter_in": 48.0,
//!   "flange_to_flange_in": 36.0,
//!   "lebus_thickness_in": 0.5,
//!   "packing_factor": 0.88,
//!   "payload_kg": 2000.0,
//!   "cable_weight_kg_per_m": 1.2,
//!   "gear_ratio_1": 5.0,
//!   "gear_ratio_2": 6.0,
//!   "motor_count": 2,
//!   "electric_motor_max_rpm": 1800.0,
//!   "electric_rated_power_hp": 150.0,
//!   "electric_efficiency": 0.94,
//!   "electric_motor_max_torque_nm": 900.0,
//!   "electric_gearbox_max_torque_nm": 30000.0
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calculations::{compute, ComputationModel};
use crate::config::{DrivetrainType, ElectricParams, HydraulicParams, WinchConfig};
use crate::errors::{FieldError, WinchError, WinchResult};

/// Fields every request must carry, regardless of drivetrain.
const COMMON_FIELDS: &[&str] = &[
    "cable_diameter_in",
    "operating_depth_m",
    "dead_end_m",
    "core_diameter_in",
    "flange_diameter_in",
    "flange_to_flange_in",
    "lebus_thickness_in",
    "packing_factor",
    "payload_kg",
    "cable_weight_kg_per_m",
    "gear_ratio_1",
    "gear_ratio_2",
    "motor_count",
];

/// Additional fields required when the electric drivetrain is selected.
const ELECTRIC_FIELDS: &[&str] = &[
    "electric_motor_max_rpm",
    "electric_rated_power_hp",
    "electric_efficiency",
    "electric_motor_max_torque_nm",
    "electric_gearbox_max_torque_nm",
];

/// Additional fields required when the hydraulic drivetrain is selected.
const HYDRAULIC_FIELDS: &[&str] = &[
    "hydraulic_pump_count",
    "hydraulic_pump_power_hp",
    "hydraulic_pump_efficiency",
    "hydraulic_pump_rpm",
    "hydraulic_pump_displacement_cc",
    "hydraulic_max_pressure_psi",
    "hydraulic_motor_displacement_cc",
    "hydraulic_motor_max_rpm",
];

/// A validated compute request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Converted configuration, ready for [`compute`]
    pub config: WinchConfig,
    /// Drivetrain the caller wants rendered
    pub drivetrain: DrivetrainType,
    /// Optional free-text project name, echoed back in the response
    pub project_name: Option<String>,
}

/// Response wrapper returned to the HTTP collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeResponse {
    /// When the model was generated
    pub generated_at: DateTime<Utc>,
    /// Crate version that produced the model
    pub version: String,
    /// Echo of the request's project name
    pub project_name: Option<String>,
    /// Drivetrain the tables should render
    pub drivetrain: DrivetrainType,
    /// The computed model
    pub model: ComputationModel,
}

impl ComputeResponse {
    /// Run the model and stamp the response metadata.
    pub fn build(request: &ComputeRequest) -> Self {
        ComputeResponse {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            project_name: request.project_name.clone(),
            drivetrain: request.drivetrain,
            model: compute(&request.config),
        }
    }
}

/// Pull a required numeric field out of the body, recording an error when
/// it is missing or not a number.
fn numeric_field(body: &Value, field: &str, errors: &mut Vec<FieldError>) -> f64 {
    match body.get(field) {
        None | Some(Value::Null) => {
            errors.push(FieldError::new(field, "missing required field"));
            0.0
        }
        Some(value) => match value.as_f64() {
            Some(n) => n,
            None => {
                errors.push(FieldError::new(field, "must be a number"));
                0.0
            }
        },
    }
}

/// Validate a JSON request body and convert it into a [`ComputeRequest`].
///
/// All required fields for the selected drivetrain are checked in one pass
/// so the caller gets the complete list of offending fields at once
/// (`WinchError::ValidationFailed`), not just the first.
pub fn parse_request(body: &Value) -> WinchResult<ComputeRequest> {
    let Some(obj) = body.as_object() else {
        return Err(WinchError::ValidationFailed {
            errors: vec![FieldError::new("$", "request body must be a JSON object")],
        });
    };

    // Selector and project name are optional and lenient
    let drivetrain = obj
        .get("drivetrain")
        .and_then(Value::as_str)
        .map(DrivetrainType::from_selector)
        .unwrap_or_default();
    let project_name = obj
        .get("project_name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut errors = Vec::new();
    let mut num = |field: &str| numeric_field(body, field, &mut errors);

    let mut config = WinchConfig {
        cable_diameter_in: num("cable_diameter_in"),
        operating_depth_m: num("operating_depth_m"),
        dead_end_m: num("dead_end_m"),
        core_diameter_in: num("core_diameter_in"),
        flange_diameter_in: num("flange_diameter_in"),
        flange_to_flange_in: num("flange_to_flange_in"),
        lebus_thickness_in: num("lebus_thickness_in"),
        packing_factor: num("packing_factor"),
        payload_kg: num("payload_kg"),
        cable_weight_kg_per_m: num("cable_weight_kg_per_m"),
        gear_ratio_1: num("gear_ratio_1"),
        gear_ratio_2: num("gear_ratio_2"),
        motor_count: num("motor_count"),
        electric_enabled: drivetrain == DrivetrainType::Electric,
        hydraulic_enabled: drivetrain == DrivetrainType::Hydraulic,
        ..WinchConfig::default()
    };

    match drivetrain {
        DrivetrainType::Electric => {
            config.electric = ElectricParams {
                motor_max_rpm: num("electric_motor_max_rpm"),
                rated_power_hp: num("electric_rated_power_hp"),
                efficiency: num("electric_efficiency"),
                motor_max_torque_nm: num("electric_motor_max_torque_nm"),
                gearbox_max_torque_nm: num("electric_gearbox_max_torque_nm"),
            };
        }
        DrivetrainType::Hydraulic => {
            config.hydraulic = HydraulicParams {
                pump_count: num("hydraulic_pump_count"),
                pump_power_hp: num("hydraulic_pump_power_hp"),
                pump_efficiency: num("hydraulic_pump_efficiency"),
                pump_rpm: num("hydraulic_pump_rpm"),
                pump_displacement_cc: num("hydraulic_pump_displacement_cc"),
                max_pressure_psi: num("hydraulic_max_pressure_psi"),
                motor_displacement_cc: num("hydraulic_motor_displacement_cc"),
                motor_max_rpm: num("hydraulic_motor_max_rpm"),
            };
        }
    }

    // Optional override; rejected only when present and non-numeric
    if let Some(value) = obj.get("wraps_per_layer_override") {
        if !value.is_null() {
            match value.as_u64() {
                Some(n) if n > 0 => config.wraps_per_layer_override = Some(n as u32),
                _ => errors.push(FieldError::new(
                    "wraps_per_layer_override",
                    "must be a positive integer",
                )),
            }
        }
    }

    if !errors.is_empty() {
        return Err(WinchError::ValidationFailed { errors });
    }

    Ok(ComputeRequest {
        config,
        drivetrain,
        project_name,
    })
}

/// The full list of fields [`parse_request`] requires for a drivetrain,
/// exported so form renderers can stay in sync.
pub fn required_fields(drivetrain: DrivetrainType) -> Vec<&'static str> {
    let extra = match drivetrain {
        DrivetrainType::Electric => ELECTRIC_FIELDS,
        DrivetrainType::Hydraulic => HYDRAULIC_FIELDS,
    };
    COMMON_FIELDS.iter().chain(extra.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "drivetrain": "electric",
            "project_name": "Test winch",
            "cable_diameter_in": 0.75,
            "operating_depth_m": 3000.0,
            "dead_end_m": 50.0,
            "core_diameter_in": 24.0,
            "flange_diameter_in": 48.0,
            "flange_to_flange_in": 36.0,
            "lebus_thickness_in": 0.5,
            "packing_factor": 0.88,
            "payload_kg": 2000.0,
            "cable_weight_kg_per_m": 1.2,
            "gear_ratio_1": 5.0,
            "gear_ratio_2": 6.0,
            "motor_count": 2,
            "electric_motor_max_rpm": 1800.0,
            "electric_rated_power_hp": 150.0,
            "electric_efficiency": 0.94,
            "electric_motor_max_torque_nm": 900.0,
            "electric_gearbox_max_torque_nm": 30000.0
        })
    }

    #[test]
    fn test_valid_body_parses() {
        let request = parse_request(&valid_body()).unwrap();
        assert_eq!(request.drivetrain, DrivetrainType::Electric);
        assert_eq!(request.project_name.as_deref(), Some("Test winch"));
        assert!(request.config.electric_enabled);
        assert!(!request.config.hydraulic_enabled);
        assert_eq!(request.config.electric.rated_power_hp, 150.0);
    }

    #[test]
    fn test_missing_fields_all_reported() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("payload_kg");
        body.as_object_mut().unwrap().remove("gear_ratio_1");
        let err = parse_request(&body).unwrap_err();
        match err {
            WinchError::ValidationFailed { errors } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["payload_kg", "gear_ratio_1"]);
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let mut body = valid_body();
        body["payload_kg"] = json!("heavy");
        let err = parse_request(&body).unwrap_err();
        match err {
            WinchError::ValidationFailed { errors } => {
                assert_eq!(errors[0].field, "payload_kg");
                assert_eq!(errors[0].reason, "must be a number");
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_selector_defaults_to_electric() {
        let mut body = valid_body();
        body["drivetrain"] = json!("steam");
        let request = parse_request(&body).unwrap();
        assert_eq!(request.drivetrain, DrivetrainType::Electric);
    }

    #[test]
    fn test_hydraulic_selector_requires_hydraulic_fields() {
        let mut body = valid_body();
        body["drivetrain"] = json!("hydraulic");
        let err = parse_request(&body).unwrap_err();
        match err {
            WinchError::ValidationFailed { errors } => {
                assert!(errors.iter().any(|e| e.field == "hydraulic_pump_count"));
                // electric fields are no longer required
                assert!(!errors.iter().any(|e| e.field.starts_with("electric_")));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = parse_request(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }

    #[test]
    fn test_override_validation() {
        let mut body = valid_body();
        body["wraps_per_layer_override"] = json!(12);
        let request = parse_request(&body).unwrap();
        assert_eq!(request.config.wraps_per_layer_override, Some(12));

        body["wraps_per_layer_override"] = json!(-3);
        assert!(parse_request(&body).is_err());
    }

    #[test]
    fn test_response_carries_metadata() {
        let request = parse_request(&valid_body()).unwrap();
        let response = ComputeResponse::build(&request);
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(response.project_name.as_deref(), Some("Test winch"));
        assert!(!response.model.rows.is_empty());
    }

    #[test]
    fn test_required_fields_lists() {
        let electric = required_fields(DrivetrainType::Electric);
        assert!(electric.contains(&"cable_diameter_in"));
        assert!(electric.contains(&"electric_efficiency"));
        assert!(!electric.contains(&"hydraulic_pump_rpm"));
        let hydraulic = required_fields(DrivetrainType::Hydraulic);
        assert!(hydraulic.contains(&"hydraulic_pump_rpm"));
    }
}
