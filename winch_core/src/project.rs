//! # Project & Preset Data Structures
//!
//! The `Project` struct is the root container saved to `.wcp` (winch calc
//! project) files as human-readable JSON: metadata plus a set of named winch
//! configurations (presets).
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, job info, timestamps)
//! ├── settings: GlobalSettings (default drivetrain)
//! └── presets: HashMap<Uuid, Preset> (named configurations)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use winch_core::project::{Preset, Project};
//! use winch_core::config::WinchConfig;
//!
//! let mut project = Project::new("Jane Engineer", "25-042", "ACME Marine");
//! let id = project.add_preset(Preset::new("3000 m umbilical", WinchConfig::default()));
//! assert!(project.get_preset(&id).is_some());
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{DrivetrainType, ElectricParams, HydraulicParams, WinchConfig};

/// Current schema version for .wcp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A named, reusable winch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Display name (e.g., "3000 m umbilical, twin electric")
    pub name: String,
    /// The stored configuration
    pub config: WinchConfig,
}

impl Preset {
    pub fn new(name: impl Into<String>, config: WinchConfig) -> Self {
        Preset {
            name: name.into(),
            config,
        }
    }
}

/// Root project container serialized to `.wcp` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, job info)
    pub meta: ProjectMetadata,

    /// Global settings (default drivetrain for new presets)
    pub settings: GlobalSettings,

    /// All presets, keyed by UUID for stable references
    pub presets: HashMap<Uuid, Preset>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(
        engineer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            presets: HashMap::new(),
        }
    }

    /// Add a preset; returns the UUID assigned to it.
    pub fn add_preset(&mut self, preset: Preset) -> Uuid {
        let id = Uuid::new_v4();
        self.presets.insert(id, preset);
        self.touch();
        id
    }

    /// Remove a preset by UUID; returns it if it existed.
    pub fn remove_preset(&mut self, id: &Uuid) -> Option<Preset> {
        let preset = self.presets.remove(id);
        if preset.is_some() {
            self.touch();
        }
        preset
    }

    /// Get a preset by UUID.
    pub fn get_preset(&self, id: &Uuid) -> Option<&Preset> {
        self.presets.get(id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn preset_count(&self) -> usize {
        self.presets.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GlobalSettings {
    /// Drivetrain preselected for new presets
    pub default_drivetrain: DrivetrainType,
}

/// Ready-made demo presets shipped with the calculator.
pub static BUILTIN_PRESETS: Lazy<Vec<Preset>> = Lazy::new(|| {
    vec![
        Preset::new(
            "2000 m umbilical, twin electric",
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
                electric: ElectricParams {
                    motor_max_rpm: 1800.0,
                    rated_power_hp: 150.0,
                    efficiency: 0.94,
                    motor_max_torque_nm: 900.0,
                    gearbox_max_torque_nm: 30_000.0,
                },
                ..WinchConfig::default()
            },
        ),
        Preset::new(
            "800 m workboat winch, hydraulic",
            WinchConfig {
                cable_diameter_in: 1.0,
                operating_depth_m: 800.0,
                dead_end_m: 20.0,
                core_diameter_in: 20.0,
                flange_diameter_in: 44.0,
                flange_to_flange_in: 30.0,
                lebus_thickness_in: 0.0,
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
            },
        ),
    ]
});
