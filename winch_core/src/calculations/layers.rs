//! # Layer Aggregator
//!
//! Reduces the augmented wrap rows into per-layer roll-ups and the slim
//! per-wrap projections consumed by table renderers.
//!
//! Two deliberate asymmetries, preserved from the reference behavior:
//!
//! - "at layer start" dynamic fields (achieved rpm/speed, tensions) are
//!   copied verbatim from the layer's first wrap in ascending wrap order,
//!   never recomputed;
//! - "maximum" tension/torque fields are recomputed directly from the
//!   layer's pre-wrap deployed length, never copied from a row, so the
//!   roll-up cannot inherit per-wrap rounding error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::WinchConfig;
use crate::units::{drum_torque_nm, non_zero, round1, tension_kgf};

use super::geometry::WrapRow;

/// Per-layer roll-up of the electric pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ElectricLayerSummary {
    /// Layer number (1-based)
    pub layer_no: u32,
    /// Cable centerline diameter at this layer (in)
    pub layer_diameter_in: f64,
    /// Number of wraps on this layer
    pub wrap_count: u32,
    /// Global wrap number of the layer's first wrap
    pub first_wrap_no: u32,
    /// Cable on the drum before the layer starts (m)
    pub on_drum_before_m: f64,
    /// Cable on the drum once the layer is full (m)
    pub on_drum_after_m: f64,
    /// Cable paid out before the layer starts (m)
    pub deployed_before_m: f64,
    /// Cable paid out once the layer is full (m)
    pub deployed_after_m: f64,

    // Snapshotted from the layer's first wrap
    /// Achieved motor rpm at layer start
    pub achieved_rpm: f64,
    /// Achieved line speed at layer start (m/min)
    pub achieved_speed_m_min: f64,
    /// Unrounded suspended load at layer start (kgf)
    pub theoretical_tension_kgf: f64,
    /// Display tension at layer start (kgf)
    pub required_tension_kgf: f64,
    /// Torque-limited available tension at this layer (kgf)
    pub available_tension_kgf: f64,

    // Recomputed from the pre-wrap deployed length
    /// Maximum tension seen on this layer (kgf, 1 decimal)
    pub max_tension_kgf: f64,
    /// Drum torque at that maximum tension (N·m, 1 decimal)
    pub max_drum_torque_nm: f64,
}

/// Per-layer roll-up of the hydraulic pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct HydraulicLayerSummary {
    /// Layer number (1-based)
    pub layer_no: u32,
    /// Cable centerline diameter at this layer (in)
    pub layer_diameter_in: f64,
    /// Number of wraps on this layer
    pub wrap_count: u32,
    /// Global wrap number of the layer's first wrap
    pub first_wrap_no: u32,
    /// Cable on the drum before the layer starts (m)
    pub on_drum_before_m: f64,
    /// Cable on the drum once the layer is full (m)
    pub on_drum_after_m: f64,
    /// Cable paid out before the layer starts (m)
    pub deployed_before_m: f64,
    /// Cable paid out once the layer is full (m)
    pub deployed_after_m: f64,

    // Snapshotted from the layer's first wrap
    /// Achieved drum rpm at layer start
    pub achieved_drum_rpm: f64,
    /// Achieved line speed at layer start (m/min)
    pub achieved_speed_m_min: f64,
    /// Required pressure at layer start (psi)
    pub required_pressure_psi: f64,
    /// Unrounded suspended load at layer start (kgf)
    pub theoretical_tension_kgf: f64,
    /// Display tension at layer start (kgf)
    pub required_tension_kgf: f64,
    /// Pressure-limited available tension at this layer (kgf)
    pub available_tension_kgf: f64,

    // Recomputed from the pre-wrap deployed length
    /// Maximum tension seen on this layer (kgf, 1 decimal)
    pub max_tension_kgf: f64,
    /// Drum torque at that maximum tension (N·m, 1 decimal)
    pub max_drum_torque_nm: f64,
}

/// Slim electric row for table rendering, in original wrap order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricTableRow {
    pub layer_no: u32,
    pub wrap_no: u32,
    pub layer_diameter_in: f64,
    pub deployed_m: f64,
    pub required_tension_kgf: f64,
    pub motor_torque_nm: f64,
    pub achieved_rpm: f64,
    pub achieved_speed_m_min: f64,
    pub available_tension_kgf: f64,
}

/// Slim hydraulic row for table rendering, in original wrap order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HydraulicTableRow {
    pub layer_no: u32,
    pub wrap_no: u32,
    pub layer_diameter_in: f64,
    pub deployed_m: f64,
    pub required_tension_kgf: f64,
    pub required_pressure_psi: f64,
    pub achieved_drum_rpm: f64,
    pub achieved_speed_m_min: f64,
    pub available_tension_kgf: f64,
}

/// First/last wrap of each layer, keyed (and therefore sorted) by layer
/// number regardless of input row order.
fn layer_bounds(rows: &[WrapRow]) -> BTreeMap<u32, (usize, usize, u32)> {
    let mut bounds: BTreeMap<u32, (usize, usize, u32)> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        bounds
            .entry(row.layer_no)
            .and_modify(|(first, last, count)| {
                if row.wrap_no < rows[*first].wrap_no {
                    *first = idx;
                }
                if row.wrap_no > rows[*last].wrap_no {
                    *last = idx;
                }
                *count += 1;
            })
            .or_insert((idx, idx, 1));
    }
    bounds
}

/// Maximum tension/torque at a layer, recomputed from the pre-wrap deployed
/// length through the base formulas.
fn layer_maxima(config: &WinchConfig, deployed_before_m: f64, layer_diameter_in: f64) -> (f64, f64) {
    let theoretical = tension_kgf(
        config.payload_kg,
        deployed_before_m,
        config.cable_weight_kg_per_m,
    );
    let max_tension = round1(theoretical);
    let drum = drum_torque_nm(max_tension, layer_diameter_in);
    let ratio = non_zero(config.total_gear_ratio());
    let motors = non_zero(config.motor_count);
    let max_torque = round1(drum / (ratio * motors) * ratio * motors);
    (max_tension, max_torque)
}

/// Roll the wrap rows up into electric layer summaries, sorted strictly
/// ascending by layer number.
pub fn aggregate_electric(rows: &[WrapRow], config: &WinchConfig) -> Vec<ElectricLayerSummary> {
    layer_bounds(rows)
        .into_iter()
        .map(|(layer_no, (first_idx, last_idx, count))| {
            let first = &rows[first_idx];
            let last = &rows[last_idx];
            let deployed_before = first.total_len_m - first.spooled_before_m;
            let (max_tension, max_torque) =
                layer_maxima(config, deployed_before, first.layer_diameter_in);
            ElectricLayerSummary {
                layer_no,
                layer_diameter_in: first.layer_diameter_in,
                wrap_count: count,
                first_wrap_no: first.wrap_no,
                on_drum_before_m: first.spooled_before_m,
                on_drum_after_m: last.spooled_after_m,
                deployed_before_m: deployed_before,
                deployed_after_m: last.total_len_m - last.spooled_after_m,
                achieved_rpm: first.electric.achieved_rpm,
                achieved_speed_m_min: first.electric.achieved_speed_m_min,
                theoretical_tension_kgf: first.theoretical_tension_kgf,
                required_tension_kgf: first.required_tension_kgf,
                available_tension_kgf: first.electric.available_tension_kgf,
                max_tension_kgf: max_tension,
                max_drum_torque_nm: max_torque,
            }
        })
        .collect()
}

/// Roll the wrap rows up into hydraulic layer summaries, sorted strictly
/// ascending by layer number.
pub fn aggregate_hydraulic(rows: &[WrapRow], config: &WinchConfig) -> Vec<HydraulicLayerSummary> {
    layer_bounds(rows)
        .into_iter()
        .map(|(layer_no, (first_idx, last_idx, count))| {
            let first = &rows[first_idx];
            let last = &rows[last_idx];
            let deployed_before = first.total_len_m - first.spooled_before_m;
            let (max_tension, max_torque) =
                layer_maxima(config, deployed_before, first.layer_diameter_in);
            HydraulicLayerSummary {
                layer_no,
                layer_diameter_in: first.layer_diameter_in,
                wrap_count: count,
                first_wrap_no: first.wrap_no,
                on_drum_before_m: first.spooled_before_m,
                on_drum_after_m: last.spooled_after_m,
                deployed_before_m: deployed_before,
                deployed_after_m: last.total_len_m - last.spooled_after_m,
                achieved_drum_rpm: first.hydraulic.achieved_drum_rpm,
                achieved_speed_m_min: first.hydraulic.achieved_speed_m_min,
                required_pressure_psi: first.hydraulic.required_pressure_psi,
                theoretical_tension_kgf: first.theoretical_tension_kgf,
                required_tension_kgf: first.required_tension_kgf,
                available_tension_kgf: first.hydraulic.available_tension_kgf,
                max_tension_kgf: max_tension,
                max_drum_torque_nm: max_torque,
            }
        })
        .collect()
}

/// Project the slim electric table rows, preserving original wrap order.
pub fn electric_table(rows: &[WrapRow]) -> Vec<ElectricTableRow> {
    rows.iter()
        .map(|row| ElectricTableRow {
            layer_no: row.layer_no,
            wrap_no: row.wrap_no,
            layer_diameter_in: row.layer_diameter_in,
            deployed_m: row.deployed_m,
            required_tension_kgf: row.required_tension_kgf,
            motor_torque_nm: row.electric.motor_torque_nm,
            achieved_rpm: row.electric.achieved_rpm,
            achieved_speed_m_min: row.electric.achieved_speed_m_min,
            available_tension_kgf: row.electric.available_tension_kgf,
        })
        .collect()
}

/// Project the slim hydraulic table rows, preserving original wrap order.
pub fn hydraulic_table(rows: &[WrapRow]) -> Vec<HydraulicTableRow> {
    rows.iter()
        .map(|row| HydraulicTableRow {
            layer_no: row.layer_no,
            wrap_no: row.wrap_no,
            layer_diameter_in: row.layer_diameter_in,
            deployed_m: row.deployed_m,
            required_tension_kgf: row.required_tension_kgf,
            required_pressure_psi: row.hydraulic.required_pressure_psi,
            achieved_drum_rpm: row.hydraulic.achieved_drum_rpm,
            achieved_speed_m_min: row.hydraulic.achieved_speed_m_min,
            available_tension_kgf: row.hydraulic.available_tension_kgf,
        })
        .collect()
}
