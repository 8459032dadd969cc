// Dashboard state record: simulated sensor and actuator readings

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{PoisonError, RwLock};
use tracing::info;

#[cfg(test)]
mod tests;

/// Highest tree health; lost leaves are counted down from here.
pub const MAX_TREE_HEALTH: u8 = 10;

/// Snapshot of everything the dashboard and the voice skill report on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Heating setpoint (°C)
    pub temperature: f64,

    /// Electricity used today (kWh)
    pub electricity_usage: f64,

    /// Typical daily electricity use (kWh)
    pub average_electricity: f64,

    /// Water used today (litres)
    pub water_usage: f64,

    /// Typical daily water use (litres)
    pub average_water: f64,

    pub heating_on: bool,

    pub lights_on_unoccupied: bool,

    /// Eco-friendliness score, always within 0..=10
    pub tree_health: u8,

    /// Refreshed on every mutation
    pub last_updated: DateTime<Utc>,
}

impl DashboardState {
    /// Leaves the tree has lost today (`10 - treeHealth`).
    pub fn lost_leaves(&self) -> u8 {
        MAX_TREE_HEALTH.saturating_sub(self.tree_health)
    }
}

/// Initial readings used at process start (`[dashboard]` config section).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSeed {
    pub temperature: f64,
    pub electricity_usage: f64,
    pub average_electricity: f64,
    pub water_usage: f64,
    pub average_water: f64,
    pub heating_on: bool,
    pub lights_on_unoccupied: bool,
    pub tree_health: f64,
}

impl Default for DashboardSeed {
    fn default() -> Self {
        Self {
            temperature: 21.0,
            electricity_usage: 6.8,
            average_electricity: 7.5,
            water_usage: 150.0,
            average_water: 120.0,
            heating_on: true,
            lights_on_unoccupied: false,
            tree_health: 10.0,
        }
    }
}

impl DashboardSeed {
    fn into_state(self, now: DateTime<Utc>) -> DashboardState {
        DashboardState {
            temperature: self.temperature,
            electricity_usage: self.electricity_usage,
            average_electricity: self.average_electricity,
            water_usage: self.water_usage,
            average_water: self.average_water,
            heating_on: self.heating_on,
            lights_on_unoccupied: self.lights_on_unoccupied,
            tree_health: clamp_tree_health(self.tree_health),
            last_updated: now,
        }
    }
}

/// Partial update body. Only fields present in the request are changed.
///
/// Unknown keys are ignored. `lastUpdated` is never taken from the caller.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DashboardPatch {
    #[serde(default, alias = "temperatureC")]
    pub temperature: Option<f64>,

    #[serde(default, rename = "electricityUsage", alias = "electricityUsageKWh")]
    pub electricity_usage: Option<f64>,

    #[serde(default, rename = "averageElectricity", alias = "averageElectricityKWh")]
    pub average_electricity: Option<f64>,

    #[serde(default, rename = "waterUsage", alias = "waterUsageL")]
    pub water_usage: Option<f64>,

    #[serde(default, rename = "averageWater", alias = "averageWaterL")]
    pub average_water: Option<f64>,

    #[serde(default, rename = "heatingOn")]
    pub heating_on: Option<bool>,

    #[serde(default, rename = "lightsOnUnoccupied")]
    pub lights_on_unoccupied: Option<bool>,

    /// Any number; rounded and clamped into 0..=10
    #[serde(default, rename = "treeHealth")]
    pub tree_health: Option<f64>,
}

impl DashboardPatch {
    /// Patch that only moves the heating setpoint.
    pub fn temperature(celsius: f64) -> Self {
        Self {
            temperature: Some(celsius),
            ..Self::default()
        }
    }

    /// Number of fields this patch will write.
    pub fn field_count(&self) -> usize {
        [
            self.temperature.is_some(),
            self.electricity_usage.is_some(),
            self.average_electricity.is_some(),
            self.water_usage.is_some(),
            self.average_water.is_some(),
            self.heating_on.is_some(),
            self.lights_on_unoccupied.is_some(),
            self.tree_health.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }

    fn apply(&self, state: &mut DashboardState) {
        if let Some(v) = self.temperature {
            state.temperature = v;
        }
        if let Some(v) = self.electricity_usage {
            state.electricity_usage = v;
        }
        if let Some(v) = self.average_electricity {
            state.average_electricity = v;
        }
        if let Some(v) = self.water_usage {
            state.water_usage = v;
        }
        if let Some(v) = self.average_water {
            state.average_water = v;
        }
        if let Some(v) = self.heating_on {
            state.heating_on = v;
        }
        if let Some(v) = self.lights_on_unoccupied {
            state.lights_on_unoccupied = v;
        }
        if let Some(v) = self.tree_health {
            state.tree_health = clamp_tree_health(v);
        }
    }
}

/// Process-lifetime owner of the dashboard record.
///
/// Readers get cloned snapshots; patches merge under the write lock so
/// concurrent patches never lose each other's fields.
#[derive(Debug)]
pub struct DashboardStore {
    state: RwLock<DashboardState>,
}

impl DashboardStore {
    pub fn new(seed: DashboardSeed) -> Self {
        Self {
            state: RwLock::new(seed.into_state(Utc::now())),
        }
    }

    /// Full snapshot of the current readings.
    pub fn read(&self) -> DashboardState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge the supplied fields, stamp `last_updated` and return the result.
    ///
    /// No range checks beyond the tree health clamp.
    pub fn patch(&self, patch: &DashboardPatch) -> DashboardState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        patch.apply(&mut state);
        state.last_updated = next_stamp(state.last_updated);

        info!(
            fields = patch.field_count(),
            temperature = state.temperature,
            tree_health = state.tree_health,
            "Dashboard state patched"
        );

        state.clone()
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(DashboardSeed::default())
    }
}

/// Round and clamp an arbitrary number into the tree health range.
pub fn clamp_tree_health(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(MAX_TREE_HEALTH)) as u8
}

/// Current time, bumped past `previous` if the clock has not advanced.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
