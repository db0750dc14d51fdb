use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    /// Wall clock label, `HH:MM:SS`
    pub timestamp: String,
    /// Instantaneous consumption in kW
    pub consumption: f64,
    /// Instantaneous savings in kW
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsLedger {
    /// Cumulative energy saved in kWh
    pub total_saved_kwh: f64,
    /// CO2 avoided in kg
    pub co2_avoided_kg: f64,
}
