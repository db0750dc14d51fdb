use ecosense_api::models::{AnalysisResult, Switch};

/// Lights are switched on below this brightness when someone is present.
pub const LIGHT_THRESHOLD: f32 = 60.0;
/// Above this temperature the AC takes over.
pub const AC_THRESHOLD: f32 = 26.0;
/// From this temperature up to `AC_THRESHOLD` the fan is enough.
pub const FAN_THRESHOLD: f32 = 24.0;
pub const FAN_COOLING_SPEED: u8 = 4;
pub const AC_TARGET_TEMP: f32 = 23.0;

/// Inputs to the local decision policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub occupied: bool,
    pub person_count: u32,
    /// Celsius
    pub temperature: f32,
    /// 0-100
    pub brightness: f32,
}

/// Applies the building policy to one observation.
///
/// This is the same rule set the remote model is instructed to follow, and it is what runs
/// locally while the remote service is throttled.
pub fn evaluate(observation: &Observation) -> AnalysisResult {
    let Observation {
        occupied,
        person_count,
        temperature,
        brightness,
    } = *observation;

    let light = occupied && brightness < LIGHT_THRESHOLD;

    let (ac, fan, fan_speed) = if !occupied {
        (false, false, 0)
    } else if temperature > AC_THRESHOLD {
        (true, false, 0)
    } else if temperature >= FAN_THRESHOLD {
        (false, true, FAN_COOLING_SPEED)
    } else {
        (false, false, 0)
    };

    AnalysisResult {
        occupied,
        person_count: if occupied { person_count } else { 0 },
        light_recommendation: Switch::from(light),
        fan_recommendation: Switch::from(fan),
        fan_speed,
        ac_recommendation: Switch::from(ac),
        target_temp: AC_TARGET_TEMP,
    }
}
