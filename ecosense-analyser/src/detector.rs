use rand::Rng;

/// Outcome of an occupancy detection. `person_count` is zero iff `occupied` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub occupied: bool,
    pub person_count: u32,
}

impl Detection {
    pub fn vacant() -> Self {
        Self {
            occupied: false,
            person_count: 0,
        }
    }

    pub fn people(person_count: u32) -> Self {
        Self {
            occupied: person_count > 0,
            person_count,
        }
    }
}

/// Source of occupancy used when the remote vision service cannot be asked.
pub trait OccupancyDetector: Send + Sync {
    fn detect(&self) -> Detection;
}

/// Simulated detector: draws a random occupancy for each call.
///
/// Stands in for a real presence sensor during development.
#[derive(Debug, Clone)]
pub struct RandomDetector {
    occupied_probability: f64,
    max_people: u32,
}

impl RandomDetector {
    pub fn new(occupied_probability: f64, max_people: u32) -> Self {
        Self {
            occupied_probability: occupied_probability.clamp(0.0, 1.0),
            max_people: max_people.max(1),
        }
    }
}

impl Default for RandomDetector {
    fn default() -> Self {
        Self::new(0.6, 20)
    }
}

impl OccupancyDetector for RandomDetector {
    fn detect(&self) -> Detection {
        let mut rng = rand::thread_rng();

        if rng.gen_bool(self.occupied_probability) {
            Detection::people(rng.gen_range(1..=self.max_people))
        } else {
            Detection::vacant()
        }
    }
}
