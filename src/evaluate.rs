//! Threshold evaluation: pure mapping from a reading plus active bounds to
//! at most one alert candidate.
//!
//! Temperature takes priority over humidity. A reading violating both
//! bounds yields a single `critical` candidate, not two alerts; this keeps
//! one bad sample from flooding the alert log. Bounds are inclusive: a
//! value exactly equal to a min or max is in range.

use crate::models::{AlertCandidate, NewReading, Severity, Threshold};

// ---

/// Evaluate a reading against a unit's active threshold.
///
/// Callers must only invoke this with an active threshold; an inactive row
/// means the unit is unmonitored and evaluation is skipped entirely.
/// No I/O, no side effects, deterministic.
pub fn evaluate(reading: &NewReading, threshold: &Threshold) -> Option<AlertCandidate> {
    // ---
    if reading.temperature < threshold.temp_min || reading.temperature > threshold.temp_max {
        return Some(AlertCandidate {
            severity: Severity::Critical,
            message: format!(
                "Temperature {}°C is out of safe range ({}°C to {}°C)",
                reading.temperature, threshold.temp_min, threshold.temp_max
            ),
        });
    }

    if reading.humidity < threshold.humidity_min || reading.humidity > threshold.humidity_max {
        return Some(AlertCandidate {
            severity: Severity::Warning,
            message: format!(
                "Humidity {}% is out of safe range ({}% to {}%)",
                reading.humidity, threshold.humidity_min, threshold.humidity_max
            ),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::Source;
    use chrono::{TimeZone, Utc};

    /// Freezer-style bounds used throughout: -25..-15 °C, 30..60 %RH.
    fn freezer_threshold() -> Threshold {
        // ---
        Threshold {
            unit_id: 3,
            temp_min: -25.0,
            temp_max: -15.0,
            humidity_min: 30.0,
            humidity_max: 60.0,
            active: true,
        }
    }

    fn reading(temperature: f64, humidity: f64) -> NewReading {
        // ---
        NewReading {
            unit_id: 3,
            ts: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            temperature,
            humidity,
            source: Source::Stream,
        }
    }

    #[test]
    fn in_range_reading_produces_no_candidate() {
        // ---
        assert_eq!(evaluate(&reading(-20.0, 45.0), &freezer_threshold()), None);
    }

    #[test]
    fn high_temperature_is_critical_with_exact_message() {
        // ---
        let candidate = evaluate(&reading(-10.0, 45.0), &freezer_threshold())
            .expect("out-of-range temperature must produce a candidate");

        assert_eq!(candidate.severity, Severity::Critical);
        assert_eq!(
            candidate.message,
            "Temperature -10°C is out of safe range (-25°C to -15°C)"
        );
    }

    #[test]
    fn low_temperature_is_critical() {
        // ---
        let candidate = evaluate(&reading(-30.0, 45.0), &freezer_threshold()).unwrap();
        assert_eq!(candidate.severity, Severity::Critical);
        assert!(candidate.message.contains("-30°C"));
    }

    #[test]
    fn humidity_violation_is_warning_with_exact_message() {
        // ---
        let candidate = evaluate(&reading(-20.0, 80.0), &freezer_threshold())
            .expect("out-of-range humidity must produce a candidate");

        assert_eq!(candidate.severity, Severity::Warning);
        assert_eq!(
            candidate.message,
            "Humidity 80% is out of safe range (30% to 60%)"
        );
    }

    #[test]
    fn temperature_wins_when_both_violate() {
        // ---
        // One candidate only, and it is the temperature one.
        let candidate = evaluate(&reading(-10.0, 95.0), &freezer_threshold()).unwrap();
        assert_eq!(candidate.severity, Severity::Critical);
        assert!(candidate.message.starts_with("Temperature"));
    }

    #[test]
    fn boundary_values_are_in_range() {
        // ---
        let t = freezer_threshold();
        assert_eq!(evaluate(&reading(-25.0, 45.0), &t), None);
        assert_eq!(evaluate(&reading(-15.0, 45.0), &t), None);
        assert_eq!(evaluate(&reading(-20.0, 30.0), &t), None);
        assert_eq!(evaluate(&reading(-20.0, 60.0), &t), None);
    }

    #[test]
    fn humidity_never_checked_when_temperature_violates() {
        // ---
        // Humidity is also in range here, so the only possible candidate is
        // the temperature one; asserting severity covers the priority rule.
        let candidate = evaluate(&reading(0.0, 45.0), &freezer_threshold()).unwrap();
        assert_eq!(candidate.severity, Severity::Critical);
    }
}
