//! Reference scenario
//!
//! Eight reports received between 10:42:50 and 10:44:43, followed by a
//! report at 10:45:00. Used by the `demo` subcommand, the console `DEMO`
//! command and the regression tests.

use chrono::{NaiveDate, NaiveTime};

use crate::registry::TriageRegistry;
use crate::types::{Classification, Timestamp, TriageReport};

/// One scripted intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioCase {
    pub mission_id: &'static str,
    pub description: &'static str,
    pub classification: Classification,
    /// (hour, minute, second) of receipt
    pub received: (u32, u32, u32),
}

pub const REFERENCE_CASES: [ScenarioCase; 8] = [
    ScenarioCase {
        mission_id: "M1",
        description: "Critical threat in north sector",
        classification: Classification::High,
        received: (10, 42, 50),
    },
    ScenarioCase {
        mission_id: "M2",
        description: "Unfounded report",
        classification: Classification::FalseAlarm,
        received: (10, 42, 53),
    },
    ScenarioCase {
        mission_id: "M3",
        description: "Confirmed suspicious activity",
        classification: Classification::High,
        received: (10, 42, 57),
    },
    ScenarioCase {
        mission_id: "M4",
        description: "Surveillance required in east zone",
        classification: Classification::Low,
        received: (10, 43, 11),
    },
    ScenarioCase {
        mission_id: "M5",
        description: "False alarm triggered",
        classification: Classification::FalseAlarm,
        received: (10, 43, 27),
    },
    ScenarioCase {
        mission_id: "M6",
        description: "Irregular movement detected",
        classification: Classification::Low,
        received: (10, 44, 1),
    },
    ScenarioCase {
        mission_id: "M7",
        description: "Reconnaissance needed",
        classification: Classification::Low,
        received: (10, 44, 37),
    },
    ScenarioCase {
        mission_id: "M8",
        description: "Imminent threat confirmed",
        classification: Classification::High,
        received: (10, 44, 43),
    },
];

/// Time of day the reference report is taken.
pub const REPORT_TIME: (u32, u32, u32) = (10, 45, 0);

/// Place an `(h, m, s)` triple on `anchor`. Out-of-range values clamp to midnight.
pub fn on_anchor(anchor: NaiveDate, (h, m, s): (u32, u32, u32)) -> Timestamp {
    anchor
        .and_hms_opt(h, m, s)
        .unwrap_or_else(|| anchor.and_time(NaiveTime::default()))
}

/// Feed every reference case into `registry` and return the report at
/// [`REPORT_TIME`].
pub fn run_reference_scenario(registry: &mut TriageRegistry, anchor: NaiveDate) -> TriageReport {
    for case in REFERENCE_CASES {
        registry.intake(
            case.mission_id,
            case.description,
            case.classification,
            on_anchor(anchor, case.received),
        );
    }
    registry.generate_report(on_anchor(anchor, REPORT_TIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cases_are_in_receipt_order() {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let times: Vec<Timestamp> = REFERENCE_CASES
            .iter()
            .map(|c| on_anchor(anchor, c.received))
            .collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }
}
