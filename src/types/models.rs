//! Data model for the backend's fixed JSON shapes
//!
//! All entities are read-only: they are created by deserializing a response
//! and only ever replaced wholesale, never mutated in place. The backend uses
//! camelCase keys except on the full-data envelope, which uses snake_case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collections the season filter applies to
pub trait SeasonScoped {
    fn season_id(&self) -> u32;
}

/// Driver record (`GET /drivers/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub driver_id: u32,
    pub driver_ref: String,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub code: Option<String>,
    pub forename: String,
    pub surname: String,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub nationality: Option<String>,
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

/// Race participation record (`GET /drivers/{id}/races`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceSummary {
    pub race_id: u32,
    pub season_id: u32,
    #[serde(default)]
    pub round: u32,
    pub name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl SeasonScoped for RaceSummary {
    fn season_id(&self) -> u32 {
        self.season_id
    }
}

/// Race result (`GET /drivers/{id}/results`, also embedded in the full-data
/// envelope). The embedded shape omits fields the list shape carries and vice
/// versa, so identifiers default to 0 rather than failing the whole decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    #[serde(default)]
    pub result_id: u32,
    #[serde(default)]
    pub race_id: u32,
    #[serde(default)]
    pub season_id: u32,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub fastest_lap_speed: Option<f64>,
}

impl SeasonScoped for RaceResult {
    fn season_id(&self) -> u32 {
        self.season_id
    }
}

/// Qualifying record (`GET /drivers/{id}/qualifying`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingResult {
    pub qualify_id: u32,
    pub race_id: u32,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub q1: Option<String>,
    #[serde(default)]
    pub q2: Option<String>,
    #[serde(default)]
    pub q3: Option<String>,
}

/// Cumulative points record (`GET /drivers/{id}/driver_standings`).
/// Keyed by race, not season; career points are the sum over all entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingEntry {
    pub driver_standings_id: u32,
    pub race_id: u32,
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub wins: Option<u32>,
}

/// Sprint race result (`GET /drivers/{id}/sprint_results`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintResult {
    pub sprint_result_id: u32,
    pub race_id: u32,
    #[serde(default)]
    pub grid: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Season record (`GET /seasons/`). The identifier is opaque and distinct
/// from the display year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_id: u32,
    pub year: u32,
}

/// Pit stop, scoped to one race (full-data envelope only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitStop {
    pub lap: u32,
    #[serde(default)]
    pub stop: Option<u32>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Lap time, scoped to one race (full-data envelope only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapTime {
    pub lap: u32,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub milliseconds: Option<u64>,
}

/// Combined drill-down envelope
/// (`GET /drivers/{id}/races/{race_id}/full_data/`).
///
/// A populated `error` field means the backend could not produce the data;
/// the transport succeeded, so this is not a `PaddockError`. Keys here are
/// snake_case and extra keys (driver, race, qualifying, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceDetail {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<RaceResult>,
    #[serde(default)]
    pub pit_stops: Option<Vec<PitStop>>,
    #[serde(default)]
    pub lap_times: Option<Vec<LapTime>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_deserializes_backend_shape() {
        let json = r#"{
            "driverId": 1,
            "driverRef": "hamilton",
            "number": 44,
            "code": "HAM",
            "forename": "Lewis",
            "surname": "Hamilton",
            "dob": "1985-01-07",
            "nationality": "British"
        }"#;
        let driver: Driver = serde_json::from_str(json).unwrap();
        assert_eq!(driver.driver_id, 1);
        assert_eq!(driver.full_name(), "Lewis Hamilton");
        assert_eq!(driver.dob.unwrap().to_string(), "1985-01-07");
    }

    #[test]
    fn test_driver_optional_fields_absent() {
        let json = r#"{
            "driverId": 2,
            "driverRef": "fangio",
            "forename": "Juan Manuel",
            "surname": "Fangio"
        }"#;
        let driver: Driver = serde_json::from_str(json).unwrap();
        assert!(driver.number.is_none());
        assert!(driver.code.is_none());
        assert!(driver.nationality.is_none());
    }

    #[test]
    fn test_race_result_list_shape() {
        let json = r#"{
            "resultId": 7,
            "raceId": 100,
            "seasonId": 10,
            "points": 25,
            "position": 1,
            "fastestLapSpeed": 218.3
        }"#;
        let result: RaceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.result_id, 7);
        assert_eq!(result.season_id(), 10);
        assert!((result.points - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_race_result_embedded_shape() {
        // The full-data envelope's result carries no seasonId
        let json = r#"{"resultId": 5, "points": 18}"#;
        let result: RaceResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.result_id, 5);
        assert_eq!(result.season_id, 0);
        assert!((result.points - 18.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_race_detail_error_envelope() {
        let json = r#"{"error": "Race not found"}"#;
        let detail: RaceDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.error.as_deref(), Some("Race not found"));
        assert!(detail.result.is_none());
        assert!(detail.pit_stops.is_none());
    }

    #[test]
    fn test_race_detail_full_envelope_ignores_extra_keys() {
        let json = r#"{
            "driver": {"driverId": 1, "name": "Lewis Hamilton"},
            "race": {"id": 100, "name": "GP A", "seasonId": 10},
            "result": {"resultId": 5, "points": 18},
            "pit_stops": [{"lap": 12, "time": "21.3"}],
            "lap_times": []
        }"#;
        let detail: RaceDetail = serde_json::from_str(json).unwrap();
        assert!(detail.error.is_none());
        assert_eq!(detail.result.unwrap().result_id, 5);
        assert_eq!(detail.pit_stops.unwrap().len(), 1);
        assert!(detail.lap_times.unwrap().is_empty());
    }

    #[test]
    fn test_season_scoped_filter_keys() {
        let race = RaceSummary {
            race_id: 100,
            season_id: 10,
            round: 1,
            name: "GP A".to_string(),
            date: None,
        };
        assert_eq!(race.season_id(), 10);
    }
}
