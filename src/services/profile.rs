//! Driver profile aggregation and per-driver view session
//!
//! `load_profile` fans out the seven reads for one driver concurrently and
//! joins them all-or-nothing: either every collection arrived and a complete
//! `DriverProfile` is assembled, or the whole load fails and no partial
//! snapshot exists. `DriverSession` is the explicit per-driver context that
//! holds the snapshot plus the mutable view-state (drill-down selection,
//! season filter), so multiple sessions never share ambient state.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::services::aggregator::Aggregator;
use crate::services::api::DriverDataService;
use crate::types::{
    Driver, LapTime, PitStop, QualifyingResult, RaceDetail, RaceResult, RaceSummary, Result,
    Season, SprintResult, StandingEntry,
};

/// Complete snapshot for one driver: the seven fetched collections plus the
/// two structures derived from them.
#[derive(Debug, Clone, Serialize)]
pub struct DriverProfile {
    pub driver: Driver,
    pub results: Vec<RaceResult>,
    pub races: Vec<RaceSummary>,
    pub qualifying: Vec<QualifyingResult>,
    pub standings: Vec<StandingEntry>,
    pub sprint_results: Vec<SprintResult>,
    pub seasons: Vec<Season>,
    /// season id -> display year; last write wins on duplicate ids
    pub season_years: HashMap<u32, u32>,
    /// distinct season ids from the races collection, first-appearance order
    pub season_ids: Vec<u32>,
}

impl DriverProfile {
    /// Merge the seven raw collections and derive the lookup structures
    pub fn assemble(
        driver: Driver,
        results: Vec<RaceResult>,
        races: Vec<RaceSummary>,
        qualifying: Vec<QualifyingResult>,
        standings: Vec<StandingEntry>,
        sprint_results: Vec<SprintResult>,
        seasons: Vec<Season>,
    ) -> Self {
        let season_years: HashMap<u32, u32> =
            seasons.iter().map(|s| (s.season_id, s.year)).collect();

        let mut seen = HashSet::new();
        let season_ids: Vec<u32> = races
            .iter()
            .map(|r| r.season_id)
            .filter(|id| seen.insert(*id))
            .collect();

        Self {
            driver,
            results,
            races,
            qualifying,
            standings,
            sprint_results,
            seasons,
            season_years,
            season_ids,
        }
    }

    /// Display year for a season id, if the season list knows it
    pub fn season_year(&self, season_id: u32) -> Option<u32> {
        self.season_years.get(&season_id).copied()
    }

    /// Career points summed over all standing entries
    pub fn total_points(&self) -> f64 {
        Aggregator::total_points(&self.standings)
    }

    /// Race name lookup for tables keyed by race id
    pub fn race_name(&self, race_id: u32) -> Option<&str> {
        self.races
            .iter()
            .find(|r| r.race_id == race_id)
            .map(|r| r.name.as_str())
    }
}

/// Fetch the seven resources for one driver concurrently and merge them.
/// Fails as a whole if any single request fails; no partial snapshot is
/// ever produced.
pub async fn load_profile<S: DriverDataService + Sync>(
    service: &S,
    driver_id: u32,
) -> Result<DriverProfile> {
    let (driver, results, races, qualifying, standings, sprint_results, seasons) = tokio::try_join!(
        service.driver(driver_id),
        service.results(driver_id),
        service.races(driver_id),
        service.qualifying(driver_id),
        service.standings(driver_id),
        service.sprint_results(driver_id),
        service.seasons(),
    )?;

    Ok(DriverProfile::assemble(
        driver,
        results,
        races,
        qualifying,
        standings,
        sprint_results,
        seasons,
    ))
}

/// Per-driver view session: the held snapshot plus drill-down and filter
/// state. The displayed results collection starts as a copy of the profile's
/// and is replaced by a drill-down; the profile itself is never mutated, so
/// deselecting can restore it without a re-fetch.
#[derive(Debug)]
pub struct DriverSession {
    driver_id: u32,
    profile: DriverProfile,
    results: Vec<RaceResult>,
    pit_stops: Vec<PitStop>,
    lap_times: Vec<LapTime>,
    selected_race: Option<u32>,
    season_filter: Option<u32>,
    detail_warning: Option<String>,
}

impl DriverSession {
    pub fn new(driver_id: u32, profile: DriverProfile) -> Self {
        let results = profile.results.clone();
        Self {
            driver_id,
            profile,
            results,
            pit_stops: Vec::new(),
            lap_times: Vec::new(),
            selected_race: None,
            season_filter: None,
            detail_warning: None,
        }
    }

    pub fn driver_id(&self) -> u32 {
        self.driver_id
    }

    pub fn profile(&self) -> &DriverProfile {
        &self.profile
    }

    pub fn driver(&self) -> &Driver {
        &self.profile.driver
    }

    /// Displayed races, restricted by the season filter
    pub fn races(&self) -> Vec<&RaceSummary> {
        Aggregator::filter_by_season(&self.profile.races, self.season_filter)
    }

    /// Displayed results, restricted by the season filter. After a drill-down
    /// this is the singleton (or empty) collection the full-data endpoint
    /// returned.
    pub fn results(&self) -> Vec<&RaceResult> {
        Aggregator::filter_by_season(&self.results, self.season_filter)
    }

    pub fn qualifying(&self) -> &[QualifyingResult] {
        &self.profile.qualifying
    }

    pub fn standings(&self) -> &[StandingEntry] {
        &self.profile.standings
    }

    pub fn sprint_results(&self) -> &[SprintResult] {
        &self.profile.sprint_results
    }

    pub fn pit_stops(&self) -> &[PitStop] {
        &self.pit_stops
    }

    pub fn lap_times(&self) -> &[LapTime] {
        &self.lap_times
    }

    pub fn total_points(&self) -> f64 {
        self.profile.total_points()
    }

    pub fn season_filter(&self) -> Option<u32> {
        self.season_filter
    }

    pub fn selected_race(&self) -> Option<u32> {
        self.selected_race
    }

    pub fn detail_warning(&self) -> Option<&str> {
        self.detail_warning.as_deref()
    }

    /// Advance the season filter: All -> each season in display order -> All.
    /// Only affects what the accessors return; fetched data is untouched.
    pub fn cycle_season_filter(&mut self) {
        let ids = &self.profile.season_ids;
        self.season_filter = match self.season_filter {
            None => ids.first().copied(),
            Some(current) => ids
                .iter()
                .position(|&id| id == current)
                .and_then(|pos| ids.get(pos + 1))
                .copied(),
        };
    }

    pub fn set_season_filter(&mut self, season: Option<u32>) {
        self.season_filter = season;
    }

    /// Begin a drill-down. Clears the pit-stop and lap-time collections and
    /// any previous warning *before* the fetch is issued, so stale data from
    /// an earlier race can never show alongside the new selection.
    pub fn select_race(&mut self, race_id: u32) {
        self.selected_race = Some(race_id);
        self.pit_stops.clear();
        self.lap_times.clear();
        self.detail_warning = None;
    }

    /// Apply a drill-down response. Discarded when `race_id` is no longer the
    /// selected race (a late response for a superseded selection). An
    /// application-level error leaves the cleared panels empty and records a
    /// warning; the results collection keeps whatever it last held. Otherwise
    /// the response replaces results, pit stops and lap times, and nothing
    /// else.
    pub fn apply_race_detail(&mut self, race_id: u32, detail: RaceDetail) {
        if self.selected_race != Some(race_id) {
            return;
        }

        if let Some(error) = detail.error {
            self.detail_warning = Some(error);
            return;
        }

        self.results = detail.result.into_iter().collect();
        self.pit_stops = detail.pit_stops.unwrap_or_default();
        self.lap_times = detail.lap_times.unwrap_or_default();
    }

    /// Transport-level drill-down failure: surfaced as a warning, without
    /// reverting or touching the profile snapshot.
    pub fn record_detail_failure(&mut self, message: impl Into<String>) {
        self.detail_warning = Some(message.into());
    }

    /// Clear the drill-down and restore the displayed results from the held
    /// profile, without re-fetching.
    pub fn deselect_race(&mut self) {
        self.selected_race = None;
        self.pit_stops.clear();
        self.lap_times.clear();
        self.detail_warning = None;
        self.results = self.profile.results.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaddockError;
    use async_trait::async_trait;

    fn make_driver(id: u32) -> Driver {
        Driver {
            driver_id: id,
            driver_ref: "hamilton".to_string(),
            number: Some(44),
            code: Some("HAM".to_string()),
            forename: "Lewis".to_string(),
            surname: "Hamilton".to_string(),
            dob: None,
            nationality: Some("British".to_string()),
        }
    }

    fn make_race(race_id: u32, season_id: u32, name: &str) -> RaceSummary {
        RaceSummary {
            race_id,
            season_id,
            round: 1,
            name: name.to_string(),
            date: None,
        }
    }

    fn make_result(result_id: u32, race_id: u32, season_id: u32, points: f64) -> RaceResult {
        RaceResult {
            result_id,
            race_id,
            season_id,
            points,
            position: None,
            fastest_lap_speed: None,
        }
    }

    fn make_standing(id: u32, points: f64) -> StandingEntry {
        StandingEntry {
            driver_standings_id: id,
            race_id: id,
            points,
            position: None,
            wins: None,
        }
    }

    fn sample_profile() -> DriverProfile {
        DriverProfile::assemble(
            make_driver(1),
            vec![
                make_result(1, 100, 10, 25.0),
                make_result(2, 101, 11, 18.0),
            ],
            vec![make_race(100, 10, "GP A"), make_race(101, 11, "GP B")],
            Vec::new(),
            vec![make_standing(1, 10.0), make_standing(2, 15.5)],
            Vec::new(),
            vec![
                Season {
                    season_id: 10,
                    year: 2020,
                },
                Season {
                    season_id: 11,
                    year: 2021,
                },
            ],
        )
    }

    /// In-memory service; `fail` names the one endpoint that errors
    struct MockService {
        fail: Option<&'static str>,
    }

    impl MockService {
        fn ok() -> Self {
            Self { fail: None }
        }

        fn failing(endpoint: &'static str) -> Self {
            Self {
                fail: Some(endpoint),
            }
        }

        fn check(&self, endpoint: &'static str) -> Result<()> {
            if self.fail == Some(endpoint) {
                Err(PaddockError::Status {
                    path: format!("/{}", endpoint),
                    status: 500,
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DriverDataService for MockService {
        async fn driver(&self, driver_id: u32) -> Result<Driver> {
            self.check("driver")?;
            Ok(make_driver(driver_id))
        }

        async fn results(&self, _driver_id: u32) -> Result<Vec<RaceResult>> {
            self.check("results")?;
            Ok(vec![make_result(1, 100, 10, 25.0)])
        }

        async fn races(&self, _driver_id: u32) -> Result<Vec<RaceSummary>> {
            self.check("races")?;
            Ok(vec![make_race(100, 10, "GP A"), make_race(101, 11, "GP B")])
        }

        async fn qualifying(&self, _driver_id: u32) -> Result<Vec<QualifyingResult>> {
            self.check("qualifying")?;
            Ok(Vec::new())
        }

        async fn standings(&self, _driver_id: u32) -> Result<Vec<StandingEntry>> {
            self.check("standings")?;
            Ok(vec![make_standing(1, 10.0)])
        }

        async fn sprint_results(&self, _driver_id: u32) -> Result<Vec<SprintResult>> {
            self.check("sprint_results")?;
            Ok(Vec::new())
        }

        async fn seasons(&self) -> Result<Vec<Season>> {
            self.check("seasons")?;
            Ok(vec![
                Season {
                    season_id: 10,
                    year: 2020,
                },
                Season {
                    season_id: 11,
                    year: 2021,
                },
            ])
        }

        async fn race_detail(&self, _driver_id: u32, _race_id: u32) -> Result<RaceDetail> {
            self.check("race_detail")?;
            Ok(RaceDetail::default())
        }
    }

    // ========== load_profile tests ==========

    #[tokio::test]
    async fn test_load_profile_merges_all_collections() {
        let profile = load_profile(&MockService::ok(), 1).await.unwrap();
        assert_eq!(profile.driver.driver_id, 1);
        assert_eq!(profile.races.len(), 2);
        assert_eq!(profile.results.len(), 1);
        assert_eq!(profile.seasons.len(), 2);
    }

    #[tokio::test]
    async fn test_load_profile_derives_season_lookups() {
        let profile = load_profile(&MockService::ok(), 1).await.unwrap();
        assert_eq!(profile.season_year(10), Some(2020));
        assert_eq!(profile.season_year(11), Some(2021));
        assert_eq!(profile.season_ids, vec![10, 11]);
    }

    #[tokio::test]
    async fn test_load_profile_any_failure_fails_whole_load() {
        for endpoint in [
            "driver",
            "results",
            "races",
            "qualifying",
            "standings",
            "sprint_results",
            "seasons",
        ] {
            let result = load_profile(&MockService::failing(endpoint), 1).await;
            assert!(result.is_err(), "{} failure must fail the load", endpoint);
        }
    }

    // ========== DriverProfile derivation tests ==========

    #[test]
    fn test_assemble_season_map_scenario() {
        let profile = sample_profile();
        assert_eq!(profile.season_years[&10], 2020);
        assert_eq!(profile.season_years[&11], 2021);
        assert_eq!(profile.season_ids, vec![10, 11]);
    }

    #[test]
    fn test_duplicate_season_id_last_write_wins() {
        let profile = DriverProfile::assemble(
            make_driver(1),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            vec![
                Season {
                    season_id: 10,
                    year: 2019,
                },
                Season {
                    season_id: 10,
                    year: 2020,
                },
            ],
        );
        assert_eq!(profile.season_year(10), Some(2020));
    }

    #[test]
    fn test_season_ids_dedup_preserves_first_appearance() {
        let profile = DriverProfile::assemble(
            make_driver(1),
            Vec::new(),
            vec![
                make_race(1, 11, "GP A"),
                make_race(2, 10, "GP B"),
                make_race(3, 11, "GP C"),
            ],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(profile.season_ids, vec![11, 10]);
    }

    #[test]
    fn test_total_points_scenario() {
        let profile = sample_profile();
        assert!((profile.total_points() - 25.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_race_name_lookup() {
        let profile = sample_profile();
        assert_eq!(profile.race_name(100), Some("GP A"));
        assert_eq!(profile.race_name(999), None);
    }

    // ========== DriverSession drill-down tests ==========

    #[test]
    fn test_select_race_clears_panels_before_response() {
        let mut session = DriverSession::new(1, sample_profile());
        session.pit_stops = vec![PitStop {
            lap: 12,
            stop: None,
            time: Some("21.3".to_string()),
            duration: None,
        }];
        session.lap_times = vec![LapTime {
            lap: 1,
            position: None,
            time: Some("1:31.044".to_string()),
            milliseconds: None,
        }];

        session.select_race(101);

        // Intermediate state, before any response has arrived
        assert!(session.pit_stops().is_empty());
        assert!(session.lap_times().is_empty());
        assert_eq!(session.selected_race(), Some(101));
    }

    #[test]
    fn test_apply_detail_replaces_results_and_panels() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);

        session.apply_race_detail(
            100,
            RaceDetail {
                error: None,
                result: Some(make_result(5, 100, 10, 18.0)),
                pit_stops: Some(vec![PitStop {
                    lap: 12,
                    stop: None,
                    time: Some("21.3".to_string()),
                    duration: None,
                }]),
                lap_times: Some(Vec::new()),
            },
        );

        let results = session.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].result_id, 5);
        assert!((results[0].points - 18.0).abs() < f64::EPSILON);
        assert_eq!(session.pit_stops().len(), 1);
        assert!(session.lap_times().is_empty());
    }

    #[test]
    fn test_apply_detail_error_degrades_to_empty_panels() {
        let mut session = DriverSession::new(1, sample_profile());
        let results_before: Vec<u32> = session.results().iter().map(|r| r.result_id).collect();

        session.select_race(100);
        session.apply_race_detail(
            100,
            RaceDetail {
                error: Some("no data".to_string()),
                ..RaceDetail::default()
            },
        );

        assert!(session.pit_stops().is_empty());
        assert!(session.lap_times().is_empty());
        assert_eq!(session.detail_warning(), Some("no data"));
        // Results left at whatever the profile load last set
        let results_after: Vec<u32> = session.results().iter().map(|r| r.result_id).collect();
        assert_eq!(results_before, results_after);
    }

    #[test]
    fn test_apply_detail_missing_result_empties_results() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);
        session.apply_race_detail(100, RaceDetail::default());
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_stale_race_detail_discarded() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);
        session.select_race(101);

        // Late response for the superseded selection
        session.apply_race_detail(
            100,
            RaceDetail {
                error: None,
                result: Some(make_result(5, 100, 10, 18.0)),
                pit_stops: Some(vec![PitStop {
                    lap: 12,
                    stop: None,
                    time: None,
                    duration: None,
                }]),
                lap_times: None,
            },
        );

        assert!(session.pit_stops().is_empty());
        assert_eq!(session.results().len(), 2);
    }

    #[test]
    fn test_reselect_clears_previous_race_data() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);
        session.apply_race_detail(
            100,
            RaceDetail {
                error: None,
                result: None,
                pit_stops: Some(vec![PitStop {
                    lap: 3,
                    stop: None,
                    time: None,
                    duration: None,
                }]),
                lap_times: None,
            },
        );
        assert_eq!(session.pit_stops().len(), 1);

        // RaceSelected -> RaceSelected(new) clears as part of the transition
        session.select_race(101);
        assert!(session.pit_stops().is_empty());
    }

    #[test]
    fn test_deselect_restores_profile_results() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);
        session.apply_race_detail(
            100,
            RaceDetail {
                error: None,
                result: Some(make_result(5, 100, 10, 18.0)),
                pit_stops: None,
                lap_times: None,
            },
        );
        assert_eq!(session.results().len(), 1);

        session.deselect_race();

        assert_eq!(session.selected_race(), None);
        assert_eq!(session.results().len(), 2);
        assert!(session.pit_stops().is_empty());
    }

    #[test]
    fn test_detail_failure_records_warning_only() {
        let mut session = DriverSession::new(1, sample_profile());
        session.select_race(100);
        session.record_detail_failure("connection refused");

        assert_eq!(session.detail_warning(), Some("connection refused"));
        assert_eq!(session.profile().races.len(), 2);
    }

    // ========== season filter tests ==========

    #[test]
    fn test_season_filter_restricts_races_and_results() {
        let mut session = DriverSession::new(1, sample_profile());
        session.set_season_filter(Some(10));

        assert_eq!(session.races().len(), 1);
        assert_eq!(session.races()[0].race_id, 100);
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.results()[0].result_id, 1);
    }

    #[test]
    fn test_season_filter_does_not_mutate_fetched_data() {
        let mut session = DriverSession::new(1, sample_profile());
        session.set_season_filter(Some(10));
        session.set_season_filter(None);

        assert_eq!(session.races().len(), 2);
        assert_eq!(session.results().len(), 2);
    }

    #[test]
    fn test_cycle_season_filter_wraps() {
        let mut session = DriverSession::new(1, sample_profile());
        assert_eq!(session.season_filter(), None);

        session.cycle_season_filter();
        assert_eq!(session.season_filter(), Some(10));

        session.cycle_season_filter();
        assert_eq!(session.season_filter(), Some(11));

        session.cycle_season_filter();
        assert_eq!(session.season_filter(), None);
    }

    #[test]
    fn test_cycle_season_filter_no_seasons() {
        let profile = DriverProfile::assemble(
            make_driver(1),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let mut session = DriverSession::new(1, profile);
        session.cycle_season_filter();
        assert_eq!(session.season_filter(), None);
    }
}
