use std::collections::HashMap;
use std::time::Duration;

use football_dashboard::api::{Endpoint, InsightKind, Payload};
use football_dashboard::binder::{BinderId, ResourceData, ResourceState, Settled};
use football_dashboard::config::{Config, DEFAULT_API_URL};
use football_dashboard::state::{AppState, Delta, Screen, apply_delta};

#[test]
fn dashboard_mount_requests_all_four_collections() {
    let mut state = AppState::new(Screen::Dashboard);
    let cycle = state.mount(Screen::Dashboard).expect("first mount fetches");
    let endpoints: Vec<Endpoint> = cycle.descriptors.iter().map(|d| d.endpoint).collect();
    assert_eq!(
        endpoints,
        vec![
            Endpoint::Competitions,
            Endpoint::Teams,
            Endpoint::Players,
            Endpoint::Matches,
        ]
    );
    assert!(state.mount(Screen::Dashboard).is_none());
}

#[test]
fn switching_screens_unmounts_and_discards_in_flight() {
    let mut state = AppState::new(Screen::Competitions);
    let first = state.mount(Screen::Competitions).unwrap();

    let teams = state.mount(Screen::Teams).expect("teams mount fetches");
    assert_eq!(teams.binder, BinderId::Teams);
    assert_eq!(state.competitions.state(), &ResourceState::Idle);

    // The competitions response lands after the user left.
    assert_eq!(
        state.settle(BinderId::Competitions, first.generation, Ok(ResourceData::new())),
        Settled::Discarded
    );

    // Coming back is a new mount with a new cycle.
    let again = state.mount(Screen::Competitions).expect("revisit refetches");
    assert!(again.generation > first.generation);
}

#[test]
fn teams_unmount_clears_query_and_overlay() {
    let mut state = AppState::new(Screen::Teams);
    let cycle = state.mount(Screen::Teams).unwrap();
    let teams = Endpoint::Teams
        .decode(r#"[{"id": 1, "name": "Arsenal", "venue": "Emirates"}]"#)
        .unwrap();
    let mut data = ResourceData::new();
    data.insert("teams", teams);
    state.settle(BinderId::Teams, cycle.generation, Ok(data));

    state.teams.push_query('a');
    let stats = state.open_selected_team().expect("select fetches statistics");

    state.mount(Screen::Dashboard);
    assert!(state.teams.query.is_empty());
    assert!(!state.teams.selection.is_open());
    assert_eq!(
        state.settle(BinderId::TeamStatistics, stats.generation, Ok(ResourceData::new())),
        Settled::Discarded
    );

    let remount = state.mount(Screen::Teams).expect("teams refetch on revisit");
    assert!(remount.generation > cycle.generation);
}

#[test]
fn insight_switch_rebinds_and_drops_previous_dataset() {
    let mut state = AppState::new(Screen::Insights);
    let first = state.mount(Screen::Insights).unwrap();
    assert_eq!(
        first.descriptors[0].endpoint,
        Endpoint::Insight(InsightKind::MatchStatistics)
    );

    let second = state.next_insight().expect("new dataset fetches");
    assert_eq!(
        second.descriptors[0].endpoint,
        Endpoint::Insight(InsightKind::SeasonTeamPerformances)
    );

    apply_delta(
        &mut state,
        Delta::Settled {
            binder: BinderId::Insights,
            generation: first.generation,
            outcome: Ok(ResourceData::new()),
        },
    );
    assert!(state.insights.state().is_loading());

    let mut data = ResourceData::new();
    data.insert("records", Payload::Records(Vec::new()));
    apply_delta(
        &mut state,
        Delta::Settled {
            binder: BinderId::Insights,
            generation: second.generation,
            outcome: Ok(data),
        },
    );
    assert!(state.insights.state().data().is_some());

    let back = state.prev_insight().expect("switching back refetches");
    assert_eq!(
        back.descriptors[0].endpoint,
        Endpoint::Insight(InsightKind::MatchStatistics)
    );
}

#[test]
fn insight_kind_wraps_around() {
    assert_eq!(InsightKind::HeadToHead.next(), InsightKind::MatchStatistics);
    assert_eq!(InsightKind::MatchStatistics.prev(), InsightKind::HeadToHead);
}

#[test]
fn reload_targets_overlay_when_open() {
    let mut state = AppState::new(Screen::Teams);
    let cycle = state.mount(Screen::Teams).unwrap();
    let mut data = ResourceData::new();
    data.insert(
        "teams",
        Endpoint::Teams.decode(r#"[{"id": 8, "name": "Everton"}]"#).unwrap(),
    );
    state.settle(BinderId::Teams, cycle.generation, Ok(data));

    assert_eq!(state.reload().map(|c| c.binder), Some(BinderId::Teams));
    state.settle(
        BinderId::Teams,
        state.teams.binder.generation(),
        Err("Failed to load teams. Please try again later.".to_string()),
    );
    assert_eq!(
        state.teams.binder.state().error(),
        Some("Failed to load teams. Please try again later.")
    );

    let reload = state.reload().expect("retry after error");
    state.settle(BinderId::Teams, reload.generation, {
        let mut data = ResourceData::new();
        data.insert(
            "teams",
            Endpoint::Teams.decode(r#"[{"id": 8, "name": "Everton"}]"#).unwrap(),
        );
        Ok(data)
    });

    state.open_selected_team().expect("select fetches statistics");
    assert_eq!(
        state.reload().map(|c| c.binder),
        Some(BinderId::TeamStatistics)
    );
}

#[test]
fn log_is_bounded() {
    let mut state = AppState::new(Screen::Dashboard);
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] line 249"));
}

#[test]
fn config_defaults_and_clamps() {
    let config = Config::default();
    assert_eq!(config.api_url, DEFAULT_API_URL);
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.start_screen, Screen::Dashboard);

    let vars: HashMap<&str, &str> = HashMap::from([
        ("FOOTBALL_API_URL", " http://192.168.1.8:8001/ "),
        ("HTTP_TIMEOUT_SECS", "0"),
        ("FETCH_PARALLELISM", "100"),
        ("TICK_MS", "abc"),
        ("START_SCREEN", "Teams"),
    ]);
    let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(config.api_url, "http://192.168.1.8:8001");
    assert_eq!(config.request_timeout, Duration::from_secs(1));
    assert_eq!(config.fetch_parallelism, 32);
    assert_eq!(config.tick_rate, Duration::from_millis(250));
    assert_eq!(config.start_screen, Screen::Teams);
}

#[test]
fn scroll_stops_at_last_row() {
    let mut state = AppState::new(Screen::Competitions);
    let cycle = state.mount(Screen::Competitions).unwrap();
    state.scroll_down();
    assert_eq!(state.scroll, 0);

    let mut data = ResourceData::new();
    data.insert(
        "competitions",
        Endpoint::Competitions
            .decode(r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}, {"id": 3, "name": "C"}]"#)
            .unwrap(),
    );
    state.settle(BinderId::Competitions, cycle.generation, Ok(data));
    assert_eq!(state.scroll_rows(), 3);

    for _ in 0..10 {
        state.scroll_down();
    }
    assert_eq!(state.scroll, 2);
    state.scroll_up();
    assert_eq!(state.scroll, 1);
}
