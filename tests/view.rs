use serde_json::json;

use football_dashboard::api::{Endpoint, InsightKind, Payload, parse_team_statistics_json};
use football_dashboard::binder::{ResourceData, ResourceState};
use football_dashboard::selection::StatsTab;
use football_dashboard::state::{Match, Team, TeamRef};
use football_dashboard::view::{
    self, Body, CREST_PLACEHOLDER, format_match_date, format_minutes, format_money, format_value,
    stat_label,
};

fn success(name: &str, payload: Payload) -> ResourceState<ResourceData> {
    let mut data = ResourceData::new();
    data.insert(name, payload);
    ResourceState::Success(data)
}

#[test]
fn loading_and_error_states_render_as_status() {
    let loading: ResourceState<ResourceData> = ResourceState::Loading;
    assert_eq!(view::competitions_view(&loading), Body::Loading);
    assert_eq!(view::competitions_view(&ResourceState::Idle), Body::Loading);

    let failed = ResourceState::Error("Failed to load teams. Please try again later.".to_string());
    assert_eq!(
        view::teams_view(&failed, ""),
        Body::Failed("Failed to load teams. Please try again later.".to_string())
    );
}

#[test]
fn competitions_table_lists_name_and_area() {
    let state = success(
        "competitions",
        Endpoint::Competitions
            .decode(r#"[{"id": 4, "name": "Serie A", "country": "Italy"}, {"id": 5, "name": "Cup"}]"#)
            .unwrap(),
    );
    let Body::Ready(table) = view::competitions_view(&state) else {
        panic!("expected a table");
    };
    assert_eq!(table.title, "Competitions (2)");
    assert_eq!(table.header, vec!["Name", "Area"]);
    assert_eq!(table.rows[0].key, "4");
    assert_eq!(table.rows[0].cells, vec!["Serie A", "Italy"]);
    assert_eq!(table.rows[1].cells, vec!["Cup", "-"]);
}

#[test]
fn empty_competitions_render_empty_table_not_affordance() {
    let state = success("competitions", Payload::Competitions(Vec::new()));
    let Body::Ready(table) = view::competitions_view(&state) else {
        panic!("expected a table");
    };
    assert!(table.rows.is_empty());
}

#[test]
fn team_cards_use_placeholder_crest_and_venue_line() {
    let teams = vec![
        Team {
            id: 1,
            name: "Arsenal".to_string(),
            venue: "Emirates Stadium".to_string(),
            crest: Some("https://crest/1.png".to_string()),
            short_name: None,
            founded: None,
            website: None,
        },
        Team {
            id: 2,
            name: "Chelsea".to_string(),
            venue: String::new(),
            crest: None,
            short_name: None,
            founded: None,
            website: None,
        },
    ];
    let state = success("teams", Payload::Teams(teams));
    let Body::Ready(grid) = view::teams_view(&state, "") else {
        panic!("expected cards");
    };
    assert_eq!(grid.title, "Teams (2)");
    assert_eq!(grid.cards[0].venue, "Venue: Emirates Stadium");
    assert_eq!(grid.cards[0].crest, "https://crest/1.png");
    assert_eq!(grid.cards[1].venue, "Venue: -");
    assert_eq!(grid.cards[1].crest, CREST_PLACEHOLDER);

    let Body::Ready(filtered) = view::teams_view(&state, "chel") else {
        panic!("expected cards");
    };
    assert_eq!(filtered.title, "Teams (2)");
    assert_eq!(filtered.cards.len(), 1);
    assert_eq!(filtered.cards[0].key, 2);
}

#[test]
fn dashboard_has_four_panels_in_order() {
    let mut data = ResourceData::new();
    data.insert("competitions", Payload::Competitions(Vec::new()));
    data.insert("teams", Payload::Teams(Vec::new()));
    data.insert("players", Payload::Players(Vec::new()));
    data.insert(
        "matches",
        Payload::Matches(vec![Match {
            id: 9,
            home_team: TeamRef {
                name: "Arsenal".to_string(),
            },
            away_team: TeamRef {
                name: "Chelsea".to_string(),
            },
            status: None,
            match_date: None,
            matchday: None,
            home_score: None,
            away_score: None,
        }]),
    );
    let Body::Ready(panels) = view::dashboard_view(&ResourceState::Success(data)) else {
        panic!("expected panels");
    };
    let titles: Vec<&str> = panels.iter().map(|p| p.title).collect();
    assert_eq!(titles, vec!["Competitions", "Teams", "Players", "Matches"]);
    assert_eq!(panels[3].items[0].cells, vec!["Arsenal vs Chelsea"]);
}

#[test]
fn statistics_tabs_format_like_the_dashboard() {
    let stats = parse_team_statistics_json(
        r#"{
            "overall": {"matches_played": 38, "goals_per_game": 2.5, "form": "WWDLW"},
            "top_scorers": [{"name": "Saka", "total_goals": 16, "total_assists": 9, "avg_minutes": 84.456}],
            "squad": {"size": 27, "total_market_value": 1150000000, "average_player_value": 42592592.59}
        }"#,
    )
    .unwrap();

    let overall = view::statistics_view(&stats, StatsTab::Overall);
    assert_eq!(overall.header, vec!["Statistic", "Value"]);
    assert_eq!(overall.rows[0].cells, vec!["MATCHES PLAYED", "38"]);
    assert_eq!(overall.rows[1].cells, vec!["GOALS PER GAME", "2.5"]);
    assert_eq!(overall.rows[2].cells, vec!["FORM", "WWDLW"]);

    let scorers = view::statistics_view(&stats, StatsTab::TopScorers);
    assert_eq!(scorers.rows[0].cells, vec!["Saka", "16", "9", "84.46"]);

    let squad = view::statistics_view(&stats, StatsTab::Squad);
    assert_eq!(squad.rows[0].cells, vec!["Total Players", "27"]);
    assert_eq!(squad.rows[1].cells, vec!["Total Market Value", "$1,150,000,000"]);
    assert_eq!(
        squad.rows[2].cells,
        vec!["Average Player Value", "$42,592,592.59"]
    );
}

#[test]
fn insight_table_uses_first_record_keys() {
    let state = success(
        "records",
        Endpoint::Insight(InsightKind::HeadToHead)
            .decode(
                r#"[
                    {"id": 1, "team1": {"id": 3, "name": "Arsenal"}, "draws": 2, "note": null},
                    {"id": 2, "team1": {"id": 4, "name": "Chelsea"}, "draws": 0}
                ]"#,
            )
            .unwrap(),
    );
    let Body::Ready(table) = view::insight_view(&state, InsightKind::HeadToHead) else {
        panic!("expected a table");
    };
    assert_eq!(table.title, "Head to Head (2)");
    assert_eq!(table.header, vec!["ID", "TEAM1", "DRAWS", "NOTE"]);
    assert_eq!(table.rows[0].cells, vec!["1", "Arsenal", "2", "-"]);
    assert_eq!(table.rows[1].cells, vec!["2", "Chelsea", "0", ""]);
}

#[test]
fn value_and_number_formatting() {
    assert_eq!(stat_label("clean_sheets"), "CLEAN SHEETS");
    assert_eq!(format_value(&json!(null)), "-");
    assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
    assert_eq!(format_value(&json!({"id": 12})), "12");
    assert_eq!(format_minutes(Some(90.0)), "90.00");
    assert_eq!(format_minutes(None), "-");
    assert_eq!(format_money(Some(999.0)), "$999");
    assert_eq!(format_money(Some(1234.5)), "$1,234.5");
    assert_eq!(format_money(None), "-");
}

#[test]
fn match_dates_are_normalized() {
    assert_eq!(
        format_match_date("2024-08-17T14:00:00Z").as_deref(),
        Some("2024-08-17 14:00")
    );
    assert_eq!(
        format_match_date("2024-08-24T16:30:00").as_deref(),
        Some("2024-08-24 16:30")
    );
    assert_eq!(format_match_date("soon"), None);
}
