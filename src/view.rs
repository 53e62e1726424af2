use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::api::{Endpoint, InsightKind, Payload};
use crate::binder::{ResourceData, ResourceState};
use crate::selection::{StatsTab, filter_by_name};
use crate::state::{Match, Team, TeamStatistics};

pub const CREST_PLACEHOLDER: &str = "https://via.placeholder.com/150";
pub const NO_TEAMS: &str = "No teams found";
const MISSING: &str = "-";

/// What a view shows for a binder state. `Loading` also covers `Idle`: a
/// mounted view is idle only until its first cycle starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Body<T> {
    Loading,
    Failed(String),
    Empty(&'static str),
    Ready(T),
}

pub fn render<T>(
    state: &ResourceState<ResourceData>,
    build: impl FnOnce(&ResourceData) -> Body<T>,
) -> Body<T> {
    match state {
        ResourceState::Idle | ResourceState::Loading => Body::Loading,
        ResourceState::Error(message) => Body::Failed(message.clone()),
        ResourceState::Success(data) => build(data),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPanel {
    pub title: &'static str,
    pub items: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamCard {
    pub key: u64,
    pub name: String,
    pub venue: String,
    pub crest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamGrid {
    pub title: String,
    pub cards: Vec<TeamCard>,
}

pub fn dashboard_view(state: &ResourceState<ResourceData>) -> Body<Vec<ListPanel>> {
    render(state, |data| {
        let competitions = payload_rows(data, Endpoint::Competitions, |payload| {
            payload.as_competitions().map(|items| {
                items
                    .iter()
                    .map(|c| single(c.id, c.name.clone()))
                    .collect()
            })
        });
        let teams = payload_rows(data, Endpoint::Teams, |payload| {
            payload
                .as_teams()
                .map(|items| items.iter().map(|t| single(t.id, t.name.clone())).collect())
        });
        let players = payload_rows(data, Endpoint::Players, |payload| {
            payload
                .as_players()
                .map(|items| items.iter().map(|p| single(p.id, p.name.clone())).collect())
        });
        let matches = payload_rows(data, Endpoint::Matches, |payload| {
            payload
                .as_matches()
                .map(|items| items.iter().map(|m| single(m.id, match_line(m))).collect())
        });

        Body::Ready(vec![
            ListPanel {
                title: "Competitions",
                items: competitions,
            },
            ListPanel {
                title: "Teams",
                items: teams,
            },
            ListPanel {
                title: "Players",
                items: players,
            },
            ListPanel {
                title: "Matches",
                items: matches,
            },
        ])
    })
}

pub fn competitions_view(state: &ResourceState<ResourceData>) -> Body<Table> {
    render(state, |data| {
        let competitions = data
            .get(Endpoint::Competitions.key())
            .and_then(|payload| payload.as_competitions())
            .unwrap_or(&[]);
        Body::Ready(Table {
            title: format!("Competitions ({})", competitions.len()),
            header: vec!["Name".to_string(), "Area".to_string()],
            rows: competitions
                .iter()
                .map(|c| Row {
                    key: c.id.to_string(),
                    cells: vec![c.name.clone(), or_missing(c.area.as_deref())],
                })
                .collect(),
        })
    })
}

/// Card grid for the teams that match `query`. The title counts all teams.
pub fn teams_view(state: &ResourceState<ResourceData>, query: &str) -> Body<TeamGrid> {
    render(state, |data| {
        let teams = data
            .get(Endpoint::Teams.key())
            .and_then(|payload| payload.as_teams())
            .unwrap_or(&[]);
        let visible = filter_by_name(teams, query);
        if visible.is_empty() {
            return Body::Empty(NO_TEAMS);
        }
        Body::Ready(TeamGrid {
            title: format!("Teams ({})", teams.len()),
            cards: visible.into_iter().map(team_card).collect(),
        })
    })
}

pub fn team_card(team: &Team) -> TeamCard {
    let crest = team
        .crest
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(CREST_PLACEHOLDER);
    TeamCard {
        key: team.id,
        name: team.name.clone(),
        venue: format!("Venue: {}", non_empty_or_missing(&team.venue)),
        crest: crest.to_string(),
    }
}

pub fn statistics_view(stats: &TeamStatistics, tab: StatsTab) -> Table {
    match tab {
        StatsTab::Overall => Table {
            title: tab.title().to_string(),
            header: vec!["Statistic".to_string(), "Value".to_string()],
            rows: stats
                .overall
                .iter()
                .map(|(key, value)| Row {
                    key: key.clone(),
                    cells: vec![stat_label(key), format_value(value)],
                })
                .collect(),
        },
        StatsTab::TopScorers => Table {
            title: tab.title().to_string(),
            header: vec![
                "Name".to_string(),
                "Goals".to_string(),
                "Assists".to_string(),
                "Avg Minutes".to_string(),
            ],
            rows: stats
                .top_scorers
                .iter()
                .enumerate()
                .map(|(idx, scorer)| Row {
                    key: idx.to_string(),
                    cells: vec![
                        scorer.name.clone(),
                        or_missing(scorer.total_goals.map(|v| v.to_string()).as_deref()),
                        or_missing(scorer.total_assists.map(|v| v.to_string()).as_deref()),
                        format_minutes(scorer.avg_minutes),
                    ],
                })
                .collect(),
        },
        StatsTab::Squad => {
            let squad = &stats.squad;
            let rows = [
                (
                    "Total Players",
                    or_missing(squad.size.map(|v| v.to_string()).as_deref()),
                ),
                ("Total Market Value", format_money(squad.total_market_value)),
                (
                    "Average Player Value",
                    format_money(squad.average_player_value),
                ),
            ];
            Table {
                title: tab.title().to_string(),
                header: vec!["Squad Metric".to_string(), "Value".to_string()],
                rows: rows
                    .into_iter()
                    .map(|(label, value)| Row {
                        key: label.to_string(),
                        cells: vec![label.to_string(), value],
                    })
                    .collect(),
            }
        }
    }
}

/// Generic table over opaque records. Columns come from the first object.
pub fn insight_view(state: &ResourceState<ResourceData>, kind: InsightKind) -> Body<Table> {
    render(state, |data| {
        let records = data
            .get(Endpoint::Insight(kind).key())
            .and_then(|payload| payload.as_records())
            .unwrap_or(&[]);
        let header: Vec<String> = records
            .iter()
            .find_map(Value::as_object)
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default();

        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let key = record
                    .get("id")
                    .map(format_value)
                    .unwrap_or_else(|| idx.to_string());
                let cells = if header.is_empty() {
                    vec![format_value(record)]
                } else {
                    header
                        .iter()
                        .map(|column| record.get(column).map(format_value).unwrap_or_default())
                        .collect()
                };
                Row { key, cells }
            })
            .collect();

        Body::Ready(Table {
            title: format!("{} ({})", kind.title(), records.len()),
            header: header.iter().map(String::as_str).map(stat_label).collect(),
            rows,
        })
    })
}

pub fn match_line(m: &Match) -> String {
    let mut line = format!("{} vs {}", m.home_team.name, m.away_team.name);
    if let (Some(home), Some(away)) = (m.home_score, m.away_score) {
        line.push_str(&format!(" ({home}-{away})"));
    }
    if let Some(date) = m.match_date.as_deref().and_then(format_match_date) {
        line.push_str(&format!(" {date}"));
    }
    line
}

pub fn format_match_date(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.format("%Y-%m-%d %H:%M").to_string());
    }
    const FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
}

/// `goals_per_game` -> `GOALS PER GAME`.
pub fn stat_label(key: &str) -> String {
    key.replace('_', " ").to_uppercase()
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| map.get("id").map(format_value))
            .unwrap_or_else(|| "{...}".to_string()),
    }
}

pub fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => MISSING.to_string(),
    }
}

/// `$` plus a thousands-grouped amount, keeping at most two decimals.
pub fn format_money(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return MISSING.to_string();
    };
    let cents = (v.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let frac = cents % 100;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    let grouped = group_thousands(whole);
    if frac == 0 {
        format!("{sign}${grouped}")
    } else if frac % 10 == 0 {
        format!("{sign}${grouped}.{}", frac / 10)
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn payload_rows(
    data: &ResourceData,
    endpoint: Endpoint,
    rows: impl FnOnce(&Payload) -> Option<Vec<Row>>,
) -> Vec<Row> {
    data.get(endpoint.key()).and_then(rows).unwrap_or_default()
}

fn single(id: u64, text: String) -> Row {
    Row {
        key: id.to_string(),
        cells: vec![text],
    }
}

fn or_missing(value: Option<&str>) -> String {
    match value {
        Some(v) => non_empty_or_missing(v),
        None => MISSING.to_string(),
    }
}

fn non_empty_or_missing(value: &str) -> String {
    if value.trim().is_empty() {
        MISSING.to_string()
    } else {
        value.to_string()
    }
}
