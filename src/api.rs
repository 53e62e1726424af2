use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::state::{Competition, Match, Player, Team, TeamStatistics};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsightKind {
    MatchStatistics,
    SeasonTeamPerformances,
    PlayerStatistics,
    SeasonPlayerStats,
    TeamFormGuide,
    HeadToHead,
}

impl InsightKind {
    pub const ALL: [InsightKind; 6] = [
        InsightKind::MatchStatistics,
        InsightKind::SeasonTeamPerformances,
        InsightKind::PlayerStatistics,
        InsightKind::SeasonPlayerStats,
        InsightKind::TeamFormGuide,
        InsightKind::HeadToHead,
    ];

    fn slug(self) -> &'static str {
        match self {
            InsightKind::MatchStatistics => "match-statistics",
            InsightKind::SeasonTeamPerformances => "season-team-performances",
            InsightKind::PlayerStatistics => "player-statistics",
            InsightKind::SeasonPlayerStats => "season-player-stats",
            InsightKind::TeamFormGuide => "team-form-guide",
            InsightKind::HeadToHead => "head-to-head",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            InsightKind::MatchStatistics => "Match Statistics",
            InsightKind::SeasonTeamPerformances => "Season Team Performances",
            InsightKind::PlayerStatistics => "Player Statistics",
            InsightKind::SeasonPlayerStats => "Season Player Stats",
            InsightKind::TeamFormGuide => "Team Form Guide",
            InsightKind::HeadToHead => "Head to Head",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// One GET resource exposed by the analytics backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Competitions,
    Teams,
    Players,
    Matches,
    TeamStatistics { team_id: u64 },
    Insight(InsightKind),
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Competitions => "/competitions/".to_string(),
            Endpoint::Teams => "/teams/".to_string(),
            Endpoint::Players => "/players/".to_string(),
            Endpoint::Matches => "/matches/".to_string(),
            Endpoint::TeamStatistics { team_id } => format!("/teams/{team_id}/statistics/"),
            Endpoint::Insight(kind) => format!("/{}/", kind.slug()),
        }
    }

    /// Default descriptor name, also the key a payload is stored under.
    pub fn key(&self) -> &'static str {
        match self {
            Endpoint::Competitions => "competitions",
            Endpoint::Teams => "teams",
            Endpoint::Players => "players",
            Endpoint::Matches => "matches",
            Endpoint::TeamStatistics { .. } => "team_statistics",
            Endpoint::Insight(_) => "records",
        }
    }

    /// Human wording used in "Failed to load ..." messages.
    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Competitions => "competitions",
            Endpoint::Teams => "teams",
            Endpoint::Players => "players",
            Endpoint::Matches => "matches",
            Endpoint::TeamStatistics { .. } => "team statistics",
            Endpoint::Insight(InsightKind::MatchStatistics) => "match statistics",
            Endpoint::Insight(InsightKind::SeasonTeamPerformances) => "season team performances",
            Endpoint::Insight(InsightKind::PlayerStatistics) => "player statistics",
            Endpoint::Insight(InsightKind::SeasonPlayerStats) => "season player stats",
            Endpoint::Insight(InsightKind::TeamFormGuide) => "team form guide",
            Endpoint::Insight(InsightKind::HeadToHead) => "head-to-head records",
        }
    }

    pub fn decode(&self, raw: &str) -> Result<Payload> {
        match self {
            Endpoint::Competitions => parse_competitions_json(raw).map(Payload::Competitions),
            Endpoint::Teams => parse_teams_json(raw).map(Payload::Teams),
            Endpoint::Players => parse_players_json(raw).map(Payload::Players),
            Endpoint::Matches => parse_matches_json(raw).map(Payload::Matches),
            Endpoint::TeamStatistics { .. } => {
                parse_team_statistics_json(raw).map(Payload::TeamStatistics)
            }
            Endpoint::Insight(_) => parse_records_json(raw).map(Payload::Records),
        }
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Competitions(Vec<Competition>),
    Teams(Vec<Team>),
    Players(Vec<Player>),
    Matches(Vec<Match>),
    TeamStatistics(TeamStatistics),
    Records(Vec<Value>),
}

impl Payload {
    pub fn as_competitions(&self) -> Option<&[Competition]> {
        match self {
            Payload::Competitions(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_teams(&self) -> Option<&[Team]> {
        match self {
            Payload::Teams(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_players(&self) -> Option<&[Player]> {
        match self {
            Payload::Players(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_matches(&self) -> Option<&[Match]> {
        match self {
            Payload::Matches(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_team_statistics(&self) -> Option<&TeamStatistics> {
        match self {
            Payload::TeamStatistics(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn as_records(&self) -> Option<&[Value]> {
        match self {
            Payload::Records(items) => Some(items),
            _ => None,
        }
    }

    /// Rows a scrolling view shows for this payload; 1 for the statistics object.
    pub fn row_count(&self) -> usize {
        match self {
            Payload::Competitions(items) => items.len(),
            Payload::Teams(items) => items.len(),
            Payload::Players(items) => items.len(),
            Payload::Matches(items) => items.len(),
            Payload::TeamStatistics(_) => 1,
            Payload::Records(items) => items.len(),
        }
    }
}

pub fn parse_competitions_json(raw: &str) -> Result<Vec<Competition>> {
    parse_list(raw).context("invalid competitions json")
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>> {
    parse_list(raw).context("invalid teams json")
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    parse_list(raw).context("invalid players json")
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<Match>> {
    parse_list(raw).context("invalid matches json")
}

pub fn parse_records_json(raw: &str) -> Result<Vec<Value>> {
    parse_list(raw).context("invalid records json")
}

pub fn parse_team_statistics_json(raw: &str) -> Result<TeamStatistics> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty team statistics response"));
    }
    serde_json::from_str(trimmed).context("invalid team statistics json")
}

fn parse_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}
