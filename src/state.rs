use std::collections::VecDeque;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::api::{Endpoint, InsightKind, Payload};
use crate::binder::{
    BinderId, CycleOutcome, FetchCycle, Generation, RequestDescriptor, ResourceBinder, Settled,
};
use crate::selection::{SelectionController, filter_by_name};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Competitions,
    Teams,
    Insights,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Dashboard => "DASHBOARD",
            Screen::Competitions => "COMPETITIONS",
            Screen::Teams => "TEAMS",
            Screen::Insights => "INSIGHTS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Competition {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "country")]
    pub area: Option<String>,
    #[serde(default)]
    pub competition_id: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(default)]
    pub crest: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub founded: Option<i32>,
    #[serde(default)]
    pub website: Option<String>,
}

/// A nested team reference; only the name is displayed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Player {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub current_team: Option<TeamRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Match {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub home_team: TeamRef,
    #[serde(default, deserialize_with = "null_as_default")]
    pub away_team: TeamRef,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub match_date: Option<String>,
    #[serde(default)]
    pub matchday: Option<u32>,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamStatistics {
    /// Stat name to value, in the order the server sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub top_scorers: Vec<TopScorer>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub squad: SquadSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TopScorer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_goals: Option<i64>,
    #[serde(default)]
    pub total_assists: Option<i64>,
    #[serde(default)]
    pub avg_minutes: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SquadSummary {
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub total_market_value: Option<f64>,
    #[serde(default)]
    pub average_player_value: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Teams screen: collection binder, search box, card cursor and detail overlay.
#[derive(Debug, Clone)]
pub struct TeamsView {
    pub binder: ResourceBinder<()>,
    pub query: String,
    pub searching: bool,
    pub cursor: usize,
    pub selection: SelectionController,
}

impl TeamsView {
    pub fn new() -> Self {
        Self {
            binder: ResourceBinder::new(BinderId::Teams),
            query: String::new(),
            searching: false,
            cursor: 0,
            selection: SelectionController::new(),
        }
    }

    pub fn teams(&self) -> &[Team] {
        self.binder
            .state()
            .data()
            .and_then(|data| data.get(Endpoint::Teams.key()))
            .and_then(|payload| payload.as_teams())
            .unwrap_or(&[])
    }

    pub fn visible_teams(&self) -> Vec<&Team> {
        filter_by_name(self.teams(), &self.query)
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.visible_teams().get(self.cursor).copied()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_teams().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_teams().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    /// Drops fetched teams and view state. Binder generations keep counting so
    /// responses still in flight are recognised as stale.
    pub fn unmount(&mut self) {
        self.binder.reset();
        self.selection.close();
        self.query.clear();
        self.searching = false;
        self.cursor = 0;
    }

    pub fn push_query(&mut self, ch: char) {
        self.query.push(ch);
        self.cursor = 0;
    }

    pub fn pop_query(&mut self) {
        self.query.pop();
        self.cursor = 0;
    }
}

impl Default for TeamsView {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AppState {
    pub screen: Screen,
    pub dashboard: ResourceBinder<()>,
    pub competitions: ResourceBinder<()>,
    pub teams: TeamsView,
    pub insights: ResourceBinder<InsightKind>,
    pub insight: InsightKind,
    pub scroll: usize,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            dashboard: ResourceBinder::new(BinderId::Dashboard),
            competitions: ResourceBinder::new(BinderId::Competitions),
            teams: TeamsView::new(),
            insights: ResourceBinder::new(BinderId::Insights),
            insight: InsightKind::MatchStatistics,
            scroll: 0,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    /// Shows `screen`, unmounting the previous one, and binds its resources.
    pub fn mount(&mut self, screen: Screen) -> Option<FetchCycle> {
        if screen != self.screen {
            self.unmount();
            self.screen = screen;
        }
        self.bind_current()
    }

    fn unmount(&mut self) {
        match self.screen {
            Screen::Dashboard => self.dashboard.reset(),
            Screen::Competitions => self.competitions.reset(),
            Screen::Teams => self.teams.unmount(),
            Screen::Insights => self.insights.reset(),
        }
        self.scroll = 0;
    }

    fn bind_current(&mut self) -> Option<FetchCycle> {
        match self.screen {
            Screen::Dashboard => self.dashboard.bind(dashboard_descriptors(), ()),
            Screen::Competitions => self
                .competitions
                .bind(vec![RequestDescriptor::from(Endpoint::Competitions)], ()),
            Screen::Teams => self
                .teams
                .binder
                .bind(vec![RequestDescriptor::from(Endpoint::Teams)], ()),
            Screen::Insights => {
                let endpoint = Endpoint::Insight(self.insight);
                self.insights
                    .bind(vec![RequestDescriptor::from(endpoint)], self.insight)
            }
        }
    }

    /// User-requested retry of whatever is on screen.
    pub fn reload(&mut self) -> Option<FetchCycle> {
        match self.screen {
            Screen::Dashboard => self.dashboard.reload(),
            Screen::Competitions => self.competitions.reload(),
            Screen::Teams if self.teams.selection.is_open() => self.teams.selection.reload(),
            Screen::Teams => self.teams.binder.reload(),
            Screen::Insights => self.insights.reload(),
        }
    }

    pub fn set_insight(&mut self, kind: InsightKind) -> Option<FetchCycle> {
        self.insight = kind;
        self.scroll = 0;
        if self.screen == Screen::Insights {
            self.bind_current()
        } else {
            None
        }
    }

    pub fn next_insight(&mut self) -> Option<FetchCycle> {
        self.set_insight(self.insight.next())
    }

    pub fn prev_insight(&mut self) -> Option<FetchCycle> {
        self.set_insight(self.insight.prev())
    }

    pub fn open_selected_team(&mut self) -> Option<FetchCycle> {
        let team = self.teams.selected_team()?.clone();
        self.teams.selection.select(&team)
    }

    pub fn close_overlay(&mut self) {
        self.teams.selection.close();
    }

    /// Rows the current screen scrolls through. Dashboard panels scroll
    /// together, so the longest one sets the limit.
    pub fn scroll_rows(&self) -> usize {
        let state = match self.screen {
            Screen::Dashboard => self.dashboard.state(),
            Screen::Competitions => self.competitions.state(),
            Screen::Insights => self.insights.state(),
            Screen::Teams => return 0,
        };
        state
            .data()
            .and_then(|data| data.payloads().map(Payload::row_count).max())
            .unwrap_or(0)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.min(self.scroll_rows().saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
        self.clamp_scroll();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn settle(
        &mut self,
        binder: BinderId,
        generation: Generation,
        outcome: CycleOutcome,
    ) -> Settled {
        let settled = match binder {
            BinderId::Dashboard => self.dashboard.settle(generation, outcome),
            BinderId::Competitions => self.competitions.settle(generation, outcome),
            BinderId::Teams => self.teams.binder.settle(generation, outcome),
            BinderId::TeamStatistics => self.teams.selection.settle(generation, outcome),
            BinderId::Insights => self.insights.settle(generation, outcome),
        };
        if settled == Settled::Applied {
            match binder {
                BinderId::Teams => self.teams.clamp_cursor(),
                BinderId::TeamStatistics => {}
                _ => self.clamp_scroll(),
            }
        }
        settled
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn dashboard_descriptors() -> Vec<RequestDescriptor> {
    [
        Endpoint::Competitions,
        Endpoint::Teams,
        Endpoint::Players,
        Endpoint::Matches,
    ]
    .into_iter()
    .map(RequestDescriptor::from)
    .collect()
}

#[derive(Debug, Clone)]
pub enum Delta {
    Settled {
        binder: BinderId,
        generation: Generation,
        outcome: CycleOutcome,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Fetch(FetchCycle),
    Shutdown,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Settled {
            binder,
            generation,
            outcome,
        } => {
            if state.settle(binder, generation, outcome) == Settled::Discarded {
                state.push_log(format!(
                    "[INFO] Discarded stale {} response (cycle {generation})",
                    binder.label()
                ));
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
