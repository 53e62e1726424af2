use crate::api::Endpoint;
use crate::binder::{
    BinderId, CycleOutcome, FetchCycle, Generation, RequestDescriptor, ResourceBinder,
    ResourceData, ResourceState, Settled,
};
use crate::state::{Team, TeamStatistics};

/// Anything with a display name the search box can match against.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Team {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Case-insensitive substring filter. Only an empty query keeps everything;
/// whitespace is matched literally.
pub fn filter_by_name<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.name().to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsTab {
    Overall,
    TopScorers,
    Squad,
}

impl StatsTab {
    pub const ALL: [StatsTab; 3] = [StatsTab::Overall, StatsTab::TopScorers, StatsTab::Squad];

    pub fn title(self) -> &'static str {
        match self {
            StatsTab::Overall => "Overall Stats",
            StatsTab::TopScorers => "Top Scorers",
            StatsTab::Squad => "Squad Details",
        }
    }

    pub fn index(self) -> usize {
        match self {
            StatsTab::Overall => 0,
            StatsTab::TopScorers => 1,
            StatsTab::Squad => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionPhase<'a> {
    Closed,
    Loading(&'a Team),
    Ready(&'a Team, &'a TeamStatistics),
    Failed(&'a Team, &'a str),
}

impl SelectionPhase<'_> {
    pub fn is_open(&self) -> bool {
        !matches!(self, SelectionPhase::Closed)
    }
}

/// The team detail overlay: which team is open, and its statistics fetch.
#[derive(Debug, Clone)]
pub struct SelectionController {
    selected: Option<Team>,
    tab: StatsTab,
    stats: ResourceBinder<u64>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: None,
            tab: StatsTab::Overall,
            stats: ResourceBinder::new(BinderId::TeamStatistics),
        }
    }

    pub fn select(&mut self, team: &Team) -> Option<FetchCycle> {
        self.selected = Some(team.clone());
        self.tab = StatsTab::Overall;
        let endpoint = Endpoint::TeamStatistics { team_id: team.id };
        self.stats
            .bind(vec![RequestDescriptor::from(endpoint)], team.id)
    }

    pub fn close(&mut self) {
        self.selected = None;
        self.tab = StatsTab::Overall;
        self.stats.reset();
    }

    pub fn reload(&mut self) -> Option<FetchCycle> {
        self.stats.reload()
    }

    pub fn settle(&mut self, generation: Generation, outcome: CycleOutcome) -> Settled {
        self.stats.settle(generation, outcome)
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected(&self) -> Option<&Team> {
        self.selected.as_ref()
    }

    pub fn tab(&self) -> StatsTab {
        self.tab
    }

    pub fn next_tab(&mut self) {
        if self.is_open() {
            self.tab = self.tab.next();
        }
    }

    pub fn prev_tab(&mut self) {
        if self.is_open() {
            self.tab = self.tab.prev();
        }
    }

    pub fn stats_state(&self) -> &ResourceState<ResourceData> {
        self.stats.state()
    }

    pub fn phase(&self) -> SelectionPhase<'_> {
        let Some(team) = self.selected.as_ref() else {
            return SelectionPhase::Closed;
        };
        match self.stats.state() {
            ResourceState::Idle | ResourceState::Loading => SelectionPhase::Loading(team),
            ResourceState::Error(message) => SelectionPhase::Failed(team, message),
            ResourceState::Success(data) => {
                match data
                    .get(Endpoint::TeamStatistics { team_id: team.id }.key())
                    .and_then(|payload| payload.as_team_statistics())
                {
                    Some(stats) => SelectionPhase::Ready(team, stats),
                    None => SelectionPhase::Failed(team, "Team statistics are unavailable."),
                }
            }
        }
    }
}
