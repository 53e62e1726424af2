use std::collections::BTreeMap;

use crate::api::{Endpoint, Payload};

pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinderId {
    Dashboard,
    Competitions,
    Teams,
    TeamStatistics,
    Insights,
}

impl BinderId {
    pub fn label(self) -> &'static str {
        match self {
            BinderId::Dashboard => "dashboard",
            BinderId::Competitions => "competitions",
            BinderId::Teams => "teams",
            BinderId::TeamStatistics => "team statistics",
            BinderId::Insights => "insights",
        }
    }
}

/// One request a binder issues per fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub name: String,
    pub endpoint: Endpoint,
}

impl RequestDescriptor {
    pub fn new(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
        }
    }
}

impl From<Endpoint> for RequestDescriptor {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(endpoint.key(), endpoint)
    }
}

/// Payloads of a settled cycle, keyed by descriptor name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    entries: BTreeMap<String, Payload>,
}

impl ResourceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, payload: Payload) {
        self.entries.insert(name.into(), payload);
    }

    pub fn get(&self, name: &str) -> Option<&Payload> {
        self.entries.get(name)
    }

    pub fn payloads(&self) -> impl Iterator<Item = &Payload> {
        self.entries.values()
    }
}

impl FromIterator<(String, Payload)> for ResourceData {
    fn from_iter<I: IntoIterator<Item = (String, Payload)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResourceState::Success(_) | ResourceState::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ResourceState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResourceState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// A set of requests to run together. The provider answers with the same
/// binder id and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCycle {
    pub binder: BinderId,
    pub generation: Generation,
    pub descriptors: Vec<RequestDescriptor>,
}

pub type CycleOutcome = Result<ResourceData, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Discarded,
}

/// Tracks the remote resources behind one view.
///
/// The binder never performs I/O itself. `bind` and `reload` hand out a
/// [`FetchCycle`] for the provider to run, and `settle` folds the result back
/// in. Every cycle carries a generation; a result whose generation is not the
/// binder's current one belongs to a superseded cycle and is dropped.
#[derive(Debug, Clone)]
pub struct ResourceBinder<K> {
    id: BinderId,
    state: ResourceState<ResourceData>,
    dependency: Option<K>,
    descriptors: Vec<RequestDescriptor>,
    generation: Generation,
}

impl<K: Clone + PartialEq> ResourceBinder<K> {
    pub fn new(id: BinderId) -> Self {
        Self {
            id,
            state: ResourceState::Idle,
            dependency: None,
            descriptors: Vec::new(),
            generation: 0,
        }
    }

    pub fn id(&self) -> BinderId {
        self.id
    }

    pub fn state(&self) -> &ResourceState<ResourceData> {
        &self.state
    }

    pub fn dependency(&self) -> Option<&K> {
        self.dependency.as_ref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_bound(&self) -> bool {
        self.dependency.is_some()
    }

    /// Starts a cycle unless the binder is already bound to `dependency`.
    pub fn bind(
        &mut self,
        descriptors: Vec<RequestDescriptor>,
        dependency: K,
    ) -> Option<FetchCycle> {
        if self.dependency.as_ref() == Some(&dependency) {
            return None;
        }
        self.dependency = Some(dependency);
        self.descriptors = descriptors;
        Some(self.start_cycle())
    }

    /// Re-runs the current descriptors. Nothing happens while unbound.
    pub fn reload(&mut self) -> Option<FetchCycle> {
        if self.dependency.is_none() {
            return None;
        }
        Some(self.start_cycle())
    }

    /// Back to idle; whatever is still in flight will be discarded.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = ResourceState::Idle;
        self.dependency = None;
        self.descriptors.clear();
    }

    pub fn settle(&mut self, generation: Generation, outcome: CycleOutcome) -> Settled {
        if generation != self.generation || !self.state.is_loading() {
            return Settled::Discarded;
        }
        self.state = match outcome {
            Ok(data) => ResourceState::Success(data),
            Err(message) => ResourceState::Error(message),
        };
        Settled::Applied
    }

    fn start_cycle(&mut self) -> FetchCycle {
        self.generation = self.generation.wrapping_add(1);
        self.state = ResourceState::Loading;
        FetchCycle {
            binder: self.id,
            generation: self.generation,
            descriptors: self.descriptors.clone(),
        }
    }
}
