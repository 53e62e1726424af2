use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use rayon::prelude::*;

use crate::binder::{FetchCycle, RequestDescriptor, ResourceData};
use crate::http_client::ApiClient;
use crate::state::{Delta, ProviderCommand};

/// Why a fetch cycle failed: the first descriptor (in order) whose request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub descriptor: String,
    pub label: String,
    pub detail: String,
}

impl FetchFailure {
    pub fn user_message(&self) -> String {
        format!("Failed to load {}. Please try again later.", self.label)
    }
}

/// Fetches every descriptor in parallel and joins them. Any failure fails the
/// whole cycle; successful payloads of a failed cycle are dropped.
pub fn fetch_all(
    client: &ApiClient,
    descriptors: &[RequestDescriptor],
) -> Result<ResourceData, FetchFailure> {
    let results: Vec<_> = descriptors
        .par_iter()
        .map(|descriptor| (descriptor, client.fetch(&descriptor.endpoint)))
        .collect();

    let mut data = ResourceData::new();
    for (descriptor, result) in results {
        match result {
            Ok(payload) => data.insert(descriptor.name.clone(), payload),
            Err(err) => {
                return Err(FetchFailure {
                    descriptor: descriptor.name.clone(),
                    label: descriptor.endpoint.label().to_string(),
                    detail: format!("{err:#}"),
                });
            }
        }
    }
    Ok(data)
}

/// Runs one cycle and reports it as deltas: an optional warning, then the
/// settled outcome.
pub fn run_cycle(client: &ApiClient, cycle: &FetchCycle) -> Vec<Delta> {
    let mut out = Vec::with_capacity(2);
    let outcome = match fetch_all(client, &cycle.descriptors) {
        Ok(data) => Ok(data),
        Err(failure) => {
            out.push(Delta::Log(format!(
                "[WARN] {} fetch error ({}): {}",
                cycle.binder.label(),
                failure.descriptor,
                failure.detail
            )));
            Err(failure.user_message())
        }
    };
    out.push(Delta::Settled {
        binder: cycle.binder,
        generation: cycle.generation,
        outcome,
    });
    out
}

pub fn spawn_provider(
    client: ApiClient,
    parallelism: usize,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(parallelism);
        if pool.is_none() {
            let _ = tx.send(Delta::Log(
                "[WARN] Fetch pool unavailable, fetching on provider thread".to_string(),
            ));
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Fetch(cycle) => {
                    let client = client.clone();
                    let tx = tx.clone();
                    let job = move || {
                        for delta in run_cycle(&client, &cycle) {
                            if tx.send(delta).is_err() {
                                break;
                            }
                        }
                    };
                    match pool.as_ref() {
                        Some(pool) => pool.spawn(job),
                        None => job(),
                    }
                }
                ProviderCommand::Shutdown => break,
            }
        }
    })
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(2, 32))
        .thread_name(|idx| format!("fetch-{idx}"))
        .build()
        .ok()
}
