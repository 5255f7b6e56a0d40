use crossbeam_channel::{Sender, bounded};
use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::info;

use crate::error::{GeneratorError, Result};
use crate::graph::{SnapshotGraph, SnapshotSummary};
use crate::network::{Network, Transition};
use crate::output::{
    communities_path, edges_path, transitions_path, write_text, write_transitions,
};
use crate::params::Params;

/// Rendered windows waiting for the writer thread.
const WRITE_QUEUE: usize = 2;

enum Job {
    Text { path: PathBuf, contents: String },
    Transitions { path: PathBuf, records: Vec<Transition> },
}

impl Job {
    fn write(self) -> Result<()> {
        match self {
            Job::Text { path, contents } => write_text(&path, &contents),
            Job::Transitions { path, records } => write_transitions(&path, &records),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    pub window: usize,
    pub communities: usize,
    pub live_communities: usize,
    pub transitions: usize,
    pub summary: SnapshotSummary,
}

/// Generates `params.t` windows into `out_dir`.
///
/// Each window produces `Network<k>.dat` and `Communities<k>.dat`; every
/// window after the first also produces `<fout><k>.dat`. Files are written by
/// a background thread; if a write fails, generation stops and the write
/// error is returned.
pub fn run(params: &Params, out_dir: &Path, seed: Option<u64>) -> Result<Vec<WindowReport>> {
    params.validate()?;
    fs::create_dir_all(out_dir).map_err(|source| GeneratorError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let (tx, rx) = bounded::<Job>(WRITE_QUEUE);
    let writer = thread::spawn(move || -> Result<()> {
        for job in rx {
            job.write()?;
        }
        Ok(())
    });

    let generated = generate(params, out_dir, seed, &tx);
    drop(tx);
    let written = writer.join().unwrap_or_else(|e| panic::resume_unwind(e));

    written?;
    generated
}

fn generate(
    params: &Params,
    out_dir: &Path,
    seed: Option<u64>,
    tx: &Sender<Job>,
) -> Result<Vec<WindowReport>> {
    let mut network = match seed {
        Some(seed) => Network::seeded(params, seed),
        None => Network::new(params),
    };
    let send = |job: Job| tx.send(job).map_err(|_| GeneratorError::WriterClosed);

    let mut reports = Vec::with_capacity(params.t.max(1));
    network.random_network(params);
    let mut transitions = Vec::new();

    loop {
        let window = network.window();
        send(Job::Text {
            path: edges_path(out_dir, window),
            contents: network.render_edges(),
        })?;
        send(Job::Text {
            path: communities_path(out_dir, window),
            contents: network.render_communities(),
        })?;
        let transition_count = transitions.len();
        if window > 0 {
            send(Job::Transitions {
                path: transitions_path(out_dir, &params.fout, window),
                records: std::mem::take(&mut transitions),
            })?;
        }

        let report = window_report(&network, transition_count);
        info!(
            window,
            vertices = report.summary.nodes,
            communities = report.live_communities,
            active_edges = report.summary.edges,
            components = report.summary.components,
            "generated window"
        );
        reports.push(report);

        if window + 1 >= params.t {
            break;
        }
        transitions = network.gen_next_time_window(params);
    }
    Ok(reports)
}

fn window_report(network: &Network, transitions: usize) -> WindowReport {
    WindowReport {
        window: network.window(),
        communities: network.communities().len(),
        live_communities: network.communities().iter().filter(|c| !c.is_empty()).count(),
        transitions,
        summary: SnapshotGraph::from_network(network).summary(),
    }
}
