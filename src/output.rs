use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GeneratorError, Result};
use crate::network::Transition;
use crate::vertex::VertexId;

/// One `a|b|weight` line of an edge-list snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EdgeRecord {
    pub a: VertexId,
    pub b: VertexId,
    pub weight: u32,
}

pub fn edges_path(dir: &Path, window: usize) -> PathBuf {
    dir.join(format!("Network{window}.dat"))
}

pub fn communities_path(dir: &Path, window: usize) -> PathBuf {
    dir.join(format!("Communities{window}.dat"))
}

pub fn transitions_path(dir: &Path, prefix: &str, window: usize) -> PathBuf {
    dir.join(format!("{prefix}{window}.dat"))
}

pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes one transition per line, fields separated by single spaces.
pub fn write_transitions(path: &Path, transitions: &[Transition]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    for transition in transitions {
        match *transition {
            Transition::Split { index, communities } => {
                let index = index.to_string();
                writer.write_record([index.clone(), index, communities.to_string()])?;
            }
            Transition::Merge { from, into } => {
                writer.write_record([from.to_string(), into.to_string()])?;
            }
        }
    }
    writer.flush().map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an edge-list snapshot back into records.
pub fn read_snapshot(path: &Path) -> Result<Vec<EdgeRecord>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .from_path(path)?;

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
