//! Semantic locations: the named places a delivery can visit.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::planner::LocationCatalog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticLocation {
    pub unique_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pose: Pose2D,
    #[serde(default)]
    pub keyframe_id: i32,
}

#[derive(Debug, Deserialize)]
struct SemanticsFile {
    semantic_locations: BTreeMap<String, LocationEntry>,
}

#[derive(Debug, Deserialize)]
struct LocationEntry {
    name: String,
    #[serde(default)]
    description: String,
    pose: Pose2D,
    #[serde(default)]
    keyframe_id: i32,
}

/// Parse a `semantic_locations` document. Locations come back sorted by unique name.
pub fn parse_semantic_locations(content: &str) -> Result<Vec<SemanticLocation>> {
    let file: SemanticsFile = serde_yaml::from_str(content)?;
    Ok(file
        .semantic_locations
        .into_iter()
        .map(|(unique_name, entry)| SemanticLocation {
            unique_name,
            name: entry.name,
            description: entry.description,
            pose: entry.pose,
            keyframe_id: entry.keyframe_id,
        })
        .collect())
}

pub fn load_semantic_locations(path: &Path) -> Result<Vec<SemanticLocation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read semantic locations: {}", path.display()))?;
    parse_semantic_locations(&content)
        .with_context(|| format!("Failed to parse semantic locations: {}", path.display()))
}

/// A catalog backed by a fixed set of semantic locations.
#[derive(Debug, Clone, Default)]
pub struct SemanticCatalog {
    names: BTreeSet<String>,
}

impl SemanticCatalog {
    pub fn new(locations: &[SemanticLocation]) -> Self {
        Self {
            names: locations.iter().map(|l| l.unique_name.clone()).collect(),
        }
    }

    pub fn contains(&self, unique_name: &str) -> bool {
        self.names.contains(unique_name)
    }
}

impl LocationCatalog for SemanticCatalog {
    fn check_locations(&self, locations: &[String]) -> bool {
        locations.iter().all(|l| self.names.contains(l))
    }

    fn unknown_locations(&self, locations: &[String]) -> Vec<String> {
        locations
            .iter()
            .filter(|l| !self.names.contains(*l))
            .cloned()
            .collect()
    }
}
