//! Evaluation archive
//!
//! Optional record of every individual evaluated during a run.

use serde::{Deserialize, Serialize};

/// One evaluated individual
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Generation in which the individual was evaluated
    pub generation: usize,
    /// Decision vector
    pub decision: Vec<f64>,
    /// Objective values in the problem's own directions
    pub objectives: Vec<f64>,
    /// Constraint violation
    pub violation: f64,
}

/// Append-only history of evaluations
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Create an empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluation
    pub fn push(&mut self, entry: ArchiveEntry) {
        self.entries.push(entry);
    }

    /// All entries in evaluation order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entries evaluated in `generation`
    pub fn generation(&self, generation: usize) -> impl Iterator<Item = &ArchiveEntry> {
        self.entries
            .iter()
            .filter(move |e| e.generation == generation)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(generation: usize) -> ArchiveEntry {
        ArchiveEntry {
            generation,
            decision: vec![0.5],
            objectives: vec![1.0, 2.0],
            violation: 0.0,
        }
    }

    #[test]
    fn test_archive_by_generation() {
        let mut archive = Archive::new();
        assert!(archive.is_empty());
        archive.push(entry(0));
        archive.push(entry(1));
        archive.push(entry(1));
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.generation(1).count(), 2);
        assert_eq!(archive.generation(5).count(), 0);
    }
}
