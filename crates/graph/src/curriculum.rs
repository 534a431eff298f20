//! Curriculum assembly
//!
//! Combines the reading order, per-paper complexity, and graph statistics
//! into the structure the plan generator and the reports consume, together
//! with a study-time estimate.

use crate::complexity::{ComplexityAnalyzer, ComplexityReport};
use crate::graph::DependencyGraph;
use crate::ordering::get_reading_order;
use crate::stats::GraphStats;
use chrono::{DateTime, Utc};
use learnpilot_common::config::PlanningConfig;
use learnpilot_common::Difficulty;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

/// Study-time estimate for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyEstimate {
    /// Sum of difficulty ranks (beginner 1, intermediate 2, advanced 3)
    pub total_complexity: u32,

    /// Base hours before the reader-level adjustment
    pub total_hours: f64,

    /// Hours scaled for the reader's level
    pub adjusted_hours: f64,

    /// Whole days at `daily_hours`, never less than one
    pub estimated_days: u32,

    pub daily_hours: f64,

    pub user_level: Difficulty,
}

impl StudyEstimate {
    pub fn compute<I>(difficulties: I, planning: &PlanningConfig) -> Self
    where
        I: IntoIterator<Item = Difficulty>,
    {
        let mut total_complexity = 0;
        let mut total_hours = 0.0;
        for difficulty in difficulties {
            total_complexity += difficulty.rank();
            total_hours += planning.hours_for(difficulty);
        }

        let adjusted_hours = total_hours * planning.level_multiplier();
        let estimated_days = ((adjusted_hours / planning.daily_hours).floor() as u32).max(1);

        Self {
            total_complexity,
            total_hours,
            adjusted_hours,
            estimated_days,
            daily_hours: planning.daily_hours,
            user_level: planning.user_level,
        }
    }
}

/// One paper's slot in the curriculum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumEntry {
    /// 1-based slot in the reading order
    pub position: usize,

    pub paper_id: String,

    pub difficulty: Difficulty,

    pub complexity: ComplexityReport,
}

/// Ordered, complexity-scored curriculum for one batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Curriculum {
    pub run_id: Uuid,

    pub generated_at: DateTime<Utc>,

    /// False when circular dependencies prevented a true reading order;
    /// the entries are then in batch order
    pub order_resolved: bool,

    /// Papers that depend on each other in a cycle
    pub cycles: Vec<Vec<String>>,

    /// Entries in reading order
    pub entries: Vec<CurriculumEntry>,

    pub estimate: StudyEstimate,

    pub stats: GraphStats,
}

impl Curriculum {
    /// Resolve, score, and estimate a whole graph
    pub fn build(graph: &DependencyGraph, planning: &PlanningConfig) -> Self {
        let reading = get_reading_order(graph);
        // analyze_all follows batch order; re-key by id for the reading order
        let mut by_id: HashMap<String, ComplexityReport> =
            ComplexityAnalyzer::new(graph).analyze_all().into_iter().collect();

        let entries: Vec<CurriculumEntry> = reading
            .order
            .iter()
            .enumerate()
            .filter_map(|(i, id)| {
                let node = graph.node(id)?;
                let complexity = by_id.remove(id)?;
                Some(CurriculumEntry {
                    position: i + 1,
                    paper_id: id.clone(),
                    difficulty: node.difficulty,
                    complexity,
                })
            })
            .collect();

        let estimate = StudyEstimate::compute(entries.iter().map(|e| e.difficulty), planning);
        let stats = GraphStats::compute(graph);

        let curriculum = Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            order_resolved: reading.is_valid_topological_order,
            cycles: reading.cycles,
            entries,
            estimate,
            stats,
        };

        info!(
            run_id = %curriculum.run_id,
            papers = curriculum.entries.len(),
            order_resolved = curriculum.order_resolved,
            estimated_days = curriculum.estimate.estimated_days,
            "Curriculum built"
        );

        curriculum
    }

    /// Paper IDs in reading order
    pub fn reading_order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.paper_id.as_str()).collect()
    }

    pub fn entry(&self, paper_id: &str) -> Option<&CurriculumEntry> {
        self.entries.iter().find(|e| e.paper_id == paper_id)
    }
}
