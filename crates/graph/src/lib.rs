//! LearnPilot curriculum engine
//!
//! Turns a batch of papers (concepts introduced, concepts required) into a
//! directed dependency graph, then:
//! - resolves a reading order where prerequisites come first
//! - reports papers caught in circular dependencies
//! - scores each paper's complexity from its concepts and graph position
//! - assembles a curriculum with a study-time estimate

mod complexity;
mod curriculum;
mod cycles;
mod export;
mod graph;
mod ordering;
mod paper;
mod stats;

pub use complexity::{
    analyze_all, analyze_complexity, complexity_score, ComplexityAnalyzer, ComplexityLevel,
    ComplexityReport, LOW_THRESHOLD, MEDIUM_THRESHOLD,
};
pub use curriculum::{Curriculum, CurriculumEntry, StudyEstimate};
pub use cycles::find_cycles;
pub use export::NodeLinkGraph;
pub use graph::{build_dependency_graph, DependencyEdge, DependencyGraph, PaperNode};
pub use ordering::{get_reading_order, ReadingOrder};
pub use paper::{PaperBatch, PaperConcepts};
pub use stats::GraphStats;
