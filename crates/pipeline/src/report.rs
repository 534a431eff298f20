//! Curriculum report rendering

use learnpilot_common::config::OutputFormat;
use learnpilot_common::Result;
use learnpilot_graph::Curriculum;
use std::fmt::{self, Write};

/// Render a curriculum in the requested format
pub fn render(curriculum: &Curriculum, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(curriculum)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(curriculum)?),
    }
}

/// Markdown reading plan.
///
/// An unresolved order is flagged before anything else so a reader never
/// mistakes batch order for a prerequisite-respecting sequence.
pub fn render_markdown(curriculum: &Curriculum) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_markdown(&mut out, curriculum);
    out
}

fn write_markdown(out: &mut String, curriculum: &Curriculum) -> fmt::Result {
    writeln!(out, "# Reading Plan\n")?;
    writeln!(
        out,
        "Run `{}` generated {}\n",
        curriculum.run_id,
        curriculum.generated_at.format("%Y-%m-%d %H:%M UTC")
    )?;

    if !curriculum.order_resolved {
        writeln!(
            out,
            "> **Warning: circular dependencies.** These papers depend on each other, \
             so no order puts every prerequisite first. Papers are listed in batch order."
        )?;
        writeln!(out, ">")?;
        for (i, cycle) in curriculum.cycles.iter().enumerate() {
            writeln!(out, "> - Cycle {}: {}", i + 1, cycle.join(" ↔ "))?;
        }
        writeln!(out)?;
    }

    let stats = &curriculum.stats;
    let estimate = &curriculum.estimate;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- Papers: {}", stats.node_count)?;
    writeln!(out, "- Dependencies: {}", stats.edge_count)?;
    if stats.roots.is_empty() {
        writeln!(out, "- Starting points: none")?;
    } else {
        writeln!(out, "- Starting points: {}", stats.roots.join(", "))?;
    }
    writeln!(out, "- Deepest prerequisite chain: {}", stats.max_depth)?;
    writeln!(out, "- Average clustering: {:.2}", stats.avg_clustering)?;
    writeln!(
        out,
        "- Estimated study time: {:.1} hours, about {} day(s) at {:.1} h/day ({} reader)\n",
        estimate.adjusted_hours, estimate.estimated_days, estimate.daily_hours, estimate.user_level
    )?;

    writeln!(out, "## Reading Order\n")?;
    if curriculum.entries.is_empty() {
        return writeln!(out, "_No papers in this batch._");
    }

    writeln!(out, "| # | Paper | Difficulty | Complexity | Score | Prerequisite papers |")?;
    writeln!(out, "|---|-------|------------|------------|-------|---------------------|")?;
    for entry in &curriculum.entries {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1} | {} |",
            entry.position,
            entry.paper_id,
            entry.difficulty,
            entry.complexity.complexity_level,
            entry.complexity.complexity_score,
            entry.complexity.dependency_count
        )?;
    }

    Ok(())
}
