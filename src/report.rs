use std::fmt::Write;

use anyhow::Result;
use arrow::util::pretty::pretty_format_batches;

use crate::data::batch::to_record_batch;
use crate::data::filter::FilteredView;
use crate::pipeline::{AggregateSummary, GroupedSeries, ScatterProjection};
use crate::state::{Dashboard, DashboardSnapshot};

// ---------------------------------------------------------------------------
// Plain-text dashboard report
// ---------------------------------------------------------------------------

/// Render the dashboard for its current selection. With no dataset loaded
/// the KPI block shows `N/A` values.
pub fn render(dashboard: &Dashboard) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "Employee Performance Dashboard")?;
    writeln!(out, "{}", "=".repeat(30))?;

    let Some(snapshot) = dashboard.snapshot()? else {
        render_kpis(&mut out, &dashboard.summary()?)?;
        writeln!(out, "\nNo data loaded.")?;
        return Ok(out);
    };

    writeln!(out, "\nFilters")?;
    for (col, selected) in &dashboard.filters {
        let labels: Vec<String> = selected.iter().map(|v| v.to_string()).collect();
        writeln!(out, "  {col}: {}", labels.join(", "))?;
    }

    render_kpis(&mut out, &snapshot.summary)?;
    render_snapshot(&mut out, &snapshot)?;

    if let Some(view) = dashboard.view() {
        render_raw(&mut out, &view)?;
    }
    Ok(out)
}

fn render_kpis(out: &mut String, summary: &AggregateSummary) -> Result<()> {
    writeln!(out, "\nKey Performance Indicators")?;
    writeln!(out, "  Total Employees:           {}", summary.count)?;
    writeln!(out, "  Average Performance Score: {}", summary.performance_display())?;
    writeln!(out, "  Average Salary:            {}", summary.salary_display())?;
    writeln!(out, "  Average Satisfaction:      {}", summary.satisfaction_display())?;
    Ok(())
}

fn render_snapshot(out: &mut String, snapshot: &DashboardSnapshot) -> Result<()> {
    writeln!(out, "\nPerformance Distribution")?;
    for (value, count) in &snapshot.distribution {
        writeln!(out, "  {:>6} | {} {count}", value.to_string(), "#".repeat(*count))?;
    }

    writeln!(out, "\nEmployee Statistics")?;
    let table = pretty_format_batches(&[snapshot.description.to_record_batch()?])?;
    writeln!(out, "{table}")?;

    render_scatter(out, "Salary vs Performance Score", &snapshot.salary_vs_performance)?;
    render_scatter(out, "Years at Company vs Salary", &snapshot.experience_vs_salary)?;
    render_groups(out, "Satisfaction Score by Group", &snapshot.satisfaction_by_group)?;
    Ok(())
}

fn render_scatter(out: &mut String, title: &str, proj: &ScatterProjection) -> Result<()> {
    writeln!(out, "\n{title} ({} points)", proj.points.len())?;
    for p in &proj.points {
        let color = proj.legend.color_for(&p.color).hex();
        match &p.size {
            Some(size) => writeln!(out, "  ({}, {}) {} [{color}] size {size}", p.x, p.y, p.color)?,
            None => writeln!(out, "  ({}, {}) {} [{color}]", p.x, p.y, p.color)?,
        }
    }
    Ok(())
}

fn render_groups(out: &mut String, title: &str, series: &GroupedSeries) -> Result<()> {
    writeln!(out, "\n{title}")?;
    for (group, values) in &series.groups {
        let text: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        writeln!(out, "  {group}: [{}]", text.join(", "))?;
    }
    Ok(())
}

fn render_raw(out: &mut String, view: &FilteredView<'_>) -> Result<()> {
    writeln!(out, "\nRaw Data")?;
    let table = pretty_format_batches(&[to_record_batch(view)?])?;
    writeln!(out, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::employee::sample_dataset;

    #[test]
    fn test_report_sections() {
        let mut dash = Dashboard::new(DashboardConfig::default());
        dash.set_dataset(sample_dataset().clone()).unwrap();
        let text = render(&dash).unwrap();

        assert!(text.contains("Total Employees:           5"));
        assert!(text.contains("$84,600.00"));
        assert!(text.contains("Performance_Score"));
        assert!(text.contains("Software Engineer"));
        assert!(text.contains("Raw Data"));
    }

    #[test]
    fn test_report_without_data() {
        let text = render(&Dashboard::default()).unwrap();
        assert!(text.contains("Average Salary:            N/A"));
        assert!(text.contains("No data loaded."));
    }
}
