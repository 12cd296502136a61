//! Console rendering of the ban-list view.

use std::time::Duration;

use ubl_core::{BanListView, CycleOutcome, CycleSummary, PayloadSource};

pub fn render_status(view: &BanListView, last_refresh_utc: Option<&str>) -> String {
    let mut lines = Vec::new();

    lines.push(match &view.header {
        Some(header) => format!("List: {} ({} entries)", header, view.entry_count),
        None => "List: none loaded".to_string(),
    });
    lines.push(format!("Auto refresh: {}", render_interval(view.auto_refresh)));

    match (&view.last_cycle, last_refresh_utc) {
        (Some(cycle), Some(at)) => {
            lines.push(format!("Last refresh: {} at {}", render_cycle(cycle), at))
        }
        (Some(cycle), None) => lines.push(format!("Last refresh: {}", render_cycle(cycle))),
        (None, _) => lines.push("Last refresh: pending".to_string()),
    }

    lines.join("\n")
}

pub fn render_check(name: &str, banned: bool) -> String {
    if banned {
        format!("{} is on the ban-list", name.trim())
    } else {
        format!("{} is not banned", name.trim())
    }
}

pub fn render_cycle(cycle: &CycleSummary) -> String {
    let source = match cycle.source {
        PayloadSource::Network => "downloaded",
        PayloadSource::Backup => "from backup",
    };
    let outcome = match cycle.outcome {
        CycleOutcome::Applied { entries } => format!("{} entries applied", entries),
        CycleOutcome::Empty => "no usable list".to_string(),
        CycleOutcome::HostInactive => "host inactive".to_string(),
    };
    match &cycle.failure {
        Some(failure) => format!("{}, {} ({})", source, outcome, failure),
        None => format!("{}, {}", source, outcome),
    }
}

fn render_interval(interval: Option<Duration>) -> String {
    match interval {
        Some(interval) if interval.as_secs() % 60 == 0 => {
            format!("every {} min", interval.as_secs() / 60)
        }
        Some(interval) => format!("every {} s", interval.as_secs()),
        None => "off".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn network_cycle(entries: usize) -> CycleSummary {
        CycleSummary {
            source: PayloadSource::Network,
            outcome: CycleOutcome::Applied { entries },
            backup_saved: true,
            failure: None,
        }
    }

    #[test]
    fn fresh_view_has_nothing_loaded() {
        let text = render_status(&BanListView::default(), None);
        assert_eq!(
            text,
            "List: none loaded\nAuto refresh: off\nLast refresh: pending"
        );
    }

    #[test]
    fn loaded_view_shows_header_and_last_cycle() {
        let view = BanListView {
            running: true,
            header: Some("v7".into()),
            entry_count: 2,
            auto_refresh: Some(Duration::from_secs(600)),
            last_cycle: Some(network_cycle(2)),
            dirty: false,
        };
        let text = render_status(&view, Some("2026-01-01T00:00:00+00:00"));
        assert_eq!(
            text,
            "List: v7 (2 entries)\nAuto refresh: every 10 min\n\
             Last refresh: downloaded, 2 entries applied at 2026-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn fallback_cycle_mentions_the_failure() {
        let cycle = CycleSummary {
            source: PayloadSource::Backup,
            outcome: CycleOutcome::Empty,
            backup_saved: false,
            failure: Some("connect".into()),
        };
        assert_eq!(render_cycle(&cycle), "from backup, no usable list (connect)");
    }

    #[test]
    fn check_reports_membership() {
        assert_eq!(render_check(" alice ", true), "alice is on the ban-list");
        assert_eq!(render_check("bob", false), "bob is not banned");
    }
}
