//! The live dashboard loop.
//!
//! A repeating timer drives a full refresh of both feeds; the first tick
//! fires immediately so the dashboard paints before the first period
//! elapses. Each feed keeps its own failure surface, and every frame is a
//! full rebuild from the engine state.

use std::io::Write;
use std::time::Duration;

use owo_colors::OwoColorize;
use tokio::time::{self, MissedTickBehavior};

use crate::engine::{Dashboard, refresh_all};
use crate::error::Result;
use crate::remote::TicketApi;
use crate::render::{build_board, render_board, render_table};
use crate::types::StatsSnapshot;
use crate::vocab::Vocabulary;

/// Which projection the live view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchView {
    #[default]
    Table,
    Board,
}

#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub view: WatchView,
    pub period: Duration,
    /// Stop after this many refresh cycles (None = run until interrupted).
    pub ticks: Option<u64>,
}

/// Render the stats cards the way the admin header shows them: a total,
/// one card per configured status, one per configured priority.
pub fn render_stats(
    stats: &StatsSnapshot,
    statuses: &Vocabulary,
    priorities: &Vocabulary,
) -> String {
    let mut cards = vec![format!("Total tickets: {}", stats.total.tickets)];
    for entry in statuses.entries() {
        let count = stats.status.get(&entry.value).copied().unwrap_or(0);
        cards.push(format!("{}: {}", entry.label, count));
    }
    for entry in priorities.entries() {
        let count = stats.priority.get(&entry.value).copied().unwrap_or(0);
        cards.push(format!("{} priority: {}", entry.label, count));
    }
    cards.join("  |  ")
}

/// Build one full frame from the engine state. Pure with respect to the
/// dashboard (apart from draining its one-shot notice), so the frame for a
/// given state is deterministic.
pub fn render_frame(dash: &mut Dashboard, view: WatchView) -> String {
    let mut out = String::new();

    match dash.stats() {
        Some(stats) => {
            out.push_str(&render_stats(stats, dash.statuses(), dash.priorities()));
            out.push('\n');
        }
        None => out.push_str("Stats pending…\n"),
    }
    if let Some(error) = dash.stats_error() {
        out.push_str(&format!("{}\n", error.red()));
    }
    out.push('\n');

    if let Some(error) = dash.table_error() {
        out.push_str(&format!("{}\n", error.red()));
    }
    if let Some(notice) = dash.take_notice() {
        out.push_str(&format!("{}\n", notice.yellow()));
    }

    let filtered = dash.filtered();
    match view {
        WatchView::Table => {
            out.push_str(&render_table(&filtered, dash.statuses()));
            out.push('\n');
        }
        WatchView::Board => {
            let board = build_board(&filtered, dash.statuses());
            out.push_str(&render_board(&board));
        }
    }
    out
}

/// Run the periodic refresh loop, writing a frame after every cycle.
pub async fn run_watch(
    dash: &mut Dashboard,
    api: &dyn TicketApi,
    options: &WatchOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let mut ticker = time::interval(options.period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut completed = 0u64;
    loop {
        ticker.tick().await;
        refresh_all(dash, api).await;
        let frame = render_frame(dash, options.view);
        writeln!(out, "{}", frame)?;
        out.flush()?;

        completed += 1;
        if options.ticks.is_some_and(|limit| completed >= limit) {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TotalStats;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Vocabulary::default_statuses(),
            Vocabulary::default_priorities(),
        )
    }

    #[test]
    fn test_render_stats_lists_every_configured_value() {
        let mut stats = StatsSnapshot {
            total: TotalStats { tickets: 5 },
            ..Default::default()
        };
        stats.status.insert("open".to_string(), 3);
        stats.priority.insert("high".to_string(), 2);

        let rendered = render_stats(
            &stats,
            &Vocabulary::default_statuses(),
            &Vocabulary::default_priorities(),
        );
        assert!(rendered.contains("Total tickets: 5"));
        assert!(rendered.contains("Open: 3"));
        // Zero-count entries still render
        assert!(rendered.contains("Waiting on Customer: 0"));
        assert!(rendered.contains("High priority: 2"));
        assert!(rendered.contains("Low priority: 0"));
    }

    #[test]
    fn test_frame_shows_stats_pending_before_first_fetch() {
        let mut dash = dashboard();
        let frame = render_frame(&mut dash, WatchView::Table);
        assert!(frame.contains("Stats pending…"));
    }

    #[test]
    fn test_frame_keeps_surfaces_independent() {
        let mut dash = dashboard();
        let seq = dash.begin_stats_refresh();
        dash.apply_stats_refresh(
            seq,
            Err(crate::error::DeskError::Api(
                "Unable to load stats".to_string(),
            )),
        );

        let frame = render_frame(&mut dash, WatchView::Table);
        assert!(frame.contains("Unable to load stats"));
        // The table surface still renders (as its empty state)
        assert!(frame.contains("No tickets match the current filters."));
    }
}
