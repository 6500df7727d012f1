//! Poll Card
//!
//! View-model for the poll card and its terminal rendering. The model is
//! derived from [`UiState`] alone; rendering is a pure function of the model.

use serde::Serialize;

use super::background::center;
use super::progress_bar::{empty_track, progress_bar};
use super::status::status_banner;
use crate::controller::{TxStatus, UiState};

const BAR_WIDTH: usize = 40;
const SKELETON_ROWS: usize = 2;

pub const OVERLAY_TITLE: &str = "Connect to Participate";
pub const OVERLAY_TEXT: &str = "Sign in with your wallet to see results and cast your vote.";
pub const HINT_UNDO: &str = "Select again to undo";
pub const HINT_SELECT: &str = "Select to vote";
pub const MY_CHOICE: &str = "My Choice";

/// One option line on the card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionRow {
    pub index: u32,
    pub label: String,
    pub votes: u32,
    pub percentage: f64,
    pub selected: bool,
    /// Accepts a vote right now
    pub enabled: bool,
    pub hint: &'static str,
}

/// Loaded card contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub question: String,
    pub rows: Vec<OptionRow>,
    pub total_votes: u64,
    /// Counts and percentages are only visible to a connected user
    pub show_results: bool,
    pub status: Option<String>,
}

/// What the poll card shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PollCardView {
    /// No poll data yet
    Skeleton,
    Card(CardView),
}

impl PollCardView {
    pub fn from_state(state: &UiState) -> Self {
        let poll = match &state.poll {
            Some(poll) if !state.loading => poll,
            _ => return PollCardView::Skeleton,
        };

        let connected = state.is_connected();
        let pending = state.tx_status == TxStatus::Pending;

        let rows = poll
            .options
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let selected = state.user_choice == Some(i as u32);
                OptionRow {
                    index: i as u32,
                    label: label.clone(),
                    votes: poll.votes_for(i),
                    percentage: poll.percentage(i),
                    selected,
                    enabled: connected && !pending,
                    hint: if selected { HINT_UNDO } else { HINT_SELECT },
                }
            })
            .collect();

        PollCardView::Card(CardView {
            question: poll.question.clone(),
            rows,
            total_votes: poll.total_votes(),
            show_results: connected,
            status: status_banner(state.tx_status, connected),
        })
    }

    /// Render the card as terminal text
    pub fn render(&self, width: usize) -> String {
        match self {
            PollCardView::Skeleton => render_skeleton(width),
            PollCardView::Card(card) => card.render(width),
        }
    }
}

fn render_skeleton(width: usize) -> String {
    let mut out = String::new();
    out.push_str(&center(&"▒".repeat(width * 3 / 4), width));
    out.push_str("\n\n");
    for _ in 0..SKELETON_ROWS {
        out.push_str(&"▒".repeat(width));
        out.push_str("\n\n");
    }
    out
}

impl CardView {
    fn render(&self, width: usize) -> String {
        let bar_width = BAR_WIDTH.min(width.saturating_sub(4)).max(1);
        let mut out = String::new();

        out.push_str(&center(&self.question, width));
        out.push_str("\n\n");

        if !self.show_results {
            out.push_str(&center(&format!("[ {} ]", OVERLAY_TITLE), width));
            out.push('\n');
            out.push_str(&center(OVERLAY_TEXT, width));
            out.push_str("\n\n");
        }

        for row in &self.rows {
            let marker = if row.selected && self.show_results { '>' } else { ' ' };
            let mut line = format!("{} {}) {}", marker, row.index + 1, row.label);
            if self.show_results {
                if row.selected {
                    line.push_str(&format!("  [{}]", MY_CHOICE));
                }
                let pct = format!("{:.1}%", row.percentage);
                let used = line.chars().count() + pct.chars().count();
                line.push_str(&" ".repeat(width.saturating_sub(used).max(1)));
                line.push_str(&pct);
            }
            out.push_str(&line);
            out.push('\n');

            if self.show_results {
                out.push_str(&format!("    {}\n", progress_bar(row.percentage, bar_width)));
                let hint = if row.enabled { row.hint } else { "" };
                out.push_str(&format!("    {:<28}{} votes\n", hint, row.votes));
            } else {
                out.push_str(&format!("    {}\n", empty_track(bar_width)));
            }
        }

        if let Some(status) = &self.status {
            out.push('\n');
            out.push_str(&center(status, width));
            out.push('\n');
        }

        out
    }
}
