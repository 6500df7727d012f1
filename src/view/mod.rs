//! Terminal View Layer
//!
//! Pure rendering of [`UiState`](crate::controller::UiState) into text.
//! Nothing here performs I/O or mutates state.
//!
//! ## Components
//!
//! - [`poll_card`]: question, options, counts, and the connect overlay
//! - [`progress_bar`]: per-option share bar
//! - [`connect_button`]: header connect control
//! - [`background`]: title, headline, footer
//! - [`status`]: transaction progress and error banners

pub mod background;
pub mod connect_button;
pub mod poll_card;
pub mod progress_bar;
pub mod status;

pub use connect_button::{connect_button, short_address};
pub use poll_card::{CardView, OptionRow, PollCardView};
pub use progress_bar::progress_bar;
pub use status::{error_banner, status_banner};

use crate::controller::UiState;

/// Default screen width in columns
pub const SCREEN_WIDTH: usize = 72;

/// Render the whole screen for one state snapshot
pub fn render_screen(state: &UiState, width: usize) -> String {
    let mut out = background::header(&state.wallet_address, width);
    out.push('\n');
    out.push_str(&PollCardView::from_state(state).render(width));

    if let Some(error) = error_banner(&state.error_message) {
        out.push('\n');
        out.push_str(&background::center(&error, width));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&background::footer(width));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::PollState;

    #[test]
    fn test_screen_composition() {
        let mut state = UiState::default();
        state.poll_fetched(Some(PollState {
            question: "Favorite color?".to_string(),
            options: vec!["Red".to_string(), "Blue".to_string()],
            votes: vec![1, 1],
        }));
        state.wallet_connected("GABCDEFGHIJKLMNOPQRSTUVWXYZ".to_string());
        state.begin_vote();
        state.vote_failed("Invalid option selected.".to_string());

        let screen = render_screen(&state, SCREEN_WIDTH);
        assert!(screen.starts_with(background::APP_TITLE));
        assert!(screen.contains("GABC...WXYZ"));
        assert!(screen.contains("Favorite color?"));
        assert!(screen.contains("50.0%"));
        assert!(screen.contains("(!) Invalid option selected."));
        assert!(screen.contains(background::FOOTER));
    }

    #[test]
    fn test_loading_screen() {
        let screen = render_screen(&UiState::default(), SCREEN_WIDTH);
        assert!(screen.contains("Connect Wallet"));
        assert!(screen.contains('▒'));
    }
}
