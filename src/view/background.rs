//! Header and footer chrome around the poll card

use super::connect_button::connect_button;

pub const APP_TITLE: &str = "Stellar Poll";
pub const HEADLINE: &str = "Cast Your Vote On The Blockchain";
pub const TAGLINE: &str =
    "Participate in decentralized decision making powered by Soroban smart contracts.";
pub const FOOTER: &str = "Built with Soroban & Rust on Stellar Testnet";

/// Title bar with the connect control right-aligned
pub fn header(address: &str, width: usize) -> String {
    let button = connect_button(address);
    let used = APP_TITLE.chars().count() + button.chars().count();
    let gap = width.saturating_sub(used).max(1);

    let mut out = String::new();
    out.push_str(APP_TITLE);
    out.push_str(&" ".repeat(gap));
    out.push_str(&button);
    out.push('\n');
    out.push_str(&"═".repeat(width));
    out.push('\n');
    out.push('\n');
    out.push_str(&center(HEADLINE, width));
    out.push('\n');
    out.push_str(&center(TAGLINE, width));
    out.push('\n');
    out
}

pub fn footer(width: usize) -> String {
    format!("{}\n{}\n", "─".repeat(width), center(FOOTER, width))
}

/// Pad `text` on the left so it sits in the middle of `width`
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}
