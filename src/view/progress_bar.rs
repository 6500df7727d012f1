//! Progress Bar
//!
//! Fixed-width horizontal bar for an option's share of the vote.

const FILLED: char = '█';
const EMPTY: char = '░';

/// Render `percentage` (clamped to 0..=100) as a bar `width` cells wide
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let pct = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    let mut bar = String::with_capacity(width * 3);
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(width - filled));
    bar
}

/// Placeholder track shown when results are hidden
pub fn empty_track(width: usize) -> String {
    progress_bar(0.0, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(bar: &str) -> usize {
        bar.chars().filter(|&c| c == FILLED).count()
    }

    #[test]
    fn test_widths() {
        assert_eq!(progress_bar(60.0, 10).chars().count(), 10);
        assert_eq!(filled(&progress_bar(60.0, 10)), 6);
        assert_eq!(filled(&progress_bar(0.0, 10)), 0);
        assert_eq!(filled(&progress_bar(100.0, 10)), 10);
    }

    #[test]
    fn test_clamps() {
        assert_eq!(filled(&progress_bar(150.0, 8)), 8);
        assert_eq!(filled(&progress_bar(-5.0, 8)), 0);
        assert_eq!(filled(&progress_bar(f64::NAN, 8)), 0);
    }

    #[test]
    fn test_empty_track() {
        assert_eq!(empty_track(4), "░░░░");
    }
}
