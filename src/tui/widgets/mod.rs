pub mod badges;
pub mod dashboard;
pub mod lesson_detail;
pub mod lessons;

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

// Ten-cell bar for a 0-100 value
fn percent_bar(pct: u8) -> String {
    let filled = (pct.min(100) as usize + 5) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn score_color(score: u8) -> ratatui::style::Color {
    use ratatui::style::Color;
    match score {
        90..=u8::MAX => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_bar_rounds_to_cells() {
        assert_eq!(percent_bar(0), "░░░░░░░░░░");
        assert_eq!(percent_bar(100), "██████████");
        assert_eq!(percent_bar(45), "█████░░░░░");
        assert_eq!(percent_bar(44), "████░░░░░░");
    }

    #[test]
    fn truncate_handles_multibyte() {
        assert_eq!(truncate("中文中文中文", 5), "中文...");
    }
}
