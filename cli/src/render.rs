use sweeper_core::{CellStatus, CellView, Outcome, SessionView, SettingsForm};

/// Single-width stand-in for each status, emoji glyphs do not line up in a terminal grid.
fn cell_char(cell: &CellView) -> char {
    match cell.status {
        CellStatus::Hidden => '#',
        CellStatus::Flagged => 'F',
        CellStatus::Blank => '.',
        CellStatus::Numbered(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        CellStatus::Exploded => '*',
    }
}

pub fn status_line(view: &SessionView) -> String {
    format!(
        "Mines: {}  Time: {}s  {}% ({})",
        view.remaining_mines, view.elapsed_secs, view.mine_ratio, view.difficulty
    )
}

pub fn board(view: &SessionView) -> String {
    let mut out = String::new();
    let label_width = view.rows.to_string().len();
    let cols = usize::from(view.cols);

    // column header, one digit per column so it stays aligned
    out.push_str(&format!("{:label_width$} ", ""));
    for col in 1..=cols {
        out.push(char::from_digit((col % 10) as u32, 10).unwrap_or(' '));
    }
    out.push('\n');

    for (row, cells) in view.cells.chunks(cols.max(1)).enumerate() {
        out.push_str(&format!("{:>label_width$} ", row + 1));
        out.extend(cells.iter().map(cell_char));
        out.push('\n');
    }
    out
}

/// Message shown once a round ends, `None` while it is still being played.
pub fn outcome_banner(view: &SessionView) -> Option<String> {
    let title = match view.outcome {
        Outcome::InProgress => return None,
        Outcome::Defeat => "Defeat!",
        Outcome::Victory => "Victory!",
    };
    Some(format!(
        "{title} Elapsed time: {}s. Type `n` for a new round.",
        view.elapsed_secs
    ))
}

/// What a settings form would give, shown next to its validation errors.
pub fn settings_preview(form: &SettingsForm) -> Option<String> {
    let mines = form.preview_total_mines()?;
    let difficulty = form.preview_difficulty()?;
    Some(format!("Would place {mines} mines ({difficulty})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{FixedMineGenerator, GameConfig, GameSession};

    fn session() -> GameSession<FixedMineGenerator> {
        let config = GameConfig::new(5, 12, 5).unwrap();
        GameSession::new(config, FixedMineGenerator::new([(1, 1), (5, 12)])).unwrap()
    }

    #[test]
    fn renders_statuses_with_row_labels() {
        let mut session = session();
        session.left_click((2, 2)).unwrap();
        session.right_click((1, 1)).unwrap();

        let text = board(&session.snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "  123456789012");
        assert_eq!(lines[1], "1 F###########");
        assert_eq!(lines[2], "2 #1##########");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn banner_only_after_round_ends() {
        let mut session = session();
        assert_eq!(outcome_banner(&session.snapshot()), None);

        session.left_click((1, 1)).unwrap();

        let banner = outcome_banner(&session.snapshot()).unwrap();
        assert!(banner.starts_with("Defeat!"));
    }

    #[test]
    fn status_line_shows_counters() {
        let mut session = session();
        session.right_click((3, 3)).unwrap();

        assert_eq!(
            status_line(&session.snapshot()),
            "Mines: 1  Time: 0s  5% (Casual)"
        );
    }

    #[test]
    fn settings_preview_needs_numbers() {
        let form = SettingsForm::new("3", "10", "50");
        assert_eq!(
            settings_preview(&form).as_deref(),
            Some("Would place 15 mines (Insane)")
        );

        assert_eq!(settings_preview(&SettingsForm::new("8", "x", "10")), None);
    }
}
