use std::io::{self, Write};

use concentration_core::{CardView, Snapshot};

pub const DEFAULT_COLUMNS: u16 = 4;

const BACK: &str = "##";

/// Draws the score bar and the card grid, `labels` maps pair keys to face names.
pub fn draw<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    labels: &[String],
    columns: usize,
) -> io::Result<()> {
    let cell = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .max(BACK.len());
    let index_width = snapshot.cards.len().saturating_sub(1).to_string().len();

    writeln!(
        out,
        "Score: {}   Pairs: {}/{}",
        snapshot.score, snapshot.pairs_found, snapshot.total_pairs
    )?;
    for (row, cards) in snapshot.cards.chunks(columns.max(1)).enumerate() {
        let line: Vec<_> = cards
            .iter()
            .enumerate()
            .map(|(column, card)| {
                let pos = row * columns.max(1) + column;
                format!("{pos:>index_width$} {}", face(card, labels, cell))
            })
            .collect();
        writeln!(out, "{}", line.join("  "))?;
    }
    out.flush()
}

pub fn draw_game_over<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "Game over! Final score: {}", snapshot.score)?;
    out.flush()
}

fn face(card: &CardView, labels: &[String], cell: usize) -> String {
    let label = card
        .pair_key
        .and_then(|key| labels.get(key.index()))
        .map_or(BACK, String::as_str);
    if card.matched {
        format!("( {label:^cell$} )")
    } else {
        format!("[ {label:^cell$} ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concentration_core::{Board, Deck, MatchController, PairKey};

    fn labels() -> Vec<String> {
        vec!["Sun".to_string(), "Moon".to_string()]
    }

    fn controller() -> MatchController {
        let keys = [0, 1, 1, 0].map(PairKey::new);
        MatchController::new(Board::new(
            Deck::from_arrangement(&labels(), &keys).unwrap(),
        ))
    }

    fn render(controller: &MatchController, columns: usize) -> String {
        let mut out = Vec::new();
        draw(&mut out, &controller.snapshot(), &labels(), columns).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn hidden_board_shows_backs_in_rows() {
        let text = render(&controller(), 2);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Score: 0   Pairs: 0/2");
        assert_eq!(lines[1], "0 [  ##  ]  1 [  ##  ]");
        assert_eq!(lines[2], "2 [  ##  ]  3 [  ##  ]");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn revealed_and_matched_faces_are_labelled() {
        let mut controller = controller();
        controller.select(0);
        controller.select(3);
        controller.tick(controller.flip_delay());
        controller.select(1);

        let text = render(&controller, 4);

        assert!(text.contains("0 ( Sun  )"), "{text}");
        assert!(text.contains("3 ( Sun  )"), "{text}");
        assert!(text.contains("1 [ Moon ]"), "{text}");
        assert!(text.contains("2 [  ##  ]"), "{text}");
        assert!(text.starts_with("Score: 10   Pairs: 1/2"));
    }

    #[test]
    fn game_over_banner_carries_score() {
        let mut out = Vec::new();
        let mut snapshot = controller().snapshot();
        snapshot.score = 20;

        draw_game_over(&mut out, &snapshot).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Game over! Final score: 20\n");
    }
}
