//! Text rendering of the probability matrix shown on help requests.

use crate::dice::Die;
use crate::probability::ProbabilityMatrix;

/// Turns the current dice and their win probabilities into display text
pub trait ProbabilityRenderer {
    fn render(&self, dice: &[Die], matrix: &ProbabilityMatrix) -> String;
}

/// Bordered table with one row and one column per die.
///
/// Every cell, the diagonal included, shows the computed value.
#[derive(Clone, Copy, Debug)]
pub struct TableRenderer {
    precision: usize,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self { precision: 4 }
    }
}

impl TableRenderer {
    pub fn with_precision(precision: usize) -> Self {
        Self { precision }
    }

    fn label(index: usize, die: &Die) -> String {
        format!("Dice #{} → {}", index, die)
    }
}

impl ProbabilityRenderer for TableRenderer {
    fn render(&self, dice: &[Die], matrix: &ProbabilityMatrix) -> String {
        let mut header = vec!["User dice v".to_string()];
        header.extend(dice.iter().enumerate().map(|(i, d)| Self::label(i, d)));

        let body: Vec<Vec<String>> = dice
            .iter()
            .enumerate()
            .zip(matrix.rows())
            .map(|((i, d), row)| {
                let mut cells = vec![Self::label(i, d)];
                cells.extend(row.iter().map(|p| format!("{:.*}", self.precision, p)));
                cells
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                std::iter::once(&header)
                    .chain(body.iter())
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}", left, segments.join(mid), right)
        };
        let line = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!(" {}{} ", cell, " ".repeat(w - cell.chars().count())))
                .collect();
            format!("│{}│", padded.join("│"))
        };

        let total_width = widths.iter().map(|w| w + 3).sum::<usize>() + 1;
        let title = "Win Probabilities";
        let indent = total_width.saturating_sub(title.len()) / 2;

        let mut out = Vec::with_capacity(body.len() + 6);
        out.push("Probability of the win for the user:".to_string());
        out.push(format!("{}{}", " ".repeat(indent), title));
        out.push(rule("╭", "┬", "╮"));
        out.push(line(header.as_slice()));
        out.push(rule("├", "┼", "┤"));
        out.extend(body.iter().map(|row| line(row.as_slice())));
        out.push(rule("╰", "┴", "╯"));
        out.join("\n")
    }
}
