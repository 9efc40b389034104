use crate::parser::FlagError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

const PADDING_WIDTH: usize = 2;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Lays out a label column followed by a word-wrapped description column.
#[derive(Debug)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    left: usize,
    middle: usize,
}

impl ColumnRenderer {
    /// Give the middle column whatever `total_width` leaves over, but never less than [`MINIMUM_MIDDLE_WIDTH`].
    pub(crate) fn guided(indent: usize, left: usize, total_width: usize) -> Self {
        let non_middle = indent + left + PADDING_WIDTH;
        let middle = std::cmp::max(
            total_width.saturating_sub(non_middle),
            MINIMUM_MIDDLE_WIDTH,
        );

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} within total {total_width}.  Selecting middle: {middle}.");
        }

        Self {
            indent,
            left,
            middle,
        }
    }

    pub(crate) fn render(&self, left: &str, middle: &str) -> Vec<String> {
        let indent = self.indent;
        let left_width = self.left;
        let padding = PADDING_WIDTH;
        let parts = chunk(middle, self.middle);

        if parts.is_empty() {
            return vec![format!("{:indent$}{left}", "")];
        }

        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let label = if i == 0 { left } else { "" };
                format!("{:indent$}{label:left_width$}{:padding$}{part}", "", "")
            })
            .collect()
    }
}

/// Word-wrap `paragraph` into lines no wider than `width` characters.
/// Words which cannot fit on a line of their own are hyphenated.
pub(crate) fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let width = std::cmp::max(width, 2);
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split_whitespace() {
        if !current.is_empty() {
            if current.chars().count() + word.chars().count() + 1 <= width {
                current.push(' ');
                current.push_str(word);
                continue;
            }

            lines.push(std::mem::take(&mut current));
        }

        hyphenate(width, &mut lines, &mut current, word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut start = 0;

    while characters.len() - start > width {
        let piece: String = characters[start..start + increment].iter().collect();
        lines.push(format!("{piece}-"));
        start += increment;
    }

    current.extend(&characters[start..]);
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: &FlagError);
    /// Print the usage which accompanies an error.
    fn print_error_context(&self, usage: String);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: &FlagError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, usage: String) {
        eprintln!("{usage}");
    }
}
