//! Plain-text table rendering with rounded box-drawing borders.

/// Render `rows` under `headers` as a rounded grid. Cells may span several
/// lines; every cell is left aligned with one space of padding.
pub fn rounded_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths = headers
        .iter()
        .map(|header| text_width(header))
        .collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().take(columns).enumerate() {
            widths[idx] = widths[idx].max(text_width(cell));
        }
    }

    let mut lines = Vec::new();
    lines.push(border(&widths, '╭', '┬', '╮'));
    push_row(&mut lines, &widths, headers.iter().copied());
    for row in rows {
        lines.push(border(&widths, '├', '┼', '┤'));
        push_row(&mut lines, &widths, row.iter().map(String::as_str));
    }
    lines.push(border(&widths, '╰', '┴', '╯'));
    lines.join("\n")
}

fn border(widths: &[usize], left: char, joint: char, right: char) -> String {
    let segments = widths
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect::<Vec<_>>();
    format!("{left}{}{right}", segments.join(&joint.to_string()))
}

fn push_row<'a>(lines: &mut Vec<String>, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    let cells = cells
        .map(|cell| cell.split('\n').collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let height = cells.iter().map(Vec::len).max().unwrap_or(1);
    for line_idx in 0..height {
        let parts = widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                let text = cells
                    .get(col)
                    .and_then(|lines| lines.get(line_idx))
                    .copied()
                    .unwrap_or("");
                let pad = width - text.chars().count();
                format!(" {text}{} ", " ".repeat(pad))
            })
            .collect::<Vec<_>>();
        lines.push(format!("│{}│", parts.join("│")));
    }
}

fn text_width(text: &str) -> usize {
    text.split('\n')
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
}

/// Greedy word wrap at `width` characters.
///
/// Whitespace, including newlines, separates words. Words longer than
/// `width` are split into `width`-sized pieces.
pub fn wrap(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let chars = word.chars().collect::<Vec<_>>();
        let mut chunks = chars.chunks(width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece = chunk.iter().collect::<String>();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}
