// Stack rendering - comma grouping, line alignment and the status line

use crate::stack::NumericStack;
use crate::value::{CalcError, Decimal};
use std::fmt;
use std::str::FromStr;

/// Narrowest display width the status line and stack rows are laid out for.
pub const MIN_WIDTH: usize = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Right,
    Decimal,
}

impl FromStr for Alignment {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "l" | "left" => Ok(Alignment::Left),
            "r" | "right" => Ok(Alignment::Right),
            "d" | "decimal" => Ok(Alignment::Decimal),
            other => Err(CalcError::invalid_argument(format!(
                "alignment must be 'l', 'r' or 'd', not '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Alignment::Left => "l",
            Alignment::Right => "r",
            Alignment::Decimal => "d",
        };
        write!(f, "{}", code)
    }
}

/// Group the integer part in threes. The fractional part is left as is.
pub fn comma(value: &Decimal) -> String {
    let text = value.to_plain_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// One row per stack value, bottom first, so line 1 (the top) is printed last.
pub fn render_stack(stack: &NumericStack, alignment: Alignment, width: usize) -> Vec<String> {
    let size = stack.len();
    let formatted: Vec<(String, String)> = stack
        .iter()
        .enumerate()
        .map(|(i, value)| (format!("{:02}:  ", size - i), comma(value)))
        .collect();

    match alignment {
        Alignment::Left => formatted
            .into_iter()
            .map(|(prefix, text)| format!("{}{}", prefix, text))
            .collect(),
        Alignment::Right => formatted
            .into_iter()
            .map(|(prefix, text)| {
                let room = width.saturating_sub(prefix.len());
                format!("{}{:>room$}", prefix, text, room = room)
            })
            .collect(),
        Alignment::Decimal => {
            let integer_len = |text: &str| text.find('.').unwrap_or(text.len());
            let widest = formatted
                .iter()
                .map(|(_, text)| integer_len(text))
                .max()
                .unwrap_or(0);
            formatted
                .into_iter()
                .map(|(prefix, text)| {
                    let pad = widest - integer_len(&text);
                    format!("{}{}{}", prefix, " ".repeat(pad), text)
                })
                .collect()
        }
    }
}

/// What the status line reports about the active stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<'a> {
    pub stack_name: &'a str,
    pub stack_number: u8,
    pub memory_used: usize,
    pub undo_len: usize,
    pub recording: bool,
}

pub fn status_line(status: &Status<'_>, width: usize) -> String {
    let mut segments = format!(
        "[Mem:{:02}]-[Undo:{:02}]-[{}:{}]",
        status.memory_used, status.undo_len, status.stack_name, status.stack_number
    );
    if status.recording {
        segments.push_str("-[Recording]");
    }
    let dashes = width.saturating_sub(segments.len() + 3).max(1);
    format!("+{}{}-+", "-".repeat(dashes), segments)
}
