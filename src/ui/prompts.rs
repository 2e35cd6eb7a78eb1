use colored::*;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("No {0} found")]
    Empty(String),

    #[error("Invalid input: '{0}' is not a number")]
    InvalidInput(String),

    #[error("Invalid selection: {choice} is not between 1 and {len}")]
    OutOfRange { choice: i64, len: usize },

    #[error("No input received while selecting {0}")]
    EndOfInput(String),

    #[error("Failed to read selection: {0}")]
    Io(#[from] io::Error),
}

/// Numbered menu on stdin/stdout; see [`select_from_list_with`]
pub fn select_from_list<'a, T, F>(items: &'a [T], label: &str, display: F) -> Result<&'a T, SelectError>
where
    F: Fn(&T) -> String,
{
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    select_from_list_with(items, label, display, &mut input, &mut output)
}

/// Print a 1-based menu of `items`, read one line and return the chosen item
///
/// An empty line picks the first item. Anything that is not a number in
/// `1..=items.len()` is an error, as is an empty list.
pub fn select_from_list_with<'a, T, F, R, W>(
    items: &'a [T],
    label: &str,
    display: F,
    input: &mut R,
    output: &mut W,
) -> Result<&'a T, SelectError>
where
    F: Fn(&T) -> String,
    R: BufRead,
    W: Write,
{
    if items.is_empty() {
        return Err(SelectError::Empty(label.to_string()));
    }

    writeln!(output)?;
    writeln!(
        output,
        "{}",
        format!("Select one of the following {}:", label).bright_white().bold()
    )?;
    for (i, item) in items.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, display(item))?;
    }
    write!(output, "Enter a number (default 1): ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SelectError::EndOfInput(label.to_string()));
    }

    let index = parse_choice(&line, items.len())?;
    log::debug!("Selected {} #{} of {}", label, index + 1, items.len());
    Ok(&items[index])
}

/// Turn a raw input line into a 0-based index into a list of `len` items
pub fn parse_choice(line: &str, len: usize) -> Result<usize, SelectError> {
    let raw = line.trim_end_matches(['\r', '\n']);
    if raw.is_empty() {
        return Ok(0);
    }

    let choice: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SelectError::InvalidInput(raw.to_string()))?;

    if choice < 1 || choice as u64 > len as u64 {
        return Err(SelectError::OutOfRange { choice, len });
    }
    Ok((choice - 1) as usize)
}

/// Block until the user presses Enter
pub fn wait_for_enter(message: &str) -> io::Result<()> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(())
}
