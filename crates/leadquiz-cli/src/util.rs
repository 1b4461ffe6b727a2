use crate::error::invalid_input;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Writes `label` to `output` and reads one trimmed line from `input`.
/// End of input is an error, so non-interactive runs fail instead of looping.
pub fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    Ok(prompt_raw_line(input, output, label)?.trim().to_string())
}

/// Like [`prompt_line`], but only the line terminator is removed.
pub fn prompt_raw_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        let field = label.trim().trim_end_matches(':');
        return Err(invalid_input(format!("no input for {field}")));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
