//! Interactive collection of per-run options
//!
//! Blocking stdin prompts, answered once before orchestration begins.
//! The session itself only ever sees the resulting [`RunOptions`].

use std::io::{self, BufRead, Write};

use crate::models::{RunOptions, DEFAULT_PROMPT};

/// Affirmative answers are "y" or "yes", case-insensitive, surrounding
/// whitespace ignored. Anything else is negative.
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Collect run options from stdin/stdout.
pub fn collect_run_options() -> io::Result<RunOptions> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    collect_run_options_from(&mut reader, &mut writer)
}

/// Prompt order and wording are an observable contract: query, apply
/// label, delete label, download attachments, prompt override.
pub fn collect_run_options_from<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
) -> io::Result<RunOptions> {
    let search_query = prompt_line(
        reader,
        writer,
        "\nInput here the query you want to apply in the search for the email (e.g. is:unread from:example@gmail.com): ",
    )?;

    let label_to_apply = if ask_yes_no(
        reader,
        writer,
        "\nDo you want to apply a label to the emails handled by the program? (yes/no): ",
    )? {
        Some(prompt_line(
            reader,
            writer,
            "Input here the label to apply (e.g. Read by AI): ",
        )?)
    } else {
        None
    };

    let label_to_delete = if ask_yes_no(reader, writer, "\nDo you want to delete a label? (yes/no): ")? {
        Some(prompt_line(
            reader,
            writer,
            "Input here the label to delete (e.g. Read by AI): ",
        )?)
    } else {
        None
    };

    let download_attachments = ask_yes_no(
        reader,
        writer,
        "\nDo you want to download email attachments? (yes/no): ",
    )?;

    let prompt_template = if ask_yes_no(
        reader,
        writer,
        "Do you want to change the prompt given to the LLM? (yes/no): ",
    )? {
        prompt_line(
            reader,
            writer,
            "Input the prompt (e.g. Summarize the email content): ",
        )?
    } else {
        DEFAULT_PROMPT.to_string()
    };

    Ok(RunOptions {
        search_query,
        label_to_apply,
        label_to_delete,
        download_attachments,
        prompt_template,
    })
}

fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> io::Result<String> {
    write!(writer, "{}", question)?;
    writer.flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn ask_yes_no<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> io::Result<bool> {
    let answer = prompt_line(reader, writer, question)?;
    Ok(is_affirmative(&answer))
}
