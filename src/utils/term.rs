//! Styled terminal output
//!
//! The whole rendering surface of the client: progress lines, the meeting
//! list, and the final briefing document. Styling degrades to plain text
//! when stdout is not a terminal, so piped output stays clean.

use crate::domain::briefing::{BriefingBlock, BriefingDocument};
use crossterm::style::Stylize;
use std::io::IsTerminal;

fn styled() -> bool {
    std::io::stdout().is_terminal()
}

/// Section banner
pub fn banner(title: &str) {
    if styled() {
        println!("{}", title.bold());
    } else {
        println!("{title}");
    }
}

/// One progress line in the briefing view
pub fn status_line(text: &str) {
    if styled() {
        println!("{} {text}", ">".dark_green());
    } else {
        println!("> {text}");
    }
}

/// Neutral informational line
pub fn info_line(text: &str) {
    println!("{text}");
}

/// Visible warning line
pub fn warning_line(text: &str) {
    if styled() {
        println!("{} {text}", "!".dark_yellow());
    } else {
        println!("! {text}");
    }
}

/// Visible error line, on stderr
pub fn error_line(text: &str) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {text}", "error:".red().bold());
    } else {
        eprintln!("error: {text}");
    }
}

/// One entry of the meeting list
pub fn meeting_entry(title: &str, when: &str, id: &str) {
    if styled() {
        println!("  {}", title.bold());
        println!("    {}", when.dark_grey());
        println!("    id: {id}");
    } else {
        println!("  {title}");
        println!("    {when}");
        println!("    id: {id}");
    }
}

/// Render the final briefing document, superseding the progress view
pub fn render_document(document: &BriefingDocument) {
    println!();
    if document.is_empty() {
        info_line("(empty briefing)");
        return;
    }
    for block in document.blocks() {
        match block {
            BriefingBlock::Heading(text) => {
                if styled() {
                    println!("{}", text.as_str().bold().underlined());
                } else {
                    println!("{text}");
                }
            }
            BriefingBlock::Bullet(text) => println!("  - {text}"),
            BriefingBlock::Text(text) => println!("{text}"),
            BriefingBlock::Blank => println!(),
        }
    }
}
