//! Markdown text rendering of a [`PrintLayout`].
//!
//! Produces a plain-text page that can be printed, diffed or piped to another tool. Only user
//! text is escaped, so the structure of the document (headings, lists, rules) cannot be
//! altered by what was typed into a prescription.
//!
//! Escaping rules for user text:
//! - `#` at line start becomes `\#`
//! - triple backticks become `` \`\`\` ``
//! - a line that is only `---`, `***` or `___` is prefixed with `\`
//!
//! Page format produced:
//! ```markdown
//! # <doctor name> | <bangla name>
//! <degree> | <bangla degree>
//!
//! **Name:** <name> **Date:** <dd/mm/yyyy> **Age:** <age> **Id:** <id>
//!
//! ---
//!
//! ## Chief Complaint
//! - Fever - high grade
//!
//! ## Rx
//! 1. **Napa 500mg**
//!    1+0+1 5 Days
//!
//! ---
//!
//! Next Visit: 12 Mar 2026
//! Registered To <doctor> <phone>
//! ```

use crate::layout::{Block, Column, PrintLayout};

const RULE: &str = "---";

pub fn render_page(layout: &PrintLayout) -> String {
    let mut out = String::new();
    let header = &layout.header;
    let bar = &layout.patient_bar;

    out.push_str(&format!(
        "# {} | {}\n",
        escape(&header.name),
        escape(&header.name_bangla)
    ));
    out.push_str(&format!(
        "{} | {}\n\n",
        escape(&header.degree),
        escape(&header.degree_bangla)
    ));
    out.push_str(&format!(
        "**Name:** {} **Date:** {} **Age:** {} **Id:** {}\n\n{RULE}\n",
        escape(&bar.name),
        escape(&bar.date),
        bar.age,
        bar.id
    ));

    render_column(&mut out, &layout.left);
    render_column(&mut out, &layout.right);

    out.push_str(&format!("\n{RULE}\n\n"));
    if let Some(next_visit) = &layout.footer.next_visit {
        out.push_str(&format!("Next Visit: {}\n", escape(next_visit)));
    }
    out.push_str(&escape(&layout.footer.registration_line()));
    out.push('\n');
    out
}

fn render_column(out: &mut String, column: &Column) {
    for block in &column.blocks {
        match block {
            Block::Title { text } => out.push_str(&format!("\n## {text}\n")),
            Block::Bullet { text, note } => match note {
                Some(note) => out.push_str(&format!("- {} - {}\n", escape(text), escape(note))),
                None => out.push_str(&format!("- {}\n", escape(text))),
            },
            Block::Placeholder { text } => out.push_str(&format!("_{text}_\n")),
            Block::Medicine {
                number,
                name,
                detail,
            } => {
                out.push_str(&format!("{number}. **{}**\n", escape(name)));
                if let Some(detail) = detail {
                    let timing = timing_without_count(&detail.timing, &detail.duration);
                    let parts = [detail.schedule.as_str(), timing, detail.duration.as_str()]
                        .into_iter()
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .collect::<Vec<_>>()
                        .join(" ");
                    out.push_str(&format!("   {}\n", escape(&parts)));
                }
            }
        }
    }

    if column.clipped > 0 {
        out.push_str(&format!("\n_({} more not shown)_\n", column.clipped));
    }
}

/// Timing text runs up to `Days`, so it usually ends with the day count already printed as
/// part of the duration.
fn timing_without_count<'a>(timing: &'a str, duration: &str) -> &'a str {
    let count = duration.split_whitespace().next().unwrap_or_default();
    match timing.trim_end().rsplit_once(char::is_whitespace) {
        Some((rest, last)) if !count.is_empty() && last == count => rest,
        None if !count.is_empty() && timing.trim() == count => "",
        _ => timing,
    }
}

/// Escapes user text line by line so it cannot add headings, code fences or rules.
fn escape(text: &str) -> String {
    text.lines()
        .map(|line| {
            let trimmed = line.trim();
            if line.trim_start().starts_with('#') {
                line.replacen('#', r"\#", 1)
            } else if trimmed == "---" || trimmed == "***" || trimmed == "___" {
                format!(r"\{trimmed}")
            } else {
                line.replace("```", r"\`\`\`")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
