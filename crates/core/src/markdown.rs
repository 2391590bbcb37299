//! Markdown rendering for template exports and project guides.
//!
//! Renderers take borrowed view structs so they stay independent of the
//! database row types.

/// A code snippet attached to a step.
#[derive(Debug, Clone)]
pub struct SnippetDoc<'a> {
    pub language: &'a str,
    pub code: &'a str,
    pub is_example: bool,
}

/// One checklist step in a template export.
#[derive(Debug, Clone)]
pub struct StepDoc<'a> {
    pub order: i32,
    pub question: &'a str,
    pub description: &'a str,
    pub snippets: Vec<SnippetDoc<'a>>,
}

/// Input for [`render_template`].
#[derive(Debug, Clone)]
pub struct TemplateDoc<'a> {
    pub name: &'a str,
    pub technology: &'a str,
    pub description: &'a str,
    pub steps: Vec<StepDoc<'a>>,
}

/// One answered step in a project guide.
#[derive(Debug, Clone)]
pub struct GuideEntry<'a> {
    pub order: i32,
    pub question: &'a str,
    pub answer: &'a str,
    pub comment: &'a str,
    pub snippets: Vec<SnippetDoc<'a>>,
}

/// Input for [`render_guide`].
#[derive(Debug, Clone)]
pub struct GuideDoc<'a> {
    pub project_name: &'a str,
    pub template_name: &'a str,
    pub technology: &'a str,
    pub status: &'a str,
    pub progress: i16,
    pub description: &'a str,
    pub entries: Vec<GuideEntry<'a>>,
}

/// Footer appended to every generated guide.
pub const GUIDE_FOOTER: &str = "*Guide generated automatically*";

/// Render a template as a checklist document.
pub fn render_template(doc: &TemplateDoc<'_>) -> String {
    let mut out = format!("# {}\n\n", doc.name);
    out.push_str(&format!("**Technology:** {}\n\n", doc.technology));
    out.push_str(&format!("**Description:** {}\n\n", doc.description));
    out.push_str("## Checklist\n\n");

    for step in &doc.steps {
        out.push_str(&format!("### {}. {}\n\n", step.order, step.question));
        if !step.description.is_empty() {
            out.push_str(&format!("{}\n\n", step.description));
        }
        for snippet in &step.snippets {
            out.push_str(&format!("**{}:**\n", title_case(snippet.language)));
            push_code_block(&mut out, snippet);
        }
    }
    out
}

/// Render a project's answers as a guide. Only example snippets are
/// included.
pub fn render_guide(doc: &GuideDoc<'_>) -> String {
    let mut out = format!("# Guide: {}\n\n", doc.project_name);
    out.push_str(&format!("**Project:** {}\n", doc.project_name));
    out.push_str(&format!("**Template:** {}\n", doc.template_name));
    out.push_str(&format!("**Technology:** {}\n", doc.technology));
    out.push_str(&format!("**Status:** {}\n", doc.status));
    out.push_str(&format!("**Progress:** {}%\n\n", doc.progress));
    if !doc.description.is_empty() {
        out.push_str(&format!("**Description:** {}\n\n", doc.description));
    }
    out.push_str("## Checklist Responses\n\n");

    for entry in &doc.entries {
        out.push_str(&format!("### {}. {}\n\n", entry.order, entry.question));
        out.push_str(&format!("**Answer:** {}\n\n", entry.answer));
        if !entry.comment.is_empty() {
            out.push_str(&format!("**Comment:** {}\n\n", entry.comment));
        }
        for snippet in entry.snippets.iter().filter(|s| s.is_example) {
            out.push_str(&format!(
                "**Example in {}:**\n",
                title_case(snippet.language)
            ));
            push_code_block(&mut out, snippet);
        }
    }

    out.push_str("---\n\n");
    out.push_str(GUIDE_FOOTER);
    out.push('\n');
    out
}

fn push_code_block(out: &mut String, snippet: &SnippetDoc<'_>) {
    let fence = code_fence(snippet.code);
    out.push_str(&format!(
        "{fence}{}\n{}\n{fence}\n\n",
        snippet.language, snippet.code
    ));
}

/// A backtick fence at least three long and longer than any backtick run
/// inside `code`, so the block cannot be closed early.
pub fn code_fence(code: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in code.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    "`".repeat((longest + 1).max(3))
}

/// Capitalize the first letter of every word, lowercasing the rest
/// (`"react native"` -> `"React Native"`, `"c++"` -> `"C++"`).
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Build a safe `Content-Disposition` filename: `{prefix}{name}.md` with
/// anything other than ASCII alphanumerics, `-`, `_` and `.` replaced by `_`.
pub fn attachment_filename(prefix: &str, name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if cleaned.is_empty() { "export" } else { cleaned.as_str() };
    format!("{prefix}{stem}.md")
}
