use comrak::plugins::syntect::SyntectAdapter;
use comrak::{ComrakOptions, ComrakPlugins, markdown_to_html_with_plugins};
use once_cell::sync::Lazy;

static MARKDOWN_OPTIONS: Lazy<ComrakOptions> = Lazy::new(|| {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.tasklist = true;
    options.extension.autolink = true;
    options.render.hardbreaks = true;
    options
});

static HIGHLIGHTER: Lazy<SyntectAdapter> =
    Lazy::new(|| SyntectAdapter::new(Some("base16-ocean.dark")));

/// Render message text to HTML, highlighting fenced code.
pub fn to_html(md: &str) -> String {
    let mut plugins = ComrakPlugins::default();
    plugins.render.codefence_syntax_highlighter = Some(&*HIGHLIGHTER);
    markdown_to_html_with_plugins(md, &MARKDOWN_OPTIONS, &plugins)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeBlock {
    pub language: String,
    /// Body without the fence lines.
    pub code: String,
}

/// The first fenced code block in `text`, if it is closed.
pub fn first_code_block(text: &str) -> Option<CodeBlock> {
    let start = text.find("```")?;
    let after_open = &text[start + 3..];
    let end = after_open.find("```")?;
    let inner = &after_open[..end];

    let (language, code) = match inner.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest),
        None => ("", inner),
    };
    Some(CodeBlock {
        language: language.to_string(),
        code: code.trim_end_matches('\n').to_string(),
    })
}
