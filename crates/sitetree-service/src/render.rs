use pulldown_cmark::{html, Options, Parser};

use sitetree_core::{FileNode, FrontMatter, Route};

/// Everything a renderer gets to see of a document.
pub struct PageSource<'a> {
    pub route: &'a Route,
    pub title: &'a str,
    pub raw_text: &'a str,
    /// Raw text minus the front-matter block
    pub body: &'a str,
    pub front_matter: Option<&'a FrontMatter>,
}

impl<'a> From<&'a FileNode> for PageSource<'a> {
    fn from(file: &'a FileNode) -> Self {
        Self {
            route: &file.route,
            title: &file.title,
            raw_text: &file.raw_text,
            body: file.body(),
            front_matter: file.front_matter.as_ref(),
        }
    }
}

/// Turns a document into HTML. Syntax highlighting, templates and theming
/// all belong to the implementation; the site never inspects the output.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &PageSource<'_>) -> String;
}

/// Plain CommonMark (plus tables, footnotes, strikethrough, task lists).
/// Fenced code blocks keep their `language-*` class for a client-side
/// highlighter.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &PageSource<'_>) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(source.body, options);
        let mut out = String::with_capacity(source.body.len() * 3 / 2);
        html::push_html(&mut out, parser);
        out
    }
}
