//! Render target for module output.
//!
//! A [`Container`] is the output region a module renders into: an HTML
//! buffer whose contents are fully replaced on every render. Replace-only
//! semantics keep re-renders idempotent: rendering the same results twice
//! yields byte-identical content, and a sort re-render never leaves the
//! region half-updated.

use std::fmt::Write as _;

/// Escape text for safe interpolation into HTML.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A mutable output region with replace-only update semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    html: String,
}

impl Container {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire contents of the container.
    pub fn replace(&mut self, html: impl Into<String>) {
        self.html = html.into();
    }

    /// Replace contents with a user-visible "no data" placeholder.
    pub fn placeholder(&mut self, message: &str) {
        self.html = format!(
            "<div class=\"no-data\">{}</div>",
            escape_html(message)
        );
    }

    /// Replace contents with an inline error message.
    ///
    /// Used for module-not-found and failed fetches; non-fatal to the rest
    /// of the page.
    pub fn error(&mut self, message: &str) {
        self.html = format!(
            "<div class=\"render-error\">{}</div>",
            escape_html(message)
        );
    }

    /// Clear the container.
    pub fn clear(&mut self) {
        self.html.clear();
    }

    /// The current contents.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Whether the container has any contents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Incremental builder for one render pass.
///
/// Modules assemble their markup here and commit it with
/// [`HtmlBuilder::commit`] / [`Container::replace`], so a panic-free
/// partial build can never leak into the visible region.
#[derive(Debug, Default)]
pub struct HtmlBuilder {
    buf: String,
}

impl HtmlBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw markup.
    pub fn raw(&mut self, html: &str) -> &mut Self {
        self.buf.push_str(html);
        self
    }

    /// Append escaped text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(&escape_html(text));
        self
    }

    /// Append an element with escaped text content.
    pub fn element(&mut self, tag: &str, class: &str, text: &str) -> &mut Self {
        let _ = write!(
            self.buf,
            "<{tag} class=\"{class}\">{}</{tag}>",
            escape_html(text)
        );
        self
    }

    /// Finish the build.
    #[must_use]
    pub fn finish(self) -> String {
        self.buf
    }

    /// Commit the built markup into a container, replacing its contents.
    pub fn commit(self, container: &mut Container) {
        container.replace(self.buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_replace_is_total() {
        let mut container = Container::new();
        container.replace("<p>first</p>");
        container.replace("<p>second</p>");
        assert_eq!(container.html(), "<p>second</p>");
    }

    #[test]
    fn test_placeholder_escapes() {
        let mut container = Container::new();
        container.placeholder("No <data> available");
        assert_eq!(
            container.html(),
            "<div class=\"no-data\">No &lt;data&gt; available</div>"
        );
    }

    #[test]
    fn test_error_marker() {
        let mut container = Container::new();
        container.error("module not found: ghost");
        assert!(container.html().contains("render-error"));
        assert!(container.html().contains("module not found: ghost"));
    }

    #[test]
    fn test_builder_commit() {
        let mut container = Container::new();
        container.replace("stale");
        let mut b = HtmlBuilder::new();
        b.raw("<table>").element("td", "name", "A & B").raw("</table>");
        b.commit(&mut container);
        assert_eq!(
            container.html(),
            "<table><td class=\"name\">A &amp; B</td></table>"
        );
    }

    #[test]
    fn test_clear() {
        let mut container = Container::new();
        container.replace("x");
        container.clear();
        assert!(container.is_empty());
    }
}
