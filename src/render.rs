use pulldown_cmark::{html, Event, Options, Parser};

/// Renders report Markdown to HTML for the preview pane.
///
/// Raw HTML embedded in the Markdown is shown as text instead of being
/// injected into the page.
pub fn markdown_to_html(markdown: &str) -> String {
  let mut options = Options::empty();
  options.insert(Options::ENABLE_TABLES);
  options.insert(Options::ENABLE_STRIKETHROUGH);
  options.insert(Options::ENABLE_TASKLISTS);

  let parser = Parser::new_ext(markdown, options).map(|event| match event {
    Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
    other => other,
  });

  let mut output = String::with_capacity(markdown.len() * 3 / 2);
  html::push_html(&mut output, parser);
  output
}
