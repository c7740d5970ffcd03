use crate::error::{PipelineError, Result};
use html2text::render::text_renderer::TrivialDecorator;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

pub const DEFAULT_TITLE: &str = "Untitled";

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("paragraph pattern"));
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").expect("heading pattern"));
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
        .expect("noise pattern")
});

/// Title and paragraphs pulled out of one markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// Read `path` as UTF-8 markup and extract its article.
pub fn extract_file(path: &Path) -> Result<Article> {
    let markup = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    extract(&markup, &path.display().to_string())
}

/// Extract the `<h1>` title and every `<p>` element, in document order.
///
/// Fails with `EmptyContent` when the document has no paragraph elements.
/// A missing heading falls back to [`DEFAULT_TITLE`].
pub fn extract(markup: &str, source_name: &str) -> Result<Article> {
    let markup = NOISE.replace_all(markup, "");

    let paragraphs: Vec<String> = PARAGRAPH
        .captures_iter(&markup)
        .map(|cap| element_text(&cap[1]))
        .collect();
    if paragraphs.is_empty() {
        return Err(PipelineError::EmptyContent {
            source_name: source_name.to_string(),
        });
    }

    let mut headings = HEADING.captures_iter(&markup);
    let title = match headings.next() {
        Some(cap) => element_text(&cap[1]),
        None => {
            warn!("No <h1> heading in {}; using \"{}\"", source_name, DEFAULT_TITLE);
            DEFAULT_TITLE.to_string()
        }
    };
    if headings.next().is_some() {
        warn!("More than one <h1> in {}; using the first", source_name);
    }
    let title = if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    };

    for (i, p) in paragraphs.iter().enumerate() {
        debug!("Paragraph {}: {:.80}", i + 1, p);
    }
    info!(
        "Extracted \"{}\" with {} paragraphs from {}",
        title,
        paragraphs.len(),
        source_name
    );

    Ok(Article { title, paragraphs })
}

/// Text content of an element's inner markup with entities decoded. Only
/// leading and trailing whitespace is stripped; the `<pre>` wrapper keeps
/// html2text from collapsing interior runs.
fn element_text(inner: &str) -> String {
    let wrapped = format!("<pre>{}</pre>", inner);
    let text = html2text::from_read_with_decorator(wrapped.as_bytes(), usize::MAX, TrivialDecorator::new());
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_title_and_paragraphs_in_order() {
        let doc = r#"
            <html><body>
                <h1> Test </h1>
                <p>  first  </p>
                <div><p class="lead">second <em>with</em> markup</p></div>
                <p>third</p>
            </body></html>
        "#;
        let article = extract(doc, "doc.html").unwrap();
        assert_eq!(article.title, "Test");
        assert_eq!(
            article.paragraphs,
            vec!["first", "second with markup", "third"]
        );
    }

    #[test]
    fn missing_heading_defaults_title() {
        let article = extract("<p>only</p>", "doc.html").unwrap();
        assert_eq!(article.title, DEFAULT_TITLE);
        assert_eq!(article.paragraphs, vec!["only"]);
    }

    #[test]
    fn no_paragraphs_is_empty_content() {
        let err = extract("<h1>Title</h1><div>not a paragraph</div>", "doc.html").unwrap_err();
        assert!(matches!(err, PipelineError::EmptyContent { .. }));
    }

    #[test]
    fn ignores_pre_and_commented_out_paragraphs() {
        let doc = "<pre>code</pre><!-- <p>hidden</p> --><p>shown</p>";
        let article = extract(doc, "doc.html").unwrap();
        assert_eq!(article.paragraphs, vec!["shown"]);
    }

    #[test]
    fn decodes_entities() {
        let article = extract("<P>Fish &amp; chips</P>", "doc.html").unwrap();
        assert_eq!(article.paragraphs, vec!["Fish & chips"]);
    }

    #[test]
    fn interior_whitespace_survives_stripping() {
        let doc = "<h1>  A  Title </h1><p>line one\n   line two</p><p>  a  b  </p>";
        let article = extract(doc, "doc.html").unwrap();
        assert_eq!(article.title, "A  Title");
        assert_eq!(article.paragraphs, vec!["line one\n   line two", "a  b"]);
    }

    #[test]
    fn paragraph_count_matches_element_count() {
        for k in 1..8 {
            let doc: String = (0..k).map(|i| format!("<p> p{} </p>", i)).collect();
            let article = extract(&format!("<h1>T</h1>{}", doc), "doc.html").unwrap();
            let expected: Vec<String> = (0..k).map(|i| format!("p{}", i)).collect();
            assert_eq!(article.paragraphs, expected);
        }
    }

    #[test]
    fn extract_file_reports_missing_source() {
        let err = extract_file(Path::new("/nonexistent/article.html")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
