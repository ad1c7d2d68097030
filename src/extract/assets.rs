//! Downloadable assets referenced by a stored HTML document.

use scraper::{Html, Selector};

use crate::video::kaltura::PLAYER_IFRAME_ID;

/// A file link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLink {
    pub title: String,
    pub href: String,
}

/// Everything a document links to that should be mirrored next to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssets {
    pub files: Vec<FileLink>,
    /// Embed URLs of player iframes, in document order.
    pub videos: Vec<String>,
}

impl PageAssets {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.videos.is_empty()
    }
}

/// Scan a document for file anchors and embedded players.
///
/// Anchors without an `href` and iframes without a `src` are ignored.
pub fn scan_document(html: &str) -> PageAssets {
    let doc = Html::parse_document(html);
    let file_sel = Selector::parse(r#"a[data-api-returntype="File"]"#).ok();
    let player_sel = Selector::parse(&format!("iframe#{}", PLAYER_IFRAME_ID)).ok();

    let files = file_sel
        .as_ref()
        .map(|sel| {
            doc.select(sel)
                .filter_map(|a| {
                    let href = a.value().attr("href")?.trim();
                    if href.is_empty() {
                        return None;
                    }
                    let text = a.text().collect::<String>();
                    let title = link_title(a.value().attr("title"), &text, href)?;
                    Some(FileLink {
                        title,
                        href: href.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let videos = player_sel
        .as_ref()
        .map(|sel| {
            doc.select(sel)
                .filter_map(|iframe| iframe.value().attr("src"))
                .map(str::trim)
                .filter(|src| !src.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PageAssets { files, videos }
}

/// `title` attribute, else the link text, else the last path segment of the URL.
fn link_title(title: Option<&str>, text: &str, href: &str) -> Option<String> {
    let candidate = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    title
        .and_then(candidate)
        .or_else(|| candidate(text))
        .or_else(|| {
            let path = href.split(['?', '#']).next().unwrap_or(href);
            path.trim_end_matches('/').rsplit('/').next().and_then(candidate)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_document_finds_file_links_and_players() {
        let html = r#"
            <html><body>
              <p>Read <a href="https://canvas.example.edu/courses/1/files/10/download"
                         data-api-returntype="File" title="syllabus.pdf">the syllabus</a></p>
              <a href="https://example.com/other">not a file</a>
              <iframe id="kaltura_player" src="https://cdn.example.com/p/1/sp/100/embedIframeJs/a"></iframe>
              <iframe id="other" src="https://example.com/embed"></iframe>
              <iframe id="kaltura_player" src="https://cdn.example.com/p/1/sp/100/embedIframeJs/b"></iframe>
            </body></html>
        "#;

        let assets = scan_document(html);
        assert_eq!(
            assets.files,
            vec![FileLink {
                title: "syllabus.pdf".into(),
                href: "https://canvas.example.edu/courses/1/files/10/download".into(),
            }]
        );
        assert_eq!(
            assets.videos,
            vec![
                "https://cdn.example.com/p/1/sp/100/embedIframeJs/a",
                "https://cdn.example.com/p/1/sp/100/embedIframeJs/b",
            ]
        );
    }

    #[test]
    fn test_title_fallbacks() {
        let html = r#"
            <a data-api-returntype="File" href="https://x.edu/files/1">Lecture notes</a>
            <a data-api-returntype="File" href="https://x.edu/files/2/slides.pdf?verifier=abc"></a>
            <a data-api-returntype="File">no href</a>
        "#;

        let titles: Vec<String> = scan_document(html).files.into_iter().map(|f| f.title).collect();
        assert_eq!(titles, vec!["Lecture notes", "slides.pdf"]);
    }

    #[test]
    fn test_empty_document() {
        assert!(scan_document("<p>plain text</p>").is_empty());
    }
}
