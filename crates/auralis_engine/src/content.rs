//! Content role: answers `getPageContent` requests with the page's visible text.

use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};

pub const GET_PAGE_CONTENT: &str = "getPageContent";

/// Elements whose text never shows up on screen.
const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub action: String,
}

impl ContentRequest {
    pub fn get_page_content() -> Self {
        Self {
            action: GET_PAGE_CONTENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: String,
}

/// Handles one request against the given document. Unknown actions get no
/// response, the same as a content script that ignores them.
pub fn respond_to_request(request: &ContentRequest, html: &str) -> Option<ContentResponse> {
    if request.action != GET_PAGE_CONTENT {
        return None;
    }
    Some(ContentResponse {
        content: visible_text(html),
    })
}

/// Text of `<body>` (or the whole document when there is none), with hidden
/// elements skipped and whitespace runs collapsed. Block boundaries become
/// newlines.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|sel| doc.select(&sel).next())
        .unwrap_or_else(|| doc.root_element());

    let mut lines = Vec::new();
    let mut current = String::new();
    collect_text(root, &mut current, &mut lines);
    flush_line(&mut current, &mut lines);
    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, current: &mut String, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                for word in text.split_whitespace() {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(word);
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN_ELEMENTS.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = is_block(name);
                if block {
                    flush_line(current, lines);
                }
                collect_text(child_el, current, lines);
                if block {
                    flush_line(current, lines);
                }
            }
            _ => {}
        }
    }
}

fn flush_line(current: &mut String, lines: &mut Vec<String>) {
    if !current.is_empty() {
        lines.push(std::mem::take(current));
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "br"
            | "li"
            | "ul"
            | "ol"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "nav"
            | "main"
            | "aside"
            | "table"
            | "tr"
            | "blockquote"
            | "pre"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_skips_scripts_and_styles() {
        let html = r#"
        <html><head><title>T</title><style>p { color: red }</style></head>
        <body>
            <h1>Heading</h1>
            <script>var hidden = 1;</script>
            <p>First   paragraph
               continues.</p>
            <p>Second <b>bold</b> text</p>
        </body></html>
        "#;
        assert_eq!(
            visible_text(html),
            "Heading\nFirst paragraph continues.\nSecond bold text"
        );
    }

    #[test]
    fn unknown_action_gets_no_response() {
        let request = ContentRequest {
            action: "somethingElse".to_string(),
        };
        assert_eq!(respond_to_request(&request, "<p>hi</p>"), None);
    }

    #[test]
    fn get_page_content_returns_text() {
        let response =
            respond_to_request(&ContentRequest::get_page_content(), "<body>Hello world</body>");
        assert_eq!(
            response,
            Some(ContentResponse {
                content: "Hello world".to_string()
            })
        );
    }

    #[test]
    fn request_wire_format_matches_contract() {
        let json = serde_json::to_string(&ContentRequest::get_page_content()).unwrap();
        assert_eq!(json, r#"{"action":"getPageContent"}"#);
    }
}
