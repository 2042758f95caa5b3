use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Structured text content of one fetched page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page title and meta tags (`name` or `property` -> `content`)
    pub metadata: BTreeMap<String, String>,

    /// Heading texts keyed `h1`..`h6`; levels without headings are absent
    pub headers: BTreeMap<String, Vec<String>>,

    /// Non-empty paragraph texts in document order
    pub paragraphs: Vec<String>,

    pub lists: PageLists,

    /// Outbound links with absolute URLs
    pub links: Vec<PageLink>,

    /// Every visible text node, whitespace-collapsed and joined by single spaces
    pub all_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLists {
    pub unordered: Vec<Vec<String>>,
    pub ordered: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub text: String,
    pub url: String,
}

impl PageContent {
    /// Page title, if the page had a non-empty one
    pub fn title(&self) -> Option<&str> {
        self.metadata
            .get("title")
            .map(|t| t.as_str())
            .filter(|t| !t.is_empty())
    }

    /// Headings at `level` (1 through 6)
    pub fn headings(&self, level: u8) -> &[String] {
        self.headers
            .get(&format!("h{}", level))
            .map(|h| h.as_slice())
            .unwrap_or(&[])
    }
}

/// Parse raw markup into a `PageContent`.
///
/// Never fails: html5ever recovers from malformed input, and empty input
/// yields an empty `PageContent`. `source_url` is only used to resolve
/// relative links.
pub fn extract_page_content(markup: &str, source_url: &str) -> PageContent {
    if markup.trim().is_empty() {
        return PageContent::default();
    }

    let mut document = Html::parse_document(markup);
    if !document.errors.is_empty() {
        debug!(
            "Recovered from {} markup errors while parsing {}",
            document.errors.len(),
            source_url
        );
    }

    strip_invisible(&mut document);

    PageContent {
        metadata: extract_metadata(&document),
        headers: extract_headers(&document),
        paragraphs: extract_paragraphs(&document),
        lists: PageLists {
            unordered: extract_lists(&document, "ul"),
            ordered: extract_lists(&document, "ol"),
        },
        links: extract_links(&document, source_url),
        all_text: clean_text(&document.root_element().text().collect::<Vec<_>>().join(" ")),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Detach script, style and noscript elements so their bodies never reach any text field
fn strip_invisible(document: &mut Html) {
    let Some(sel) = selector("script, style, noscript") else {
        return;
    };

    let ids: Vec<_> = document.select(&sel).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

fn extract_metadata(document: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    let title = selector("title")
        .and_then(|sel| document.select(&sel).next().map(element_text))
        .unwrap_or_default();
    metadata.insert("title".to_string(), title);

    if let Some(sel) = selector("meta") {
        for tag in document.select(&sel) {
            let attrs = tag.value();
            let Some(content) = attrs.attr("content").filter(|c| !c.is_empty()) else {
                continue;
            };

            let key = attrs
                .attr("name")
                .filter(|n| !n.is_empty())
                .or_else(|| attrs.attr("property").filter(|p| !p.is_empty()));

            // Later tags with the same key win
            if let Some(key) = key {
                metadata.insert(key.to_string(), content.to_string());
            }
        }
    }

    metadata
}

fn extract_headers(document: &Html) -> BTreeMap<String, Vec<String>> {
    let mut headers = BTreeMap::new();

    for level in 1..=6 {
        let tag = format!("h{}", level);
        let Some(sel) = selector(&tag) else {
            continue;
        };

        let texts: Vec<String> = document.select(&sel).map(element_text).collect();
        if !texts.is_empty() {
            headers.insert(tag, texts);
        }
    }

    headers
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    let Some(sel) = selector("p") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

/// One entry per `tag` element that has direct `<li>` children
fn extract_lists(document: &Html, tag: &str) -> Vec<Vec<String>> {
    let Some(sel) = selector(tag) else {
        return Vec::new();
    };

    document
        .select(&sel)
        .map(|list| {
            list.children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "li")
                .map(element_text)
                .collect::<Vec<_>>()
        })
        .filter(|items| !items.is_empty())
        .collect()
}

fn extract_links(document: &Html, source_url: &str) -> Vec<PageLink> {
    let Some(sel) = selector("a[href]") else {
        return Vec::new();
    };

    let origin = origin_of(source_url);

    document
        .select(&sel)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
                return None;
            }

            Some(PageLink {
                text: element_text(anchor),
                url: resolve_href(origin.as_ref(), href),
            })
        })
        .collect()
}

/// `scheme://host[:port]` of the page, used as the base for relative links
fn origin_of(source_url: &str) -> Option<Url> {
    let parsed = Url::parse(source_url).ok()?;
    let host = parsed.host_str()?;
    let origin = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    };
    Url::parse(&origin).ok()
}

/// Hrefs that already name a host are kept verbatim; anything else is joined onto the origin
fn resolve_href(origin: Option<&Url>, href: &str) -> String {
    if href.starts_with("//") {
        return href.to_string();
    }

    if let Ok(absolute) = Url::parse(href) {
        if absolute.has_host() {
            return href.to_string();
        }
    }

    origin
        .and_then(|base| base.join(href).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| href.to_string())
}

fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
