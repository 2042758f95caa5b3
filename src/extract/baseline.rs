use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::crawler::record::{or_null, JobRecord, NULL_VALUE};
use crate::extract::content::PageContent;

const TITLE_SEPARATOR: &str = " | ";
const LIST_ITEM_SEPARATOR: &str = " • ";

static JOB_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"jobs?/(\d+)").expect("job id pattern is valid"));

/// Model-free best-effort record derived from page content alone.
///
/// Location, salary and both qualification fields are left `"NULL"`; only
/// the model fills those in.
pub fn baseline_record(content: &PageContent, url: &str) -> JobRecord {
    JobRecord {
        job_title: job_title(content),
        job_description: job_description(content),
        job_id: job_id_from_url(url).unwrap_or_else(|| NULL_VALUE.to_string()),
        ..JobRecord::unknown()
    }
}

/// First `job/<digits>` or `jobs/<digits>` in the URL path
pub fn job_id_from_url(url: &str) -> Option<String> {
    let haystack = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    };

    JOB_ID_PATTERN
        .captures(&haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn job_title(content: &PageContent) -> String {
    if let Some(title) = content.title() {
        let first = title.split(TITLE_SEPARATOR).next().unwrap_or(title).trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    content
        .headings(1)
        .first()
        .map(|h| or_null(h.as_str()))
        .unwrap_or_else(|| NULL_VALUE.to_string())
}

fn job_description(content: &PageContent) -> String {
    if !content.all_text.is_empty() {
        return content.all_text.clone();
    }

    let mut parts: Vec<String> = content.paragraphs.clone();
    for items in content.lists.unordered.iter().chain(&content.lists.ordered) {
        parts.push(items.join(LIST_ITEM_SEPARATOR));
    }

    or_null(parts.join("\n\n"))
}
