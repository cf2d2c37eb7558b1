//! Pulls the readable parts out of a fetched HTML page.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref TITLE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref META: Regex = Regex::new(r"(?is)<meta\s[^>]*>").unwrap();
    static ref ATTR: Regex =
        Regex::new(r#"(?is)([a-z:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
    static ref HIDDEN_BLOCKS: Regex =
        Regex::new(r"(?is)<(script|style|noscript|template)\b[^>]*>.*?</(script|style|noscript|template)>|<!--.*?-->").unwrap();
    static ref TAG: Regex = Regex::new(r"(?s)<[^>]*>").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: String,
    pub word_count: usize,
}

pub fn extract_content(html: &str, max_chars: usize) -> PageContent {
    let title = meta_content(html, "og:title").or_else(|| {
        TITLE
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| clean_text(m.as_str()))
            .filter(|t| !t.is_empty())
    });

    let description =
        meta_content(html, "og:description").or_else(|| meta_content(html, "description"));

    let text = clean_text(&HIDDEN_BLOCKS.replace_all(html, " "));
    let word_count = text.split_whitespace().count();

    PageContent {
        title,
        description,
        content: truncate_chars(&text, max_chars),
        word_count,
    }
}

// <meta name|property="key" content="...">, any attribute order
fn meta_content(html: &str, key: &str) -> Option<String> {
    META.find_iter(html).find_map(|tag| {
        let mut matches_key = false;
        let mut content = None;
        for cap in ATTR.captures_iter(tag.as_str()) {
            let name = cap[1].to_lowercase();
            let value = cap.get(2).or_else(|| cap.get(3)).map_or("", |m| m.as_str());
            match name.as_str() {
                "name" | "property" if value.eq_ignore_ascii_case(key) => matches_key = true,
                "content" => content = Some(value),
                _ => {}
            }
        }
        if !matches_key {
            return None;
        }
        content.map(clean_text).filter(|c| !c.is_empty())
    })
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG.replace_all(fragment, " ");
    let decoded = decode_entities(&stripped);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
