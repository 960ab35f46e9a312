use crate::error::{Result, TermbrainError};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Web search against DuckDuckGo's HTML-lite frontend. No API key; the
/// result markup is stable enough to segment on its CSS classes.
pub struct WebSearch {
    client: reqwest::Client,
    max_results: usize,
}

impl WebSearch {
    pub fn new(max_results: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("termbrain/0.1")
            .build()?;
        Ok(Self {
            client,
            max_results,
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = format!(
            "https://html.duckduckgo.com/html/?q={}",
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TermbrainError::Search(format!("search request failed: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| TermbrainError::Search(format!("failed to read response: {e}")))?;

        Ok(parse_results(&html, self.max_results))
    }
}

/// Format results the way the context assembler folds them in: one
/// `url: snippet` line per hit.
pub fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {}", r.url, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let mut results = Vec::new();

    // DuckDuckGo HTML lite uses class="result__a" for links and
    // class="result__snippet" for snippets.
    for segment in html.split("class=\"result__a\"").skip(1) {
        if results.len() >= max_results {
            break;
        }

        let url = extract_between(segment, "href=\"", "\"").unwrap_or_default();
        let title = extract_between(segment, ">", "</a>").unwrap_or_default();
        let snippet = if let Some(snip_start) = segment.find("class=\"result__snippet\"") {
            // Snippets carry inline markup like <b>; capture the whole
            // element body and strip tags afterwards.
            let snip_segment = &segment[snip_start..];
            extract_between(snip_segment, ">", "</a>")
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            String::new()
        };

        // Skip internal DDG links
        if url.is_empty() || url.starts_with('/') {
            continue;
        }

        // DDG wraps result URLs in a redirect
        let clean_url = if url.contains("uddg=") {
            urlencoding::decode(
                url.split("uddg=")
                    .nth(1)
                    .unwrap_or(&url)
                    .split('&')
                    .next()
                    .unwrap_or(&url),
            )
            .unwrap_or_else(|_| url.clone().into())
            .to_string()
        } else {
            url.clone()
        };

        results.push(SearchResult {
            title: strip_html_tags(&title),
            url: clean_url,
            snippet: strip_html_tags(&snippet),
        });
    }

    results
}

fn extract_between(text: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = text.find(start)? + start.len();
    let remaining = &text[start_idx..];
    let end_idx = remaining.find(end)?;
    Some(remaining[..end_idx].to_string())
}

fn strip_html_tags(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
        <a class="result__a" href="https://duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fdocs&rut=abc">Example <b>Docs</b></a>
        <a class="result__snippet" href="#">A <b>sample</b> snippet.</a>
        <a class="result__a" href="/internal">Internal</a>
        <a class="result__a" href="https://plain.example.org">Plain</a>
        <a class="result__snippet" href="#">Second snippet</a>
    "##;

    #[test]
    fn parses_and_unwraps_redirect_urls() {
        let results = parse_results(SAMPLE, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://example.com/docs");
        assert_eq!(results[0].title, "Example Docs");
        assert_eq!(results[0].snippet, "A sample snippet.");
        assert_eq!(results[1].url, "https://plain.example.org");
    }

    #[test]
    fn respects_result_bound() {
        let results = parse_results(SAMPLE, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn format_results_is_url_colon_snippet() {
        let results = vec![SearchResult {
            title: "T".into(),
            url: "https://a.example".into(),
            snippet: "s".into(),
        }];
        assert_eq!(format_results(&results), "https://a.example: s");
    }

    #[test]
    fn strip_html_tags_removes_markup() {
        assert_eq!(strip_html_tags("a <b>bold</b> move"), "a bold move");
    }
}
