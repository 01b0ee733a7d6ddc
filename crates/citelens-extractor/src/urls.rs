//! Source URL assignment
//!
//! Known source URLs are distributed over one entity's citations
//! round-robin, in citation order. A proximity- or markdown-link-based
//! assignment would be more precise; downstream consumers rely on the
//! current distribution, so it stays as is.

use citelens_core::{Citation, RawUrlRecord};

use crate::domain::resolve_domain;

/// Assign `cited_url`/`cited_domain` to citations round-robin
pub fn assign_urls(citations: &mut [Citation], urls: &[String]) {
    if urls.is_empty() {
        return;
    }

    for (ordinal, citation) in citations.iter_mut().enumerate() {
        let url = &urls[ordinal % urls.len()];
        citation.cited_domain = Some(resolve_domain(url));
        citation.cited_url = Some(url.clone());
    }
}

/// One record per supplied URL, independent of any text match
pub fn url_records(urls: &[String]) -> Vec<RawUrlRecord> {
    urls.iter()
        .map(|url| RawUrlRecord::new(url.clone(), resolve_domain(url)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use citelens_core::Sentence;

    fn citations(n: usize) -> Vec<Citation> {
        let sentences: Vec<Sentence> = (0..n)
            .map(|index| Sentence {
                text: format!("Sentence {index}"),
                index,
            })
            .collect();
        (0..n)
            .filter_map(|i| Citation::direct_mention(&sentences, i))
            .collect()
    }

    #[test]
    fn test_round_robin() {
        let urls = vec!["https://a.com/x".to_string(), "https://www.b.com".to_string()];
        let mut cites = citations(5);
        assign_urls(&mut cites, &urls);

        let assigned: Vec<&str> = cites
            .iter()
            .map(|c| c.cited_url.as_deref().unwrap())
            .collect();
        assert_eq!(
            assigned,
            vec![
                "https://a.com/x",
                "https://www.b.com",
                "https://a.com/x",
                "https://www.b.com",
                "https://a.com/x"
            ]
        );
        assert_eq!(cites[1].cited_domain.as_deref(), Some("b.com"));
    }

    #[test]
    fn test_no_urls_leaves_fields_empty() {
        let mut cites = citations(2);
        assign_urls(&mut cites, &[]);
        assert!(cites
            .iter()
            .all(|c| c.cited_url.is_none() && c.cited_domain.is_none()));
    }

    #[test]
    fn test_url_records() {
        let records = url_records(&["http://a.com".to_string(), "b.org/page".to_string()]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].cited_domain, "a.com");
        assert_eq!(records[1].cited_domain, "b.org");
        assert!(records.iter().all(|r| r.sentiment.is_none()));
    }
}
