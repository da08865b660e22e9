//! Page URL state: the `q` parameter holding the comma-joined link list.
//!
//! The joined list is the query key used by the cache. It is treated as an
//! opaque string everywhere except here.

use url::Url;

use crate::error::CalendarError;

/// Name of the page URL parameter carrying the query key.
pub const QUERY_PARAM: &str = "q";

/// Parse a page URL.
pub fn parse_page_url(page_url: &str) -> Result<Url, CalendarError> {
    Url::parse(page_url.trim())
        .map_err(|e| CalendarError::InvalidLink(format!("{}: {}", page_url, e)))
}

/// The query key from `q`, or `None` when it is absent or empty.
pub fn query_key(page_url: &Url) -> Option<String> {
    page_url
        .query_pairs()
        .find(|(k, _)| k == QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// True when `q` is absent or empty; the drop zone is disabled in that state.
pub fn is_query_missing(page_url: &Url) -> bool {
    query_key(page_url).is_none()
}

/// Split a query key into its individual links.
pub fn split_links(key: &str) -> Vec<&str> {
    key.split(',').filter(|s| !s.is_empty()).collect()
}

/// Return `page_url` with `link` appended to the `q` list.
///
/// When `q` is absent or empty it is set to `link`. Other parameters are
/// kept in order. A blank link leaves the URL unchanged.
pub fn append_link(page_url: &Url, link: &str) -> Url {
    let link = link.trim();
    if link.is_empty() {
        return page_url.clone();
    }

    let key = match query_key(page_url) {
        Some(existing) => format!("{},{}", existing, link),
        None => link.to_string(),
    };

    let others: Vec<(String, String)> = page_url
        .query_pairs()
        .filter(|(k, _)| k != QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut updated = page_url.clone();
    {
        let mut pairs = updated.query_pairs_mut();
        pairs.clear();
        pairs.append_pair(QUERY_PARAM, &key);
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
    }
    updated
}
