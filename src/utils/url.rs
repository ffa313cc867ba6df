// src/utils/url.rs

//! Endpoint URL construction.

use url::Url;

use crate::error::Result;

/// Parse a base URL, making sure it ends with a slash so that relative
/// joins append instead of replacing the last path segment.
///
/// # Examples
/// ```
/// use catalog::utils::url::base;
///
/// assert_eq!(
///     base("https://example.com/api/v1").unwrap().as_str(),
///     "https://example.com/api/v1/"
/// );
/// ```
pub fn base(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

/// URL of the per-identifier detail endpoint.
pub fn detail(base: &Url, id: u32) -> Result<Url> {
    Ok(base.join(&format!("digimon/{id}"))?)
}

/// URL of the listing endpoint filtered by name.
pub fn listing(base: &Url, name: &str, page_size: u32) -> Result<Url> {
    let mut url = base.join("digimon")?;
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("pageSize", &page_size.to_string());
    Ok(url)
}
