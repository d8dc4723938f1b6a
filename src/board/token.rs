use crate::PostingsError;
use percent_encoding::percent_decode_str;
use url::Url;

/// How a board token is normalized after extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugRule {
    /// Use the decoded path segment as-is
    Verbatim,
    /// Lowercase the decoded segment and replace spaces with hyphens
    Slugified,
}

/// Extracts the board token from a public board URL
///
/// The token is the first segment of the URL path once leading and trailing
/// separators are stripped. Percent-encoded segments are decoded, and
/// [`SlugRule::Slugified`] additionally lowercases the token and turns spaces
/// into hyphens.
///
/// # Arguments
///
/// * `board_url` - The public board URL
/// * `rule` - The provider's token normalization rule
///
/// # Returns
///
/// * `Ok(String)` - The board token
/// * `Err(PostingsError::InvalidBoardUrl)` - The URL does not parse or has no path segment
///
/// # Examples
///
/// ```
/// use ats_postings::board::{extract_board_token, SlugRule};
///
/// let token = extract_board_token("https://boards.greenhouse.io/sourcegraph91/", SlugRule::Verbatim).unwrap();
/// assert_eq!(token, "sourcegraph91");
///
/// let token = extract_board_token("https://jobs.ashbyhq.com/Hippocratic%20AI", SlugRule::Slugified).unwrap();
/// assert_eq!(token, "hippocratic-ai");
/// ```
pub fn extract_board_token(board_url: &str, rule: SlugRule) -> Result<String, PostingsError> {
    let url = Url::parse(board_url.trim())
        .map_err(|e| PostingsError::InvalidBoardUrl(format!("{}: {}", board_url, e)))?;

    token_from_url(&url, rule)
}

/// Extracts the board token from an already parsed board URL
pub fn token_from_url(url: &Url, rule: SlugRule) -> Result<String, PostingsError> {
    let segment = url.path().trim_matches('/').split('/').next().unwrap_or("");
    let decoded = percent_decode_str(segment).decode_utf8_lossy();

    let token = match rule {
        SlugRule::Verbatim => decoded.into_owned(),
        SlugRule::Slugified => decoded.to_lowercase().replace(' ', "-"),
    };

    if token.trim().is_empty() {
        return Err(PostingsError::InvalidBoardUrl(format!(
            "could not parse a board token from {}",
            url
        )));
    }

    Ok(token)
}
