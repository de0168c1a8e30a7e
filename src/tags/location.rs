use crate::{Error, Result};

/// Extract the server-assigned id from a `Content-Location` header value.
///
/// The creation response carries no body; the new resource's id is the last
/// non-empty path segment of the header. A trailing slash or `?query` suffix
/// does not change the result.
pub fn parse_id_from_location(url: &str) -> Result<i64> {
    let path = match url.find('?') {
        Some(pos) if pos > 0 => &url[..pos],
        _ => url,
    };
    let mut parts: Vec<&str> = path.split('/').collect();
    let mut result = "";
    while let Some(part) = parts.pop() {
        result = part;
        if !result.is_empty() {
            break;
        }
    }
    result
        .parse::<i64>()
        .map_err(|_| Error::InvalidData(format!("no numeric id in location: {url}")))
}
