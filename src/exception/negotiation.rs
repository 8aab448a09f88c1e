use axum::http::{HeaderMap, header};

/// Whether the client wants a JSON error body.
///
/// True for AJAX requests (not PJAX) that accept any content type, or when the
/// preferred `Accept` media type is JSON (`/json` or `+json`).
pub fn expects_json(headers: &HeaderMap) -> bool {
    let acceptable = acceptable_content_types(headers);
    (is_ajax(headers) && !is_pjax(headers) && accepts_any_content_type(&acceptable))
        || wants_json(&acceptable)
}

/// `Accept` media types, lower-cased, best quality first.
///
/// Entries of equal quality keep header order.
pub fn acceptable_content_types(headers: &HeaderMap) -> Vec<String> {
    let mut types: Vec<(String, f32)> = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(parse_media_range)
        .collect();
    types.sort_by(|a, b| b.1.total_cmp(&a.1));
    types.into_iter().map(|(media_type, _)| media_type).collect()
}

fn parse_media_range(item: &str) -> Option<(String, f32)> {
    let mut parts = item.split(';');
    let media_type = parts.next()?.trim().to_ascii_lowercase();
    if media_type.is_empty() {
        return None;
    }
    let quality = parts
        .filter_map(|param| param.trim().strip_prefix("q="))
        .find_map(|q| q.trim().parse::<f32>().ok())
        .unwrap_or(1.0);
    Some((media_type, quality))
}

fn wants_json(acceptable: &[String]) -> bool {
    acceptable
        .first()
        .is_some_and(|preferred| preferred.contains("/json") || preferred.contains("+json"))
}

fn accepts_any_content_type(acceptable: &[String]) -> bool {
    match acceptable.first() {
        None => true,
        Some(preferred) => preferred == "*/*" || preferred == "*",
    }
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .is_some_and(|value| value == "XMLHttpRequest")
}

fn is_pjax(headers: &HeaderMap) -> bool {
    headers
        .get("x-pjax")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| !matches!(value.trim(), "" | "0" | "false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[rstest]
    #[case(&[("accept", "application/json")], true)]
    #[case(&[("accept", "application/problem+json")], true)]
    #[case(&[("accept", "text/html,application/xhtml+xml")], false)]
    #[case(&[("accept", "text/html;q=0.5, application/json")], true)]
    #[case(&[("accept", "application/json;q=0.1, text/html")], false)]
    #[case(&[], false)]
    #[case(&[("x-requested-with", "XMLHttpRequest")], true)]
    #[case(&[("x-requested-with", "XMLHttpRequest"), ("accept", "*/*")], true)]
    #[case(&[("x-requested-with", "XMLHttpRequest"), ("accept", "text/html")], false)]
    #[case(&[("x-requested-with", "XMLHttpRequest"), ("x-pjax", "true")], false)]
    fn negotiates_json(#[case] pairs: &[(&'static str, &'static str)], #[case] expected: bool) {
        assert_eq!(expects_json(&headers(pairs)), expected);
    }

    #[test]
    fn orders_by_quality_then_position() {
        let headers = headers(&[
            ("accept", "text/plain;q=0.5, TEXT/HTML"),
            ("accept", "application/json;q=0.5"),
        ]);
        assert_eq!(
            acceptable_content_types(&headers),
            vec!["text/html", "text/plain", "application/json"]
        );
    }
}
