/// Value of `name` in a URL query string (with or without the leading `?`).
/// `+` decodes to a space; invalid percent escapes are kept as written.
pub fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(key, _)| decode(key) == name)
        .map(|(_, value)| decode(value))
        .filter(|value| !value.is_empty())
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

#[cfg(test)]
mod tests {
    use super::query_param;

    #[test]
    fn reads_the_chart_parameter() {
        assert_eq!(query_param("?chart=top_monthly", "chart").as_deref(), Some("top_monthly"));
        assert_eq!(query_param("a=1&chart=mx", "chart").as_deref(), Some("mx"));
    }

    #[test]
    fn decodes_escapes_and_plus() {
        assert_eq!(query_param("?chart=hot%20100", "chart").as_deref(), Some("hot 100"));
        assert_eq!(query_param("?chart=a+b", "chart").as_deref(), Some("a b"));
    }

    #[test]
    fn missing_or_empty_values_are_none() {
        assert_eq!(query_param("", "chart"), None);
        assert_eq!(query_param("?chart=", "chart"), None);
        assert_eq!(query_param("?chart", "chart"), None);
        assert_eq!(query_param("?other=1", "chart"), None);
    }
}
