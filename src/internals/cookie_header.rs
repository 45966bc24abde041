use ::cookie::Cookie;
use ::http::HeaderValue;

/// Returns owned copies of the cookies which can be sent in a `cookie` header.
///
/// Cookies whose `name=value` is not a valid header value are skipped, with a warning.
pub fn sendable_cookies<'a>(
    cookies: &'a [Cookie<'_>],
) -> impl Iterator<Item = Cookie<'static>> + 'a {
    cookies.iter().filter_map(|cookie| {
        let raw = cookie.stripped().to_string();
        if let Err(err) = HeaderValue::from_str(&raw) {
            ::tracing::warn!(
                ?err,
                cookie = %raw.escape_debug(),
                "Cookie cannot be sent as a header, skipping"
            );
            return None;
        }

        Some(cookie.clone().into_owned())
    })
}

/// Joins the `name=value` of each cookie with `; `.
pub fn build_cookie_header(cookies: &[Cookie<'static>]) -> Option<HeaderValue> {
    if cookies.is_empty() {
        return None;
    }

    let raw = cookies
        .iter()
        .map(|cookie| cookie.stripped().to_string())
        .collect::<Vec<_>>()
        .join("; ");

    match HeaderValue::from_str(&raw) {
        Ok(header_value) => Some(header_value),
        Err(err) => {
            ::tracing::warn!(?err, "Cookies cannot be sent as a header, skipping");
            None
        }
    }
}


#[cfg(test)]
mod test_build_cookie_header {
    use super::*;

    #[test]
    fn it_should_be_none_without_cookies() {
        assert_eq!(build_cookie_header(&[]), None);
    }

    #[test]
    fn it_should_join_name_and_values() {
        let cookies = vec![
            Cookie::new("session", "12345"),
            Cookie::new("aaaa", "value"),
        ];

        let header_value = build_cookie_header(&cookies).unwrap();

        assert_eq!(header_value, "session=12345; aaaa=value");
    }

    #[test]
    fn it_should_drop_cookie_attributes() {
        let cookie = Cookie::build(("session", "12345"))
            .path("/")
            .secure(true)
            .http_only(true)
            .build();

        let header_value = build_cookie_header(&[cookie]).unwrap();

        assert_eq!(header_value, "session=12345");
    }
}
