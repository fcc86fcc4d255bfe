use csrf_cookie::get_cookie;
use csrf_cookie::source::CookieSource;
use csrf_cookie::CsrfToken;

#[test]
fn headers_without_the_name_yield_none() {
    for header in ["", "a=1", "a=1; b=2", "namex=1", "xname=1", "name", "name ; =name"] {
        assert_eq!(get_cookie(Some(header), "name"), None, "header {:?}", header);
    }
}

#[test]
fn value_between_other_cookies() {
    assert_eq!(
        get_cookie(Some("a=1; name=value2; c=3"), "name"),
        Some("value2".to_string())
    );
}

#[test]
fn no_prefix_collision_with_longer_names() {
    assert_eq!(
        get_cookie(Some("othername=v2; name=v1"), "name"),
        Some("v1".to_string())
    );
    assert_eq!(
        get_cookie(Some("name=v1; othername=v2"), "name"),
        Some("v1".to_string())
    );
}

#[test]
fn percent_encoded_value_is_decoded() {
    assert_eq!(get_cookie(Some("name=a%20b"), "name"), Some("a b".to_string()));
}

#[test]
fn duplicate_names_return_first() {
    assert_eq!(
        get_cookie(Some("name=first; name=second"), "name"),
        Some("first".to_string())
    );
}

#[test]
fn absent_header_is_not_a_fault() {
    assert_eq!(get_cookie(None, "name"), None);
    assert_eq!(get_cookie(Some(""), "name"), None);
}

#[test]
fn repeated_lookups_agree() {
    let header = Some("sessionid=s; csrftoken=t%3Dt");
    assert_eq!(get_cookie(header, "csrftoken"), get_cookie(header, "csrftoken"));
}

#[test]
fn token_loaded_from_literal_header() {
    let source = CookieSource::Header("sessionid=s; csrftoken=tok".to_string());
    let token = CsrfToken::load(&source, "csrftoken");
    assert_eq!(token.value(), Some("tok"));
    assert_eq!(
        token.header("X-CSRFToken"),
        Some(("X-CSRFToken".to_string(), "tok".to_string()))
    );
}

#[test]
fn token_is_not_refreshed_after_preparation() {
    let mut header = String::from("csrftoken=old");
    let token = CsrfToken::prepare(Some(&header), "csrftoken");
    header.replace_range(.., "csrftoken=new");
    assert_eq!(token.value(), Some("old"));
    assert_eq!(get_cookie(Some(&header), "csrftoken"), Some("new".to_string()));
}
