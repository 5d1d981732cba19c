use staticd::http::request::{Method, Request};

fn request(method: &str) -> Request {
    Request {
        method: method.to_string(),
        path: "/".to_string(),
        version: "HTTP/1.1".to_string(),
    }
}

#[test]
fn test_supported_methods() {
    assert_eq!(request("GET").supported_method(), Some(Method::GET));
    assert_eq!(request("HEAD").supported_method(), Some(Method::HEAD));
}

#[test]
fn test_methods_are_case_sensitive() {
    assert_eq!(request("get").supported_method(), None);
    assert_eq!(request("Head").supported_method(), None);
}

#[test]
fn test_other_methods_are_unsupported() {
    for method in ["POST", "PUT", "DELETE", "OPTIONS", "PATCH", "BREW"] {
        assert_eq!(request(method).supported_method(), None, "{}", method);
    }
}

#[test]
fn test_is_head() {
    assert!(request("HEAD").is_head());
    assert!(!request("GET").is_head());
    assert!(!request("DELETE").is_head());
}

#[test]
fn test_method_as_str() {
    assert_eq!(Method::GET.as_str(), "GET");
    assert_eq!(Method::HEAD.as_str(), "HEAD");
}
