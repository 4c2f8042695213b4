use std::fmt;

use rhttp_core::kv::OrderedKeyValueSet;

/// Media type sent with a non-empty form body.
pub const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP methods the method field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Head,
    Delete,
    Options,
    Propfind,
    Search,
    Trace,
    Connect,
}

impl HttpMethod {
    /// Allow-list, in suggestion order.
    pub const ALL: [HttpMethod; 11] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Propfind,
        HttpMethod::Search,
        HttpMethod::Trace,
        HttpMethod::Connect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Propfind => "PROPFIND",
            HttpMethod::Search => "SEARCH",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }

    /// Exact (case-insensitive) method name.
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Match typed input against the allow-list: the first method whose name
    /// starts with the input, ignoring case. Empty input matches nothing.
    pub fn match_input(input: &str) -> Option<Self> {
        let typed = input.trim();
        if typed.is_empty() {
            return None;
        }
        let typed = typed.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().starts_with(&typed))
    }

    pub fn suggestions() -> Vec<String> {
        Self::ALL.iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "http" => Some(Scheme::Http),
            "https" => Some(Scheme::Https),
            _ => None,
        }
    }

    pub fn from_secure(secure: bool) -> Self {
        if secure { Scheme::Https } else { Scheme::Http }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    #[default]
    Http11,
    Http2,
}

impl ProtocolVersion {
    pub const ALL: [ProtocolVersion; 2] = [ProtocolVersion::Http11, ProtocolVersion::Http2];

    pub fn label(&self) -> &'static str {
        match self {
            ProtocolVersion::Http11 => "HTTP/1.1",
            ProtocolVersion::Http2 => "HTTP/2",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == s)
    }

    pub fn major(&self) -> u8 {
        match self {
            ProtocolVersion::Http11 => 1,
            ProtocolVersion::Http2 => 2,
        }
    }

    pub fn minor(&self) -> u8 {
        match self {
            ProtocolVersion::Http11 => 1,
            ProtocolVersion::Http2 => 0,
        }
    }
}

/// The request being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestModel {
    pub method: HttpMethod,
    pub scheme: Scheme,
    pub host: String,
    pub path: String,
    pub raw_query: String,
    pub headers: OrderedKeyValueSet,
    pub cookies: OrderedKeyValueSet,
    pub form: OrderedKeyValueSet,
    pub protocol: ProtocolVersion,
}

impl Default for RequestModel {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            scheme: Scheme::Http,
            host: "localhost".to_string(),
            path: "/".to_string(),
            raw_query: String::new(),
            headers: OrderedKeyValueSet::new(),
            cookies: OrderedKeyValueSet::new(),
            form: OrderedKeyValueSet::new(),
            protocol: ProtocolVersion::Http11,
        }
    }
}

impl RequestModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme.as_str(), self.host);
        if !self.path.is_empty() && !self.path.starts_with('/') {
            url.push('/');
        }
        url.push_str(&self.path);
        if !self.raw_query.is_empty() {
            url.push('?');
            url.push_str(&self.raw_query);
        }
        url
    }

    pub fn params(&self) -> OrderedKeyValueSet {
        OrderedKeyValueSet::parse_encoded(&self.raw_query)
    }

    pub fn set_param(&mut self, name: &str, value: &str) {
        let mut params = self.params();
        params.set(name, value);
        self.raw_query = params.encode();
    }

    pub fn delete_param(&mut self, name: &str) -> bool {
        let mut params = self.params();
        let removed = params.delete(name);
        if removed {
            self.raw_query = params.encode();
        }
        removed
    }

    /// Add a form field; the request switches to an URL-encoded body.
    pub fn set_form_field(&mut self, name: &str, value: &str) {
        self.form.set(name, value);
        self.headers.replace("Content-Type", FORM_MEDIA_TYPE);
    }

    /// URL-encoded form body, if any form field is set.
    pub fn body(&self) -> Option<String> {
        (!self.form.is_empty()).then(|| self.form.encode())
    }

    /// Value of the `Cookie` header built from the cookie set.
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| format!("{name}={v}")))
            .collect();
        Some(pairs.join("; "))
    }

    /// Every header line sent on the wire, in order.
    pub fn outgoing_headers(&self) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = self
            .headers
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name.to_string(), v.clone())))
            .collect();
        if let Some(cookie) = self.cookie_header() {
            headers.push(("Cookie".to_string(), cookie));
        }
        if !self.form.is_empty() && !self.headers.contains("Content-Type") {
            headers.push(("Content-Type".to_string(), FORM_MEDIA_TYPE.to_string()));
        }
        headers
    }
}

/// A completed response, with the body already split into display lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseSnapshot {
    /// Status line without the protocol, e.g. `"200 OK"`.
    pub status: String,
    /// e.g. `"HTTP/1.1"` or `"HTTP/2.0"`.
    pub proto: String,
    pub headers: OrderedKeyValueSet,
    pub body_lines: Vec<String>,
}

impl ResponseSnapshot {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.proto.is_empty()
            && self.headers.is_empty()
            && self.body_lines.is_empty()
    }

    pub fn status_code(&self) -> u16 {
        self.status
            .split_whitespace()
            .next()
            .and_then(|code| code.parse().ok())
            .unwrap_or(0)
    }

    pub fn protocol_major(&self) -> u8 {
        self.proto
            .strip_prefix("HTTP/")
            .and_then(|v| v.split('.').next())
            .and_then(|major| major.parse().ok())
            .unwrap_or(0)
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Session counters shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counters {
    pub request_count: u64,
    pub latency: String,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            request_count: 0,
            latency: "0s".to_string(),
        }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Canonical header name: trimmed, spaces become hyphens and each
/// hyphen-separated segment is title-cased (`"x auth token"` ->
/// `"X-Auth-Token"`). Names with non-token characters are left as typed.
pub fn canonical_header_name(name: &str) -> String {
    let name = name.trim().replace(' ', "-");
    if !name.chars().all(is_token_char) {
        return name;
    }
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = RequestModel::new();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url(), "http://localhost/");
        assert_eq!(req.protocol, ProtocolVersion::Http11);
        assert_eq!(req.body(), None);
    }

    #[test]
    fn test_match_method_input() {
        assert_eq!(HttpMethod::match_input("post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::match_input("PoSt"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::match_input("p"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::match_input("pu"), Some(HttpMethod::Put));
        assert_eq!(HttpMethod::match_input("pr"), Some(HttpMethod::Propfind));
        assert_eq!(HttpMethod::match_input("banana"), None);
        assert_eq!(HttpMethod::match_input("ost"), None);
        assert_eq!(HttpMethod::match_input(""), None);
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("x auth token"), "X-Auth-Token");
        assert_eq!(canonical_header_name("  content-TYPE "), "Content-Type");
        assert_eq!(canonical_header_name("accept"), "Accept");
        assert_eq!(canonical_header_name("bad:name"), "bad:name");
        assert_eq!(canonical_header_name(""), "");
    }

    #[test]
    fn test_url_and_params() {
        let mut req = RequestModel::new();
        req.scheme = Scheme::Https;
        req.host = "example.com".to_string();
        req.path = "api/items".to_string();
        req.set_param("limit", "10");
        req.set_param("q", "a b");
        assert_eq!(req.url(), "https://example.com/api/items?limit=10&q=a+b");

        assert!(req.delete_param("limit"));
        assert!(!req.delete_param("limit"));
        assert_eq!(req.raw_query, "q=a+b");
    }

    #[test]
    fn test_form_and_cookies_shape_outgoing_headers() {
        let mut req = RequestModel::new();
        req.headers.set("Content-Type", "text/plain");
        req.headers.set("Accept", "*/*");
        req.set_form_field("login", "user");
        req.cookies.set("XDEBUG_SESSION", "debugger");
        req.cookies.set("theme", "dark");

        assert_eq!(req.body().as_deref(), Some("login=user"));
        assert_eq!(
            req.outgoing_headers(),
            vec![
                ("Content-Type".to_string(), FORM_MEDIA_TYPE.to_string()),
                ("Accept".to_string(), "*/*".to_string()),
                (
                    "Cookie".to_string(),
                    "XDEBUG_SESSION=debugger; theme=dark".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_response_accessors() {
        let mut res = ResponseSnapshot {
            status: "404 Not Found".to_string(),
            proto: "HTTP/2.0".to_string(),
            ..ResponseSnapshot::default()
        };
        res.headers.set("content-type", "application/json");
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.protocol_major(), 2);
        assert_eq!(res.content_type(), "application/json");
        assert!(!res.is_empty());
        assert!(ResponseSnapshot::default().is_empty());
        assert_eq!(ResponseSnapshot::default().protocol_major(), 0);
    }

    #[test]
    fn test_protocol_labels() {
        assert_eq!(ProtocolVersion::from_label("HTTP/2"), Some(ProtocolVersion::Http2));
        assert_eq!(ProtocolVersion::Http2.major(), 2);
        assert_eq!(ProtocolVersion::Http11.minor(), 1);
        assert_eq!(ProtocolVersion::from_label("SPDY"), None);
    }
}
