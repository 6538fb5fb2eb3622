//! 요청 메타데이터 추출

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

const CLIENT_IP_HEADERS: [&str; 3] = ["X-Real-IP", "X-Client-IP", "CF-Connecting-IP"];

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn peer_ip(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 클라이언트 IP를 추출합니다.
///
/// `trust_proxy_headers`가 꺼져 있으면 연결 주소만 사용합니다. 켜져 있으면
/// `X-Forwarded-For`의 첫 번째 값, 프록시 헤더, 연결 주소 순으로 확인합니다.
pub fn client_ip(req: &HttpRequest, trust_proxy_headers: bool) -> String {
    if !trust_proxy_headers {
        return peer_ip(req);
    }

    let headers = req.headers();

    if let Some(first) = header_value(headers, "X-Forwarded-For")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }

    CLIENT_IP_HEADERS
        .iter()
        .find_map(|name| header_value(headers, name))
        .map(str::to_string)
        .unwrap_or_else(|| peer_ip(req))
}

/// `Authorization: Bearer <token>` 헤더에서 토큰을 꺼냅니다.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    header_value(req.headers(), "Authorization")
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_for_first_hop_wins_behind_proxy() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "10.0.0.9"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "203.0.113.7");
    }

    #[test]
    fn test_proxy_headers_ignored_unless_trusted() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.50:40000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .insert_header(("X-Real-IP", "198.51.100.4"))
            .to_http_request();
        assert_eq!(client_ip(&req, false), "192.0.2.50");
    }

    #[test]
    fn test_falls_back_to_real_ip_then_peer() {
        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "198.51.100.4"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "198.51.100.4");

        let req = TestRequest::default()
            .peer_addr("192.0.2.1:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req, true), "192.0.2.1");
    }

    #[test]
    fn test_bearer_token() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def.ghi"));

        let req = TestRequest::default()
            .insert_header(("Authorization", "Basic Zm9vOmJhcg=="))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
