use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, middleware::Logger, web};
use log::{debug, error, info};

pub const DEFAULT_PROXY_PORT: u16 = 8010;
pub const DEFAULT_UPSTREAM: &str = "https://dashscope.aliyuncs.com";

/// Headers that must not be forwarded: browser-identifying ones the relay
/// exists to strip, plus hop-by-hop and length/encoding headers the client
/// recomputes.
const SKIPPED_HEADERS: &[&str] = &[
    "host",
    "origin",
    "referer",
    "connection",
    "content-length",
    "accept-encoding",
];

struct ProxyState {
    client: reqwest::Client,
    upstream: String,
}

pub fn should_forward_header(name: &str) -> bool {
    !SKIPPED_HEADERS.contains(&name.to_ascii_lowercase().as_str())
}

async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<ProxyState>,
) -> HttpResponse {
    let mut url = format!("{}{}", state.upstream.trim_end_matches('/'), req.uri().path());
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    debug!("Relaying {} {} -> {url}", req.method(), req.uri().path());

    let method = match reqwest::Method::from_bytes(req.method().as_str().as_bytes()) {
        Ok(method) => method,
        Err(_) => {
            return HttpResponse::MethodNotAllowed().json(serde_json::json!({
                "error": "Unsupported method"
            }));
        }
    };

    let mut upstream_req = state.client.request(method, &url);
    for (name, value) in req.headers() {
        if should_forward_header(name.as_str()) {
            upstream_req = upstream_req.header(name.as_str(), value.as_bytes());
        }
    }
    if !body.is_empty() {
        upstream_req = upstream_req.body(body.to_vec());
    }

    let upstream_resp = match upstream_req.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Upstream request failed: {e}");
            return HttpResponse::BadGateway().json(serde_json::json!({
                "error": format!("Upstream request failed: {}", e)
            }));
        }
    };

    let status = StatusCode::from_u16(upstream_resp.status().as_u16())
        .unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream_resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    match upstream_resp.bytes().await {
        Ok(bytes) => {
            debug!("Upstream responded {status} ({} bytes)", bytes.len());
            HttpResponse::build(status)
                .content_type(content_type)
                .body(bytes.to_vec())
        }
        Err(e) => {
            error!("Failed to read upstream response: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Failed to read upstream response"
            }))
        }
    }
}

/// Local CORS relay so browser clients can reach the Qwen API during
/// development. Forwards every request to the fixed upstream host and
/// answers with permissive CORS headers.
pub async fn run_proxy(host: &str, port: u16, upstream: String) -> std::io::Result<()> {
    info!("Starting CORS relay on {host}:{port} -> {upstream}");

    let state = web::Data::new(ProxyState {
        client: reqwest::Client::new(),
        upstream,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .default_service(web::route().to(forward))
    })
    .bind((host, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_headers_are_stripped() {
        for name in ["Host", "origin", "Referer", "content-length", "Accept-Encoding"] {
            assert!(!should_forward_header(name), "{name} should be stripped");
        }
    }

    #[test]
    fn payload_headers_are_forwarded() {
        for name in ["content-type", "authorization", "accept", "x-request-id"] {
            assert!(should_forward_header(name), "{name} should be forwarded");
        }
    }
}
