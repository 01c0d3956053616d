use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware для логирования HTTP запросов
///
/// Пишет в лог: длительность (ms), размер ответа (если известен),
/// статус, метод и путь. 5xx идут уровнем `error`, 4xx уровнем `warn`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let duration = start.elapsed().as_millis();
    let status = response.status();
    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map(format_number)
        .unwrap_or_else(|| "-".to_string());

    if status.is_server_error() {
        tracing::error!("{:>5}ms | {:>10} | {} {:>6} {}", duration, size, status.as_u16(), method, path);
    } else if status.is_client_error() {
        tracing::warn!("{:>5}ms | {:>10} | {} {:>6} {}", duration, size, status.as_u16(), method, path);
    } else {
        tracing::info!("{:>5}ms | {:>10} | {} {:>6} {}", duration, size, status.as_u16(), method, path);
    }

    response
}

/// Число с разделителями тысяч (точками)
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
