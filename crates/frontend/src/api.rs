use pilot_shared::models::{parse_position_body, Position};

/// Join the page origin and an endpoint path. Absolute URLs pass through.
pub fn endpoint_url(origin: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn page_origin() -> Result<String, String> {
    let window = web_sys::window().ok_or("No window available")?;
    window
        .location()
        .origin()
        .map_err(|_| "Page origin unavailable".to_string())
}

/// Fetch the tracked position. `Ok(None)` means the server has no fix yet.
pub async fn fetch_position(path: &str) -> Result<Option<Position>, String> {
    let url = endpoint_url(&page_origin()?, path);

    let resp = reqwest::Client::new()
        .get(&url)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.status().is_success() {
        return Err(format!("{} returned {}", url, resp.status()));
    }

    let body = resp.text().await.map_err(|e| e.to_string())?;
    parse_position_body(&body).map_err(|e| e.to_string())
}
