use pilot_shared::config::ViewerConfig;
use pilot_shared::models::MAP_CANVAS_ID;

pub const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
pub const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Render the viewer page.
///
/// `template` is the built frontend's `index.html`. Leaflet is loaded in
/// `<head>` so it is available before the app mounts, and the configuration
/// is appended as hidden inputs at the end of `<body>`. Without a template a
/// minimal page is produced.
pub fn render_viewer_page(template: Option<&str>, config: &ViewerConfig) -> String {
    let head = leaflet_tags();
    let inputs = hidden_inputs(config);

    match template {
        Some(html) => {
            let html = insert_before(html, "</head>", &head);
            insert_before(&html, "</body>", &inputs)
        }
        None => format!(
            r#"<!DOCTYPE html>
<html>
<head><title>Pilot Position Viewer</title>
{head}</head>
<body>
<p>Frontend not built yet. The current position is available at <a href="{url}">{url}</a>.</p>
<div id="{canvas}"></div>
{inputs}</body>
</html>"#,
            url = escape_attr(&config.position_url),
            canvas = MAP_CANVAS_ID,
        ),
    }
}

fn leaflet_tags() -> String {
    format!(
        "<link rel=\"stylesheet\" href=\"{}\">\n<script src=\"{}\"></script>\n",
        LEAFLET_CSS, LEAFLET_JS
    )
}

fn hidden_inputs(config: &ViewerConfig) -> String {
    config
        .to_fields()
        .into_iter()
        .map(|(name, value)| {
            format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
                name,
                escape_attr(&value)
            )
        })
        .collect()
}

/// Insert `fragment` before the last occurrence of `marker`, or append it.
fn insert_before(html: &str, marker: &str, fragment: &str) -> String {
    match html.rfind(marker) {
        Some(idx) => {
            let mut out = String::with_capacity(html.len() + fragment.len());
            out.push_str(&html[..idx]);
            out.push_str(fragment);
            out.push_str(&html[idx..]);
            out
        }
        None => format!("{}{}", html, fragment),
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_shared::models::MapType;

    const TEMPLATE: &str = "<!DOCTYPE html>\n<html><head><title>app</title></head><body><div id=\"main\"></div><script src=\"/assets/app.js\"></script></body></html>";

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"{"x":1}"#), "{&quot;x&quot;:1}");
        assert_eq!(escape_attr("a<b>&'"), "a&lt;b&gt;&amp;&#39;");
    }

    #[test]
    fn test_hidden_inputs_for_defaults() {
        let inputs = hidden_inputs(&ViewerConfig::default());
        assert!(inputs.contains(
            r#"<input type="hidden" name="center" value="{&quot;x&quot;:13.040328,&quot;y&quot;:47.821881}">"#
        ));
        assert!(inputs.contains(r#"<input type="hidden" name="zoomLevel" value="17">"#));
        assert!(inputs.contains(r#"<input type="hidden" name="mapType" value="&quot;Hybrid&quot;">"#));
    }

    #[test]
    fn test_template_gets_leaflet_in_head() {
        let page = render_viewer_page(Some(TEMPLATE), &ViewerConfig::default());
        let css = page.find(LEAFLET_CSS).unwrap();
        let js = page.find(LEAFLET_JS).unwrap();
        let head_end = page.find("</head>").unwrap();
        assert!(css < head_end && js < head_end);
    }

    #[test]
    fn test_template_gets_inputs_before_body_end() {
        let config = ViewerConfig {
            map_type: MapType::Terrain,
            ..ViewerConfig::default()
        };
        let page = render_viewer_page(Some(TEMPLATE), &config);
        let input = page.find(r#"name="mapType" value="&quot;Terrain&quot;""#).unwrap();
        let app_script = page.find("/assets/app.js").unwrap();
        let body_end = page.find("</body>").unwrap();
        assert!(app_script < input);
        assert!(input < body_end);
    }

    #[test]
    fn test_template_without_markers_appends() {
        let page = render_viewer_page(Some("<div id=\"main\"></div>"), &ViewerConfig::default());
        assert!(page.starts_with("<div id=\"main\"></div>"));
        assert!(page.contains("name=\"zoomLevel\""));
    }

    #[test]
    fn test_fallback_page() {
        let page = render_viewer_page(None, &ViewerConfig::default());
        assert!(page.contains("Frontend not built yet"));
        assert!(page.contains(r#"<div id="map_canvas"></div>"#));
        assert!(page.contains(r#"href="/pilot/json/position""#));
        assert!(page.contains("name=\"pollInterval\" value=\"1000\""));
    }
}
