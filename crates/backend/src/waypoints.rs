use pilot_shared::models::Waypoint;
use std::path::Path;

/// Load the flight plan waypoints from a JSON array file.
pub fn load(path: &Path) -> Result<Vec<Waypoint>, String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let waypoints: Vec<Waypoint> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    if let Some(bad) = waypoints
        .iter()
        .position(|w| !pilot_shared::models::Position::new(w.latitude, w.longitude).is_valid())
    {
        return Err(format!(
            "Waypoint {} in {} has an invalid coordinate",
            bad + 1,
            path.display()
        ));
    }

    let current = waypoints.iter().filter(|w| w.current).count();
    if current > 1 {
        tracing::warn!(current, "More than one waypoint is marked current");
    }
    tracing::info!(waypoints = waypoints.len(), path = %path.display(), "Loaded waypoints");

    Ok(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_load_waypoints() {
        let file = write_temp(
            r#"[
                {"latitude":47.8219,"longitude":13.0403,"altitude":10.0,"precision":2.0,"velocity":1.0,"current":false},
                {"latitude":47.8225,"longitude":13.0410,"altitude":12.0,"precision":2.0,"current":true}
            ]"#,
        );
        let waypoints = load(file.path()).unwrap();
        assert_eq!(waypoints.len(), 2);
        assert!(waypoints[1].current);
        assert!(waypoints[1].velocity.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.starts_with("Failed to read"));
    }

    #[test]
    fn test_load_malformed_file() {
        let file = write_temp("{ not a list");
        let err = load(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse"));
    }

    #[test]
    fn test_load_rejects_invalid_coordinate() {
        let file = write_temp(
            r#"[{"latitude":147.0,"longitude":13.0,"altitude":10.0,"precision":2.0}]"#,
        );
        let err = load(file.path()).unwrap_err();
        assert!(err.contains("Waypoint 1"));
    }
}
