pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:36000/api/greenwave";

pub const HEALTH_PATH: &str = "/health";
pub const EXTRACT_PATH: &str = "/extract";
pub const OPTIMIZE_PATH: &str = "/optimize";

/// Target travel speed used by the demo network and after every reset.
pub const DEFAULT_DESIRED_SPEED_KMH: f64 = 40.0;

pub const DEFAULT_OPTIMIZER_TYPE: &str = "genetic";

/// Joins a service base URL and an endpoint path, tolerating a trailing slash on the base.
#[must_use]
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

#[must_use]
pub fn health_url(base_url: &str) -> String {
    endpoint_url(base_url, HEALTH_PATH)
}

#[must_use]
pub fn extract_url(base_url: &str) -> String {
    endpoint_url(base_url, EXTRACT_PATH)
}

#[must_use]
pub fn optimize_url(base_url: &str) -> String {
    endpoint_url(base_url, OPTIMIZE_PATH)
}
