use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Entity kinds that a scanned code can point at.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Unit,
    Box,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Unit => "unit",
            RouteKind::Box => "box",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "unit" => Some(RouteKind::Unit),
            "box" => Some(RouteKind::Box),
            _ => None,
        }
    }
}

/// A canonical, app-relative route produced from a scan.
///
/// `path` always starts with `/` and never contains a run of separators.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct ResolvedRoute {
    pub path: String,
}

impl ResolvedRoute {
    pub fn entity(kind: RouteKind, id: &str) -> Self {
        Self {
            path: format!("/{}/{}", kind.as_str(), id),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }
}

/// The application's route table.
///
/// Anything the table does not know about lands on `Home`, mirroring the
/// catch-all route of the in-process router.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(tag = "view", content = "id", rename_all = "lowercase")]
pub enum AppRoute {
    Home,
    Categories,
    Unit(String),
    Box(String),
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Home => "/".to_string(),
            AppRoute::Categories => "/categories".to_string(),
            AppRoute::Unit(id) => format!("/unit/{id}"),
            AppRoute::Box(id) => format!("/box/{id}"),
        }
    }

    /// Match an app-relative path against the route table.
    pub fn match_path(path: &str) -> Self {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        let mut segments = trimmed.strip_prefix('/').unwrap_or(trimmed).split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some("categories"), None, None) => AppRoute::Categories,
            (Some(kind), Some(id), None) if !id.is_empty() => match RouteKind::from_segment(kind) {
                Some(RouteKind::Unit) => AppRoute::Unit(id.to_string()),
                Some(RouteKind::Box) => AppRoute::Box(id.to_string()),
                None => AppRoute::Home,
            },
            _ => AppRoute::Home,
        }
    }
}

impl From<ResolvedRoute> for AppRoute {
    fn from(route: ResolvedRoute) -> Self {
        AppRoute::match_path(&route.path)
    }
}
