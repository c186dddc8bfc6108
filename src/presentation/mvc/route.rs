use axum::Router;
use axum::routing::MethodRouter;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Parameter {
        name: String,
        default: Option<String>,
        optional: bool,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTemplateError {
    #[error("unbalanced braces in route segment {0:?}")]
    Unbalanced(String),
    #[error("empty parameter name in route segment {0:?}")]
    EmptyParameter(String),
    #[error("optional parameter {0:?} cannot have a default value")]
    OptionalWithDefault(String),
    #[error("optional parameter {0:?} must be the last segment")]
    OptionalNotLast(String),
}

/// Conventional route such as `{controller=Home}/{action=Index}/{id?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn parse(template: &str) -> Result<Self, RouteTemplateError> {
        let raw_segments: Vec<&str> = template
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let mut segments = Vec::with_capacity(raw_segments.len());

        for (i, raw) in raw_segments.iter().enumerate() {
            let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) else {
                if raw.contains('{') || raw.contains('}') {
                    return Err(RouteTemplateError::Unbalanced(raw.to_string()));
                }
                segments.push(Segment::Literal(raw.to_string()));
                continue;
            };
            if inner.contains('{') || inner.contains('}') {
                return Err(RouteTemplateError::Unbalanced(raw.to_string()));
            }

            let (name, default, optional) = match inner.strip_suffix('?') {
                Some(name) if name.contains('=') => {
                    return Err(RouteTemplateError::OptionalWithDefault(name.to_string()));
                }
                Some(name) => (name, None, true),
                None => match inner.split_once('=') {
                    Some((name, default)) => (name, Some(default.to_string()), false),
                    None => (inner, None, false),
                },
            };
            if name.trim().is_empty() {
                return Err(RouteTemplateError::EmptyParameter(raw.to_string()));
            }
            if optional && i + 1 != raw_segments.len() {
                return Err(RouteTemplateError::OptionalNotLast(name.to_string()));
            }
            segments.push(Segment::Parameter {
                name: name.trim().to_string(),
                default,
                optional,
            });
        }

        Ok(Self { segments })
    }

    /// Every concrete axum path that reaches `controller`/`action`, in lower
    /// case. Requests are brought to that spelling by [`RouteCasing`].
    ///
    /// Trailing segments are dropped while they are optional or hold their
    /// default value. Parameters other than `controller` and `action` become
    /// captures.
    pub fn expand(&self, controller: &str, action: &str) -> Vec<String> {
        let bound = |name: &str| bound_value(name, controller, action);

        let rendered: Vec<String> = self
            .segments
            .iter()
            .map(|s| match s {
                Segment::Literal(l) => l.to_lowercase(),
                Segment::Parameter { name, .. } => match bound(name) {
                    Some(value) => value.to_lowercase(),
                    None => format!(":{name}"),
                },
            })
            .collect();

        let omittable = |s: &Segment| match s {
            Segment::Literal(_) => false,
            Segment::Parameter {
                name,
                default,
                optional,
            } => {
                *optional
                    || match (default, bound(name)) {
                        (Some(d), Some(v)) => d.eq_ignore_ascii_case(v),
                        (Some(_), None) => true,
                        (None, _) => false,
                    }
            }
        };

        let mut paths = Vec::new();
        for len in (0..=self.segments.len()).rev() {
            if !self.segments[len..].iter().all(omittable) {
                continue;
            }
            let path = format!("/{}", rendered[..len].join("/"));
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Whether the segment at `index` captures a value rather than selecting
    /// the controller, the action or a literal.
    fn captures_at(&self, index: usize) -> bool {
        matches!(
            self.segments.get(index),
            Some(Segment::Parameter { name, .. }) if bound_value(name, "", "").is_none()
        )
    }
}

fn bound_value<'a>(name: &str, controller: &'a str, action: &'a str) -> Option<&'a str> {
    if name.eq_ignore_ascii_case("controller") {
        Some(controller)
    } else if name.eq_ignore_ascii_case("action") {
        Some(action)
    } else {
        None
    }
}

/// Maps request paths onto the lower-case spelling routes are registered
/// under, so matching ignores case. Fixed page paths match as a whole; other
/// paths are lower-cased segment by segment except where the template
/// captures a value, and past the template's end.
#[derive(Debug, Clone)]
pub struct RouteCasing {
    template: RouteTemplate,
    fixed_paths: Vec<String>,
}

impl RouteCasing {
    pub fn new(template: RouteTemplate) -> Self {
        Self {
            template,
            fixed_paths: Vec::new(),
        }
    }

    pub fn with_fixed_paths<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.fixed_paths
            .extend(paths.into_iter().map(str::to_lowercase));
        self
    }

    pub fn canonical_path(&self, path: &str) -> String {
        let lower = path.to_lowercase();
        if self.fixed_paths.contains(&lower) {
            return lower;
        }
        let mut out = String::with_capacity(path.len());
        for (i, segment) in path.split('/').skip(1).enumerate() {
            out.push('/');
            if i < self.template.segments.len() && !self.template.captures_at(i) {
                out.push_str(&segment.to_lowercase());
            } else {
                out.push_str(segment);
            }
        }
        if out.is_empty() { "/".into() } else { out }
    }
}

/// Registers controller actions through a [`RouteTemplate`].
pub struct ControllerRoutes<S> {
    template: RouteTemplate,
    router: Router<S>,
}

impl<S> ControllerRoutes<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(template: RouteTemplate) -> Self {
        Self {
            template,
            router: Router::new(),
        }
    }

    pub fn action(mut self, controller: &str, action: &str, handler: MethodRouter<S>) -> Self {
        for path in self.template.expand(controller, action) {
            self.router = self.router.route(&path, handler.clone());
        }
        self
    }

    pub fn into_router(self) -> Router<S> {
        self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::mvc::DEFAULT_ROUTE;

    #[test]
    fn default_action_is_reachable_from_root() {
        let template = RouteTemplate::parse(DEFAULT_ROUTE).unwrap();
        assert_eq!(
            template.expand("Home", "Index"),
            vec!["/home/index/:id", "/home/index", "/home", "/"]
        );
    }

    #[test]
    fn non_default_action_keeps_its_segment() {
        let template = RouteTemplate::parse(DEFAULT_ROUTE).unwrap();
        assert_eq!(
            template.expand("Home", "Privacy"),
            vec!["/home/privacy/:id", "/home/privacy"]
        );
    }

    #[test]
    fn non_default_controller_keeps_its_segment() {
        let template = RouteTemplate::parse(DEFAULT_ROUTE).unwrap();
        let paths = template.expand("Orders", "Index");
        assert!(paths.contains(&"/orders".to_string()));
        assert!(!paths.contains(&"/".to_string()));
    }

    #[test]
    fn literals_are_kept() {
        let template = RouteTemplate::parse("/admin/{controller}/{action=List}").unwrap();
        assert_eq!(
            template.expand("Users", "List"),
            vec!["/admin/users/list", "/admin/users"]
        );
    }

    #[test]
    fn rejects_malformed_templates() {
        assert_eq!(
            RouteTemplate::parse("{controller"),
            Err(RouteTemplateError::Unbalanced("{controller".into()))
        );
        assert_eq!(
            RouteTemplate::parse("{}"),
            Err(RouteTemplateError::EmptyParameter("{}".into()))
        );
        assert_eq!(
            RouteTemplate::parse("{id=1?}"),
            Err(RouteTemplateError::OptionalWithDefault("id=1".into()))
        );
        assert_eq!(
            RouteTemplate::parse("{id?}/{action}"),
            Err(RouteTemplateError::OptionalNotLast("id".into()))
        );
    }

    #[test]
    fn casing_lowercases_route_segments_but_keeps_captures() {
        let casing = RouteCasing::new(RouteTemplate::parse(DEFAULT_ROUTE).unwrap());
        assert_eq!(casing.canonical_path("/HOME/Privacy"), "/home/privacy");
        assert_eq!(casing.canonical_path("/Home/index/AbC-42"), "/home/index/AbC-42");
        assert_eq!(casing.canonical_path("/"), "/");
        assert_eq!(casing.canonical_path("/Home/Index/Id/Extra"), "/home/index/Id/Extra");
    }

    #[test]
    fn casing_matches_fixed_paths_whole() {
        let casing = RouteCasing::new(RouteTemplate::parse(DEFAULT_ROUTE).unwrap())
            .with_fixed_paths(["/Identity/Account/Login", "/Identity/Account/Manage/ChangePassword"]);
        assert_eq!(
            casing.canonical_path("/identity/Account/LOGIN"),
            "/identity/account/login"
        );
        assert_eq!(
            casing.canonical_path("/Identity/Account/Manage/ChangePassword"),
            "/identity/account/manage/changepassword"
        );
    }
}
