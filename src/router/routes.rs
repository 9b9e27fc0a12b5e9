//! Static route table.
//!
//! One entry per view: path, display name, and the metadata the guard
//! consumes (`requires_auth`, `guest_only`, layout). Parameterized routes
//! (`:hash`, `:user`) carry the parameter appended to their path.

/// Route identifiers. The discriminant doubles as the index into `TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteId {
    Home = 0,
    Upload,
    Scanning,
    Antivirus,
    Summary,
    Comments,
    Strings,
    Login,
    Signup,
    ForgotPassword,
    ResetPassword,
    Settings,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Default,
    Unauthenticated,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub id: RouteId,
    pub path: &'static str,
    pub name: &'static str,
    pub title: &'static str,
    pub requires_auth: bool,
    pub guest_only: bool,
    pub layout: Layout,
    /// Route takes a trailing parameter (hash or username)
    pub has_param: bool,
}

pub const TABLE: &[RouteSpec] = &[
    RouteSpec {
        id: RouteId::Home,
        path: "/",
        name: "home",
        title: "home",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Upload,
        path: "/upload/",
        name: "upload",
        title: "Upload",
        requires_auth: true,
        guest_only: false,
        layout: Layout::Default,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Scanning,
        path: "/scanning/",
        name: "scanning",
        title: "Scanning",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Antivirus,
        path: "/antivirus/",
        name: "antivirus",
        title: "Antivirus",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: true,
    },
    RouteSpec {
        id: RouteId::Summary,
        path: "/summary/",
        name: "summary",
        title: "Summary",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: true,
    },
    RouteSpec {
        id: RouteId::Comments,
        path: "/comments/",
        name: "comments",
        title: "Comments",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: true,
    },
    RouteSpec {
        id: RouteId::Strings,
        path: "/strings/",
        name: "strings",
        title: "Strings",
        requires_auth: false,
        guest_only: false,
        layout: Layout::Default,
        has_param: true,
    },
    RouteSpec {
        id: RouteId::Login,
        path: "/login/",
        name: "login",
        title: "Log in",
        requires_auth: false,
        guest_only: true,
        layout: Layout::Unauthenticated,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Signup,
        path: "/signup/",
        name: "signUp",
        title: "Sign up",
        requires_auth: false,
        guest_only: true,
        layout: Layout::Unauthenticated,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::ForgotPassword,
        path: "/forgot-password/",
        name: "forgotPassword",
        title: "Forgot Password?",
        requires_auth: false,
        guest_only: true,
        layout: Layout::Unauthenticated,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::ResetPassword,
        path: "/reset-password/",
        name: "resetPassword",
        title: "Reset Password",
        requires_auth: false,
        guest_only: true,
        layout: Layout::Unauthenticated,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Settings,
        path: "/settings/",
        name: "settings",
        title: "Settings",
        requires_auth: true,
        guest_only: false,
        layout: Layout::Default,
        has_param: false,
    },
    RouteSpec {
        id: RouteId::Profile,
        path: "/profile/",
        name: "profile",
        title: "Profile",
        requires_auth: true,
        guest_only: false,
        layout: Layout::Default,
        has_param: true,
    },
];

impl RouteId {
    pub fn spec(self) -> &'static RouteSpec {
        &TABLE[self as usize]
    }

    /// Full path including the parameter, e.g. `/summary/<hash>`
    pub fn full_path(self, param: Option<&str>) -> String {
        let spec = self.spec();
        match (spec.has_param, param) {
            (true, Some(param)) => format!("{}{}", spec.path, param),
            _ => spec.path.to_string(),
        }
    }
}

/// Match a path against the table, extracting the trailing parameter for
/// parameterized routes. Returns None for unknown paths.
pub fn match_path(path: &str) -> Option<(RouteId, Option<String>)> {
    // Exact matches first ("/" would otherwise prefix-match everything)
    for spec in TABLE {
        if !spec.has_param && (path == spec.path || path == spec.path.trim_end_matches('/')) {
            return Some((spec.id, None));
        }
    }
    for spec in TABLE {
        if spec.has_param {
            if let Some(rest) = path.strip_prefix(spec.path) {
                if !rest.is_empty() && !rest.contains('/') {
                    return Some((spec.id, Some(rest.to_string())));
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_ids() {
        for (i, spec) in TABLE.iter().enumerate() {
            assert_eq!(spec.id as usize, i, "table out of order at {}", spec.name);
        }
    }

    #[test]
    fn test_spec_lookup() {
        assert_eq!(RouteId::Upload.spec().path, "/upload/");
        assert!(RouteId::Upload.spec().requires_auth);
        assert!(RouteId::Login.spec().guest_only);
        assert_eq!(RouteId::Login.spec().layout, Layout::Unauthenticated);
    }

    #[test]
    fn test_full_path_with_param() {
        assert_eq!(
            RouteId::Summary.full_path(Some("deadbeef")),
            "/summary/deadbeef"
        );
        assert_eq!(RouteId::Upload.full_path(None), "/upload/");
        // Parameter on a non-param route is ignored
        assert_eq!(RouteId::Home.full_path(Some("x")), "/");
    }

    #[test]
    fn test_match_path() {
        assert_eq!(match_path("/"), Some((RouteId::Home, None)));
        assert_eq!(match_path("/upload/"), Some((RouteId::Upload, None)));
        assert_eq!(match_path("/upload"), Some((RouteId::Upload, None)));
        assert_eq!(
            match_path("/summary/deadbeef"),
            Some((RouteId::Summary, Some("deadbeef".to_string())))
        );
        assert_eq!(match_path("/nope/"), None);
        assert_eq!(match_path("/summary/"), None); // param required
    }
}
