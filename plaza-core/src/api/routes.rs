macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions consumed by Plaza clients
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    /// The signed-in user's own profile
    pub mod profile {
        pub const ME: &str = v1_path!("/profile/me");
        pub const BASIC: &str = v1_path!("/profile/me/basic");
        pub const ENHANCED: &str = v1_path!("/profile/me/enhanced");
        pub const VISIBILITY: &str = v1_path!("/profile/me/visibility");
        pub const ITEM_VISIBILITY: &str =
            v1_path!("/profile/me/enhanced/visibility");
        pub const STATUS: &str = v1_path!("/profile/me/status");
        pub const USERNAME_AVAILABILITY: &str =
            v1_path!("/profile/username-availability");
    }

    pub mod users {
        pub const PROFILE: &str = v1_path!("/users/{id}/profile");
    }
}

/// Helper utilities for working with route templates
pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Append percent-encoded query parameters to the provided route.
    pub fn with_query(route: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return route.to_string();
        }

        let mut path =
            String::with_capacity(route.len() + 1 + params.len() * 8);
        path.push_str(route);
        path.push('?');

        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                path.push('&');
            }
            path.push_str(&urlencoding::encode(key));
            path.push('=');
            path.push_str(&urlencoding::encode(value));
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_are_versioned() {
        assert_eq!(v1::profile::ME, "/api/v1/profile/me");
        assert_eq!(
            v1::profile::USERNAME_AVAILABILITY,
            "/api/v1/profile/username-availability"
        );
    }

    #[test]
    fn replaces_path_params() {
        assert_eq!(
            utils::replace_param(v1::users::PROFILE, "{id}", "42"),
            "/api/v1/users/42/profile"
        );
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(
            utils::with_query("/x", &[("candidate", "a b&c")]),
            "/x?candidate=a%20b%26c"
        );
        assert_eq!(utils::with_query("/x", &[]), "/x");
    }
}
