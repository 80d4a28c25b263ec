//! Page dispatch by URL path

/// The two pages of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Landing,
    /// `/map`
    Map,
}

impl Route {
    pub const ALL: [Route; 2] = [Route::Landing, Route::Map];

    /// Returns the path this route is mounted at
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Map => "/map",
        }
    }

    /// Resolves a request path; a single trailing slash is tolerated
    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = match path.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        Route::ALL.into_iter().find(|route| route.path() == trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Landing));
        assert_eq!(Route::from_path("/map"), Some(Route::Map));
        assert_eq!(Route::from_path("/map/"), Some(Route::Map));
        assert_eq!(Route::from_path("/maps"), None);
        assert_eq!(Route::from_path(""), None);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }
}
