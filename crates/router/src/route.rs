/// Operations reachable through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FetchOne,
    FetchAll,
    Create,
    Replace,
    PartialUpdate,
    Delete,
}

pub const FEEDBACK_PATH: &str = "/feedback";
pub const FEEDBACKS_PATH: &str = "/feedbacks";

// First match wins
const ROUTES: [(&str, &str, Route); 6] = [
    ("GET", FEEDBACK_PATH, Route::FetchOne),
    ("GET", FEEDBACKS_PATH, Route::FetchAll),
    ("POST", FEEDBACK_PATH, Route::Create),
    ("PUT", FEEDBACK_PATH, Route::Replace),
    ("PATCH", FEEDBACK_PATH, Route::PartialUpdate),
    ("DELETE", FEEDBACK_PATH, Route::Delete),
];

impl Route {
    /// Select the route for an exact method and path, `None` when nothing matches.
    pub fn resolve(method: &str, path: &str) -> Option<Route> {
        ROUTES
            .iter()
            .find(|(route_method, route_path, _)| *route_method == method && *route_path == path)
            .map(|(_, _, route)| *route)
    }
}
