pub mod search;
pub mod person_queries;
pub mod business_queries;
pub mod project_queries;
pub mod interaction_queries;
pub mod dashboard;

/// Outcome of a searched list view. A query matching exactly one row tells
/// the caller to redirect straight to that row's detail view.
#[derive(Debug)]
pub enum ListOutcome<T> {
    Single(T),
    Many(Vec<T>),
}

impl<T> ListOutcome<T> {
    fn from_rows(searched: bool, mut rows: Vec<T>) -> Self {
        if searched && rows.len() == 1 {
            ListOutcome::Single(rows.remove(0))
        } else {
            ListOutcome::Many(rows)
        }
    }
}
