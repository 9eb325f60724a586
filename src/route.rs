//! Navigation targets of the application.
//!
//! Mirrors the four paths of the note app: `/`, `/new`, `/:id` and
//! `/:id/edit`.

use std::fmt;

use crate::models::NoteId;

/// A screen the application can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Filterable note list (`/`).
    List,
    /// Form for a new note (`/new`).
    New,
    /// Rendered note (`/:id`).
    Detail(NoteId),
    /// Form prefilled with an existing note (`/:id/edit`).
    Edit(NoteId),
}

impl Route {
    /// Parses a path. Anything unrecognized maps to [`Route::List`].
    ///
    /// # Examples
    ///
    /// ```
    /// use marknote::{NoteId, Route};
    ///
    /// assert_eq!(Route::parse("/"), Route::List);
    /// assert_eq!(Route::parse("/new"), Route::New);
    /// assert_eq!(Route::parse("/abc"), Route::Detail(NoteId::new("abc")));
    /// assert_eq!(Route::parse("/abc/edit"), Route::Edit(NoteId::new("abc")));
    /// assert_eq!(Route::parse("/abc/edit/more"), Route::List);
    /// ```
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::List,
            ["new"] => Route::New,
            [id] => Route::Detail(NoteId::new(*id)),
            [id, "edit"] => Route::Edit(NoteId::new(*id)),
            _ => Route::List,
        }
    }

    /// Returns the path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::New => "/new".to_string(),
            Route::Detail(id) => format!("/{id}"),
            Route::Edit(id) => format!("/{id}/edit"),
        }
    }

    /// Returns the route one level up (`..`).
    pub fn parent(&self) -> Self {
        match self {
            Route::Edit(id) => Route::Detail(id.clone()),
            Route::List | Route::New | Route::Detail(_) => Route::List,
        }
    }

    /// Returns the note this route is about, if any.
    pub fn note_id(&self) -> Option<&NoteId> {
        match self {
            Route::Detail(id) | Route::Edit(id) => Some(id),
            Route::List | Route::New => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_and_parse_agree() {
        let id = NoteId::new("0b1c");
        for route in [
            Route::List,
            Route::New,
            Route::Detail(id.clone()),
            Route::Edit(id),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn trailing_slashes_are_tolerated() {
        assert_eq!(Route::parse("/new/"), Route::New);
        assert_eq!(Route::parse(""), Route::List);
    }

    #[test]
    fn parent_of_edit_is_detail() {
        let id = NoteId::new("x");
        assert_eq!(Route::Edit(id.clone()).parent(), Route::Detail(id.clone()));
        assert_eq!(Route::Detail(id).parent(), Route::List);
        assert_eq!(Route::New.parent(), Route::List);
    }

    #[test]
    fn display_uses_path() {
        assert_eq!(Route::Edit(NoteId::new("x")).to_string(), "/x/edit");
    }
}
