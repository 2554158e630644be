use super::err::AppError;
use super::store::StoreClient;
use super::student::{Student, StudentFields};

/// Create vs edit, decided once by the presence of the route's `id`
/// parameter and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Create,
    Edit(String),
}

impl Mode {
    pub fn from_route(id: Option<String>) -> Self {
        match id {
            Some(id) => Mode::Edit(id),
            None => Mode::Create,
        }
    }
}

/// Validate and dispatch a submit. Required fields block the submission
/// before any request is issued.
pub async fn submit(
    store: &StoreClient,
    mode: &Mode,
    fields: &StudentFields,
) -> Result<Student, AppError> {
    fields.validate()?;
    match mode {
        Mode::Create => store.create(fields).await,
        Mode::Edit(id) => store.update(id, fields).await,
    }
}

/// Toast copy for a submit that settled successfully.
pub fn success_notice(mode: &Mode) -> (&'static str, &'static str) {
    match mode {
        Mode::Create => (
            "Student created",
            "The student has been successfully created.",
        ),
        Mode::Edit(_) => (
            "Student updated",
            "The student has been successfully updated.",
        ),
    }
}

/// Toast copy for a submit that failed; the form stays populated and
/// editable behind it.
pub fn failure_notice(mode: &Mode) -> (&'static str, &'static str) {
    match mode {
        Mode::Create => ("Error", "Failed to create student. Please try again."),
        Mode::Edit(_) => ("Error", "Failed to update student. Please try again."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_the_route_parameter() {
        assert_eq!(Mode::from_route(None), Mode::Create);
        assert_eq!(
            Mode::from_route(Some("7".to_string())),
            Mode::Edit("7".to_string())
        );
    }

    #[test]
    fn test_notices_match_the_mode() {
        assert_eq!(success_notice(&Mode::Create).0, "Student created");
        assert_eq!(
            success_notice(&Mode::Edit("7".to_string())).0,
            "Student updated"
        );
        assert!(failure_notice(&Mode::Create).1.contains("create"));
        assert!(failure_notice(&Mode::Edit("7".to_string()))
            .1
            .contains("update"));
    }

    #[tokio::test]
    async fn test_empty_required_field_blocks_the_submission() {
        // nothing listens here; a validation failure must return before
        // any request is attempted
        let store = StoreClient::new("http://127.0.0.1:9");
        let fields = StudentFields::new(
            String::new(),
            "A".to_string(),
            "C1".to_string(),
            String::new(),
        );

        let result = submit(&store, &Mode::Create, &fields).await;
        assert!(matches!(result, Err(AppError::MissingField("mssv"))));
    }
}
