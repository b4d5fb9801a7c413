use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LegalyzeError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("File appears to be empty or unreadable")]
    EmptyContent,
}
