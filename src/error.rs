use thiserror::Error;

/// Errors returned while opening a book or reading its content.
///
/// Pipeline failures carry the underlying cause as their source.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to open epub archive")]
    OpenFailed(#[source] anyhow::Error),

    #[error("not an epub archive")]
    NotEpub,

    #[error("root file not found")]
    RootFileNotFound(#[source] anyhow::Error),

    #[error("package document not found")]
    OpfNotFound(#[source] anyhow::Error),

    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),

    #[error("failed to read archive entry")]
    ReadFailed(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::error::Error as _;

    #[test]
    fn keeps_cause_as_source() {
        let err = Error::OpfNotFound(anyhow!("no entry named `OEBPS/content.opf`"));
        assert_eq!(err.to_string(), "package document not found");
        assert_eq!(
            err.source().map(|source| source.to_string()),
            Some(String::from("no entry named `OEBPS/content.opf`"))
        );
    }

    #[test]
    fn media_type_in_message() {
        let err = Error::UnsupportedMediaType(String::from("text/css"));
        assert_eq!(err.to_string(), "unsupported media type `text/css`");
    }
}
