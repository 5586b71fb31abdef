use std::path::Path;

use thiserror::Error;

/// Marks a line in the repository list as a comment.
pub const COMMENT_PREFIX: char = '#';

#[derive(Debug, Error)]
pub enum ReadRepositoryListError {
    #[error("ReadRepositoryList: {path}: {source}")]
    ReadRepositoryList {
        path: String,
        source: std::io::Error,
    },
}

/// One repository per line; blank lines and `#` comments are dropped.
pub fn parse_repository_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(String::from)
        .collect()
}

pub fn read_repository_list(path: &Path) -> Result<Vec<String>, ReadRepositoryListError> {
    std::fs::read_to_string(path)
        .map(|contents| parse_repository_list(&contents))
        .map_err(|source| ReadRepositoryListError::ReadRepositoryList {
            path: path.display().to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_file_order_and_drops_blanks_and_comments() {
        let contents = "acme/widget\n\n# paused\n  rust-lang/rust  \n#acme/gadget\r\ntokio-rs/tokio\n";
        assert_eq!(
            parse_repository_list(contents),
            vec!["acme/widget", "rust-lang/rust", "tokio-rs/tokio"]
        );
    }

    #[test]
    fn empty_file_yields_nothing() {
        assert!(parse_repository_list("").is_empty());
        assert!(parse_repository_list("\n# only comments\n").is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_repository_list(Path::new("/definitely/not/here/repos.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/repos.txt"));
    }
}
