use mvc_diff::LineDiff;
use mvc_types::RepoPath;

use crate::error::CheckoutResult;

/// Read and write access to the working tree.
pub trait WorkingFiles {
    /// Current text of `path`, or `None` if the file does not exist.
    fn read_text(&self, path: &RepoPath) -> CheckoutResult<Option<String>>;

    /// Write `content` to `path`, creating intermediate directories.
    fn write_text(&self, path: &RepoPath, content: &str) -> CheckoutResult<()>;
}

/// Asks whether a differing working file may be overwritten.
///
/// The implementation is expected to show `preview` to the user. Returning
/// `false`, including when no answer can be read, keeps the file as it is.
pub trait ConfirmOverwrite {
    fn confirm(&mut self, path: &RepoPath, preview: &LineDiff) -> bool;
}

impl<F> ConfirmOverwrite for F
where
    F: FnMut(&RepoPath, &LineDiff) -> bool,
{
    fn confirm(&mut self, path: &RepoPath, preview: &LineDiff) -> bool {
        self(path, preview)
    }
}
