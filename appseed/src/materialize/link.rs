//! Symbolic link creation

use std::io;
use std::path::Path;

/// What the link points at; Windows needs to know up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Link to a directory
    Dir,
    /// Link to a file
    File,
}

/// Failure creating a link
#[derive(Debug)]
pub enum LinkError {
    /// The OS refused for lack of privileges
    PermissionDenied(io::Error),
    /// Any other IO failure
    Other(io::Error),
}

/// Windows `ERROR_PRIVILEGE_NOT_HELD`, raised without developer mode
#[cfg(windows)]
const PRIVILEGE_ERROR: i32 = 1314;

/// `EPERM`; `EACCES` on the parent directory is an ordinary IO failure
#[cfg(not(windows))]
const PRIVILEGE_ERROR: i32 = 1;

impl From<io::Error> for LinkError {
    fn from(err: io::Error) -> Self {
        if err.raw_os_error() == Some(PRIVILEGE_ERROR) {
            Self::PermissionDenied(err)
        } else {
            Self::Other(err)
        }
    }
}

/// Create a symbolic link at `dst` pointing to `src`
///
/// # Errors
///
/// Returns [`LinkError::PermissionDenied`] when the OS refuses the link for
/// lack of privileges, [`LinkError::Other`] otherwise.
pub fn symlink(src: &Path, dst: &Path, kind: LinkKind) -> Result<(), LinkError> {
    create(src, dst, kind).map_err(LinkError::from)
}

#[cfg(unix)]
fn create(src: &Path, dst: &Path, _kind: LinkKind) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn create(src: &Path, dst: &Path, kind: LinkKind) -> io::Result<()> {
    match kind {
        LinkKind::Dir => std::os::windows::fs::symlink_dir(src, dst),
        LinkKind::File => std::os::windows::fs::symlink_file(src, dst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_error_is_tagged() {
        let err = LinkError::from(io::Error::from_raw_os_error(PRIVILEGE_ERROR));
        assert!(matches!(err, LinkError::PermissionDenied(_)));

        let err = LinkError::from(io::Error::from(io::ErrorKind::AlreadyExists));
        assert!(matches!(err, LinkError::Other(_)));
    }

    #[test]
    fn test_access_denied_without_privilege_code_is_other() {
        let err = LinkError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, LinkError::Other(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_eacces_is_other() {
        // EACCES
        let err = LinkError::from(io::Error::from_raw_os_error(13));
        assert!(matches!(err, LinkError::Other(_)));
    }

    #[cfg(windows)]
    #[test]
    fn test_access_denied_is_other() {
        // ERROR_ACCESS_DENIED
        let err = LinkError::from(io::Error::from_raw_os_error(5));
        assert!(matches!(err, LinkError::Other(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_unwritable_parent_is_not_a_privilege_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

        let result = symlink(temp.path(), &locked.join("link"), LinkKind::Dir);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Root ignores directory permissions
        if let Err(err) = result {
            assert!(matches!(err, LinkError::Other(_)));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_points_at_source() {
        let temp = tempfile::TempDir::new().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir(&src).unwrap();
        let dst = temp.path().join("dst");

        symlink(&src, &dst, LinkKind::Dir).unwrap();
        assert_eq!(std::fs::read_link(&dst).unwrap(), src);
    }
}
