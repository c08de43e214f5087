//! Password gate for project mutations

use crate::project::Project;

/// Exact equality against the stored password.
///
/// Passwords are stored and compared in plaintext.
pub fn check_password(project: &Project, supplied: &str) -> bool {
    project.password == supplied
}
