//! Shell activation for a repository
//!
//! `setup` writes `.activate_knowledge.sh` into the repository root and,
//! optionally, appends a hook to a shell profile so that every new shell
//! started inside the repository refreshes the snapshot.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use kb_fs::KbPath;

use crate::{Error, Result};

/// First line of the profile block; its presence makes installation idempotent.
pub const PROFILE_MARKER: &str = "# >>> knowledge base auto-update >>>";
const PROFILE_END: &str = "# <<< knowledge base auto-update <<<";

/// What happened to the shell profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileHook {
    Installed,
    AlreadyPresent,
    ProfileMissing,
}

impl fmt::Display for ProfileHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => write!(f, "installed"),
            Self::AlreadyPresent => write!(f, "already present"),
            Self::ProfileMissing => write!(f, "profile not found"),
        }
    }
}

/// Result of [`install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub script: PathBuf,
    /// `None` when no profile was requested
    pub profile: Option<(PathBuf, ProfileHook)>,
}

/// Quote `s` for a POSIX shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Contents of the activation script.
pub fn activation_script(repo_root: &Path, program: &str) -> String {
    let root = shell_quote(&repo_root.display().to_string());
    let program = shell_quote(program);
    format!(
        "#!/bin/sh\n\
         # Load the knowledge base for this repository.\n\
         cd {root} || exit 1\n\
         exec {program} --repo-root {root} load \"$@\"\n"
    )
}

/// Marker-guarded block appended to a shell profile.
pub fn profile_hook(repo_root: &Path, program: &str) -> String {
    let root = shell_quote(&repo_root.display().to_string());
    let program = shell_quote(program);
    format!(
        "\n{PROFILE_MARKER}\n\
         case \"$PWD/\" in\n\
         \x20 {root}/*) {program} --repo-root {root} update --quiet ;;\n\
         esac\n\
         {PROFILE_END}\n"
    )
}

/// The profile used when none is given: `~/.bashrc`.
pub fn default_profile() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bashrc"))
}

/// Write the activation script and optionally hook it into `profile`.
///
/// A missing profile file is reported, not created.
///
/// # Errors
///
/// Returns [`Error::Activation`] if the script or profile cannot be written.
pub fn install(repo_root: &Path, program: &str, profile: Option<&Path>) -> Result<Activation> {
    let script = repo_root.join(KbPath::ActivationScript.as_str());

    fs::write(&script, activation_script(repo_root, program)).map_err(activation_error(&script))?;
    make_executable(&script).map_err(activation_error(&script))?;
    tracing::info!(path = %script.display(), "activation script written");

    let profile = match profile {
        None => None,
        Some(path) => {
            let outcome = hook_profile(path, repo_root, program).map_err(activation_error(path))?;
            tracing::debug!(path = %path.display(), %outcome, "profile hook");
            Some((path.to_path_buf(), outcome))
        }
    };

    Ok(Activation { script, profile })
}

fn activation_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::Activation { path, source }
}

fn hook_profile(profile: &Path, repo_root: &Path, program: &str) -> std::io::Result<ProfileHook> {
    if !profile.is_file() {
        return Ok(ProfileHook::ProfileMissing);
    }
    let existing = fs::read_to_string(profile)?;
    let root = shell_quote(&repo_root.display().to_string());
    let already = existing
        .split(PROFILE_MARKER)
        .skip(1)
        .any(|block| block.split(PROFILE_END).next().is_some_and(|b| b.contains(&root)));
    if already {
        return Ok(ProfileHook::AlreadyPresent);
    }

    let mut content = existing;
    content.push_str(&profile_hook(repo_root, program));
    fs::write(profile, content)?;
    Ok(ProfileHook::Installed)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
