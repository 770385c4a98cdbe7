use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Resolve the application home directory.
///
/// - `explicit`: a user-provided path; a leading `~` is expanded to the
///   platform home directory.
/// - `default_subdir`: subdirectory under the platform home used when no
///   explicit path is given (e.g. ".shopcore").
/// - `create`: create the resolved directory if it does not exist.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(p) => expand_tilde(&p)?,
        None => platform_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("Failed to create home dir '{}'", resolved.display()))?;
    }

    Ok(resolved)
}

/// Expand a leading `~` or `~/` into the platform home directory.
fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return platform_home();
    }
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

/// Platform home directory from the environment.
/// Windows: %APPDATA%; Unix/macOS: $HOME.
fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty() && p.is_absolute())
        .ok_or_else(|| anyhow!("Environment variable {} is not set to an absolute path", var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_absolute_path_kept() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("explicit_home");
        let resolved =
            resolve_home_dir(Some(p.to_string_lossy().to_string()), ".shopcore", true).unwrap();
        assert_eq!(resolved, p);
        assert!(resolved.exists());
    }

    #[test]
    fn test_tilde_expansion() {
        let tmp = tempdir().unwrap();
        #[cfg(target_os = "windows")]
        std::env::set_var("APPDATA", tmp.path());
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", tmp.path());

        let resolved =
            resolve_home_dir(Some("~/.tilde_test".to_string()), ".shopcore", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with(".tilde_test"));
    }

    #[test]
    fn test_default_subdir_under_platform_home() {
        let tmp = tempdir().unwrap();
        #[cfg(target_os = "windows")]
        std::env::set_var("APPDATA", tmp.path());
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", tmp.path());

        let resolved = resolve_home_dir(None, ".shopcore", true).unwrap();
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with(".shopcore"));
        assert!(resolved.exists());
    }
}
