//! Sorting submission files into per-user directories.
//!
//! Every submission under a source tree is moved to
//! `<target>/<sanitized username>/<file name>`. A name already taken in the
//! user's directory gets a numeric suffix (`paper_1.json`, `paper_2.json`, ...).
//! Failures are recorded per file and never stop the batch.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::OrganizeConfig;
use crate::submission::{load_document, DocumentFormat, SubmissionError};
use crate::validator::is_username_char;

/// Options for the organize operation.
#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    /// Exact file names that are never relocated
    pub preserved_files: Vec<String>,
    /// Stem marker (case-insensitive) for example files that are never relocated
    pub example_marker: String,
    /// Placeholder files skipped without a message
    pub ignored_files: Vec<String>,
    /// Plan destinations without touching the filesystem
    pub dry_run: bool,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self::from_config(&OrganizeConfig::default())
    }
}

impl OrganizeOptions {
    pub fn from_config(config: &OrganizeConfig) -> Self {
        Self {
            preserved_files: config.preserved_files.clone(),
            example_marker: config.example_marker.clone(),
            ignored_files: config.ignored_files.clone(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Why a file was left where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Placeholder such as `.gitkeep`
    Ignored,
    /// One of the preserved example files
    Preserved,
    /// Stem contains the example marker
    Example,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored => write!(f, "placeholder file"),
            Self::Preserved => write!(f, "preserved example file"),
            Self::Example => write!(f, "example file"),
        }
    }
}

/// Per-file failure during organize.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error(transparent)]
    Load(#[from] SubmissionError),

    #[error("No username found in {}", path.display())]
    MissingUsername { path: PathBuf },

    #[error("Invalid username: {username}")]
    InvalidUsername { username: String },

    #[error("Error moving file to {}: {source}", to.display())]
    Move {
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    Skipped {
        path: PathBuf,
        reason: SkipReason,
    },
    /// Moved (or, in a dry run, planned to move)
    Moved {
        from: PathBuf,
        to: PathBuf,
        username: String,
    },
    Failed {
        path: PathBuf,
        error: OrganizeError,
    },
}

/// A user directory and how many files it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDirectory {
    pub name: String,
    pub file_count: usize,
}

/// Result of an organize run, in traversal order.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub outcomes: Vec<FileOutcome>,
    pub dry_run: bool,
}

impl OrganizeReport {
    /// Number of files moved (or planned).
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Moved { .. }))
            .count()
    }

    /// Number of files that failed.
    pub fn errors(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }

    /// Planned destinations grouped by user directory, sorted by name.
    pub fn moved_by_user(&self) -> Vec<UserDirectory> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for outcome in &self.outcomes {
            if let FileOutcome::Moved { username, .. } = outcome {
                *counts.entry(username.as_str()).or_default() += 1;
            }
        }
        counts
            .into_iter()
            .map(|(name, file_count)| UserDirectory {
                name: name.to_string(),
                file_count,
            })
            .collect()
    }
}

/// Reduce a username to characters safe for a directory name.
pub fn sanitize_username(username: &str) -> String {
    username.chars().filter(|c| is_username_char(*c)).collect()
}

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, ... to the
/// stem on collision.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    unique_destination_with(dir, file_name, |p| p.exists())
}

fn unique_destination_with(
    dir: &Path,
    file_name: &str,
    is_taken: impl Fn(&Path) -> bool,
) -> PathBuf {
    let candidate = dir.join(file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, suffix));
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Copy a file with its permissions and modification time, then remove the source.
/// On failure after the copy, the copy is removed again so nothing is duplicated.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;

    let finish = || -> io::Result<()> {
        let modified = fs::metadata(from)?.modified()?;
        // The copy may already be read-only; the owner can set times through a read handle.
        fs::File::open(to)?.set_modified(modified)?;
        fs::remove_file(from)
    };

    finish().map_err(|err| {
        let _ = fs::remove_file(to);
        err
    })
}

/// List every directory under `target` with its visible file count, sorted by name.
pub fn summarize_target(target: &Path) -> Result<Vec<UserDirectory>> {
    let mut users = Vec::new();
    if !target.is_dir() {
        return Ok(users);
    }

    for entry in fs::read_dir(target)
        .with_context(|| format!("Failed to read target directory {}", target.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let file_count = fs::read_dir(entry.path())?
            .filter_map(|e| e.ok())
            // Hidden entries such as .gitkeep are not submissions
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .count();

        users.push(UserDirectory {
            name: entry.file_name().to_string_lossy().to_string(),
            file_count,
        });
    }

    users.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(users)
}

/// Moves submission files into per-user directories.
#[derive(Debug, Clone, Default)]
pub struct Organizer {
    options: OrganizeOptions,
}

impl Organizer {
    pub fn new(options: OrganizeOptions) -> Self {
        Self { options }
    }

    /// Why a file must stay in place, if it must.
    pub fn skip_reason(&self, path: &Path) -> Option<SkipReason> {
        let name = path.file_name()?.to_string_lossy();

        if self.options.ignored_files.iter().any(|f| *f == name) {
            return Some(SkipReason::Ignored);
        }
        if self.options.preserved_files.iter().any(|f| *f == name) {
            return Some(SkipReason::Preserved);
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if stem.contains(&self.options.example_marker.to_lowercase()) {
            return Some(SkipReason::Example);
        }

        None
    }

    /// Organize every submission under `source` into `target`.
    ///
    /// Errors only when the run cannot start; per-file failures land in the report.
    pub fn organize(&self, source: &Path, target: &Path) -> Result<OrganizeReport> {
        if !source.is_dir() {
            anyhow::bail!("Source directory '{}' does not exist", source.display());
        }

        if !self.options.dry_run {
            fs::create_dir_all(target).with_context(|| {
                format!("Failed to create target directory {}", target.display())
            })?;
        }

        // Collect up front so files moved into a target nested under source
        // are not visited again.
        let entries: Vec<_> = WalkDir::new(source)
            .sort_by_file_name()
            .into_iter()
            .collect();

        let mut report = OrganizeReport {
            outcomes: Vec::new(),
            dry_run: self.options.dry_run,
        };
        let mut planned: HashSet<PathBuf> = HashSet::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(source).to_path_buf();
                    report.outcomes.push(FileOutcome::Failed {
                        path,
                        error: err.into(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();

            if let Some(reason) = self.skip_reason(path) {
                report.outcomes.push(FileOutcome::Skipped {
                    path: path.to_path_buf(),
                    reason,
                });
                continue;
            }

            if !DocumentFormat::is_submission_path(path) {
                continue;
            }

            let outcome = match self.organize_file(path, target, &mut planned) {
                Ok((to, username)) => FileOutcome::Moved {
                    from: path.to_path_buf(),
                    to,
                    username,
                },
                Err(error) => FileOutcome::Failed {
                    path: path.to_path_buf(),
                    error,
                },
            };
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    fn organize_file(
        &self,
        path: &Path,
        target: &Path,
        planned: &mut HashSet<PathBuf>,
    ) -> Result<(PathBuf, String), OrganizeError> {
        let document = load_document(path)?;

        let username = document
            .username_text()
            .ok_or_else(|| OrganizeError::MissingUsername {
                path: path.to_path_buf(),
            })?;

        let safe_username = sanitize_username(&username);
        if safe_username.is_empty() {
            return Err(OrganizeError::InvalidUsername { username });
        }

        let user_dir = target.join(&safe_username);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if self.options.dry_run {
            let destination = unique_destination_with(&user_dir, &file_name, |p| {
                p.exists() || planned.contains(p)
            });
            planned.insert(destination.clone());
            return Ok((destination, safe_username));
        }

        fs::create_dir_all(&user_dir).map_err(|source| OrganizeError::Move {
            to: user_dir.clone(),
            source,
        })?;

        let destination = unique_destination(&user_dir, &file_name);
        move_file(path, &destination).map_err(|source| OrganizeError::Move {
            to: destination.clone(),
            source,
        })?;

        Ok((destination, safe_username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn json_for(username: &str) -> String {
        format!(r#"{{"username": "{}", "paper_title": "T"}}"#, username)
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("alice"), "alice");
        assert_eq!(sanitize_username("a.b c/d"), "abcd");
        assert_eq!(sanitize_username("x-y_z9"), "x-y_z9");
        assert_eq!(sanitize_username("@@!"), "");
    }

    #[test]
    fn test_unique_destination_appends_counter() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();

        assert_eq!(unique_destination(dir, "paper.json"), dir.join("paper.json"));

        fs::write(dir.join("paper.json"), "{}").unwrap();
        assert_eq!(
            unique_destination(dir, "paper.json"),
            dir.join("paper_1.json")
        );

        fs::write(dir.join("paper_1.json"), "{}").unwrap();
        assert_eq!(
            unique_destination(dir, "paper.json"),
            dir.join("paper_2.json")
        );
    }

    #[test]
    fn test_skip_reason() {
        let organizer = Organizer::default();
        assert_eq!(
            organizer.skip_reason(Path::new("s/example_submission_in.json")),
            Some(SkipReason::Preserved)
        );
        assert_eq!(
            organizer.skip_reason(Path::new("s/we_also_accept_submission_in.yaml")),
            Some(SkipReason::Preserved)
        );
        assert_eq!(
            organizer.skip_reason(Path::new("s/My_Example_Submission_v2.yml")),
            Some(SkipReason::Example)
        );
        assert_eq!(
            organizer.skip_reason(Path::new("s/.gitkeep")),
            Some(SkipReason::Ignored)
        );
        assert_eq!(organizer.skip_reason(Path::new("s/alice.json")), None);
    }

    #[test]
    fn test_organize_moves_by_username() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("a.json"), &json_for("alice"));
        write(&source.join("nested/b.yaml"), "username: bob\n");
        write(&source.join("notes.txt"), "not a submission");

        let report = Organizer::default().organize(&source, &target).unwrap();
        assert_eq!(report.processed(), 2);
        assert_eq!(report.errors(), 0);

        assert!(target.join("alice/a.json").exists());
        assert!(target.join("bob/b.yaml").exists());
        assert!(!source.join("a.json").exists());
        assert!(!source.join("nested/b.yaml").exists());
        // Non-submission files are left alone
        assert!(source.join("notes.txt").exists());

        let users = summarize_target(&target).unwrap();
        assert_eq!(
            users,
            vec![
                UserDirectory {
                    name: "alice".into(),
                    file_count: 1
                },
                UserDirectory {
                    name: "bob".into(),
                    file_count: 1
                },
            ]
        );
    }

    #[test]
    fn test_organize_collision_keeps_both_files() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("first/paper.json"), &json_for("carol"));
        write(&source.join("second/paper.json"), &json_for("carol"));

        let report = Organizer::default().organize(&source, &target).unwrap();
        assert_eq!(report.processed(), 2);

        assert!(target.join("carol/paper.json").exists());
        assert!(target.join("carol/paper_1.json").exists());
        assert_eq!(summarize_target(&target).unwrap()[0].file_count, 2);
    }

    #[test]
    fn test_organize_never_moves_example_files() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("example_submission_in.json"), &json_for("example"));
        write(&source.join("old_example_submission.yaml"), "username: example\n");
        write(&source.join(".gitkeep"), "");

        let report = Organizer::default().organize(&source, &target).unwrap();
        assert_eq!(report.processed(), 0);
        assert_eq!(report.errors(), 0);
        assert!(source.join("example_submission_in.json").exists());
        assert!(source.join("old_example_submission.yaml").exists());
        assert!(source.join(".gitkeep").exists());
        assert!(summarize_target(&target).unwrap().is_empty());
    }

    #[test]
    fn test_organize_isolates_failures() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("1_broken.json"), "{ not json");
        write(&source.join("2_nouser.json"), r#"{"paper_title": "T"}"#);
        write(&source.join("3_blank.yaml"), "username: '   '\n");
        write(&source.join("4_symbols.json"), &json_for("@@@"));
        write(&source.join("5_good.json"), &json_for("dave"));

        let report = Organizer::default().organize(&source, &target).unwrap();
        assert_eq!(report.errors(), 4);
        assert_eq!(report.processed(), 1);
        assert!(target.join("dave/5_good.json").exists());

        let failures: Vec<&OrganizeError> = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed { error, .. } => Some(error),
                _ => None,
            })
            .collect();
        assert!(matches!(failures[0], OrganizeError::Load(_)));
        assert!(matches!(failures[1], OrganizeError::MissingUsername { .. }));
        assert!(matches!(failures[2], OrganizeError::MissingUsername { .. }));
        assert!(matches!(failures[3], OrganizeError::InvalidUsername { .. }));

        // Failed files stay in place
        assert!(source.join("1_broken.json").exists());
    }

    #[test]
    fn test_organize_sanitizes_directory_name() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("x.json"), &json_for("  eve.smith  "));

        Organizer::default().organize(&source, &target).unwrap();
        assert!(target.join("evesmith/x.json").exists());
    }

    #[test]
    fn test_organize_preserves_modification_time() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");
        let file = source.join("old.json");
        write(&file, &json_for("frank"));

        let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000);
        fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(old)
            .unwrap();

        Organizer::default().organize(&source, &target).unwrap();
        let moved = fs::metadata(target.join("frank/old.json")).unwrap();
        assert_eq!(moved.modified().unwrap(), old);
    }

    #[test]
    fn test_summarize_target_skips_hidden_entries() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("zoe/a.json"), "{}");
        write(&tmp.path().join("zoe/.gitkeep"), "");
        write(&tmp.path().join("adam/.gitkeep"), "");
        write(&tmp.path().join("stray.json"), "{}");

        let users = summarize_target(tmp.path()).unwrap();
        assert_eq!(
            users,
            vec![
                UserDirectory {
                    name: "adam".to_string(),
                    file_count: 0
                },
                UserDirectory {
                    name: "zoe".to_string(),
                    file_count: 1
                },
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_organize_moves_read_only_file() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");
        let file = source.join("ro.json");
        write(&file, &json_for("rita"));
        fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();

        let report = Organizer::default().organize(&source, &target).unwrap();

        assert_eq!(report.errors(), 0, "{:?}", report.outcomes);
        assert!(!file.exists());
        let moved = fs::metadata(target.join("rita/ro.json")).unwrap();
        assert_eq!(moved.permissions().mode() & 0o777, 0o444);
    }

    #[cfg(unix)]
    #[test]
    fn test_organize_records_move_failure_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");
        let locked = source.join("a_locked");
        write(&locked.join("stuck.json"), &json_for("sam"));
        write(&source.join("b_open.json"), &json_for("sam"));

        // Removing from a read-only directory fails, unless permissions are not enforced.
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();
        if fs::write(locked.join("writable_check"), "").is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = Organizer::default().organize(&source, &target).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(report.errors(), 1);
        assert_eq!(report.processed(), 1);
        assert!(matches!(
            &report.outcomes[0],
            FileOutcome::Failed {
                error: OrganizeError::Move { .. },
                ..
            }
        ));
        assert!(locked.join("stuck.json").exists());
        assert!(target.join("sam/b_open.json").exists());
        // The half-finished copy was cleaned up
        assert!(!target.join("sam/stuck.json").exists());
        assert_eq!(summarize_target(&target).unwrap()[0].file_count, 1);
    }

    #[test]
    fn test_dry_run_plans_without_moving() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("submissions");
        let target = tmp.path().join("organized");

        write(&source.join("a/paper.json"), &json_for("gina"));
        write(&source.join("b/paper.json"), &json_for("gina"));

        let organizer = Organizer::new(OrganizeOptions::default().dry_run(true));
        let report = organizer.organize(&source, &target).unwrap();

        assert!(report.dry_run);
        assert_eq!(report.processed(), 2);
        assert!(!target.exists());
        assert!(source.join("a/paper.json").exists());

        let destinations: Vec<&PathBuf> = report
            .outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Moved { to, .. } => Some(to),
                _ => None,
            })
            .collect();
        assert_eq!(destinations[0], &target.join("gina/paper.json"));
        assert_eq!(destinations[1], &target.join("gina/paper_1.json"));
        assert_eq!(
            report.moved_by_user(),
            vec![UserDirectory {
                name: "gina".into(),
                file_count: 2
            }]
        );
    }

    #[test]
    fn test_missing_source_directory() {
        let tmp = TempDir::new().unwrap();
        let result = Organizer::default().organize(&tmp.path().join("nope"), tmp.path());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
