//! Battle directory scanner
//!
//! Discovers candidate battles and entries on disk and hands them to the
//! core as plain descriptors. One subdirectory of the root = one battle;
//! audio files directly inside it = its entries. The scanner never touches
//! the store.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use soundclash_common::{ScannedBattle, ScannedEntry};

/// Battle scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified root does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Root exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// General I/O error during traversal
    #[error("I/O error: {0}")]
    Io(#[from] walkdir::Error),
}

/// Accepted entry file extensions (lowercased)
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

/// Scans a battles root directory into candidate descriptors.
pub struct BattleScanner {
    root: PathBuf,
}

impl BattleScanner {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Names of all battle subdirectories, sorted.
    pub fn battle_names(&self) -> Result<Vec<String>, ScanError> {
        self.check_root()?;

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if entry.file_type().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    /// Candidate entries for one battle, in filename order.
    pub fn scan_battle(&self, name: &str) -> Result<ScannedBattle, ScanError> {
        let dir = self.root.join(name);
        let mut battle = ScannedBattle {
            name: name.to_string(),
            entries: Vec::new(),
        };

        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(stem) = audio_stem(&filename) else {
                continue;
            };

            let (author, title) = parse_stem(stem);
            battle.entries.push(ScannedEntry {
                author,
                title,
                filename: filename.clone(),
                path: format!("{name}/{filename}"),
            });
        }

        Ok(battle)
    }

    /// Every battle with its candidate entries.
    pub fn scan_all(&self) -> Result<Vec<ScannedBattle>, ScanError> {
        let mut battles = Vec::new();
        for name in self.battle_names()? {
            battles.push(self.scan_battle(&name)?);
        }
        Ok(battles)
    }

    fn check_root(&self) -> Result<(), ScanError> {
        if !self.root.exists() {
            return Err(ScanError::PathNotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }
        Ok(())
    }
}

/// The filename stem when the extension is a known audio format.
fn audio_stem(filename: &str) -> Option<&str> {
    let path = Path::new(filename);
    let ext = path.extension()?.to_str()?.to_lowercase();
    if !AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    path.file_stem()?.to_str()
}

/// Derive (author, title) from a filename stem.
///
/// The first `-` splits author from title; without one the whole stem is
/// the title. Remaining `-`/`_` characters become spaces.
fn parse_stem(stem: &str) -> (String, String) {
    match stem.split_once('-') {
        Some((author, title)) => (clean(author), clean(title)),
        None => (String::new(), clean(stem)),
    }
}

fn clean(s: &str) -> String {
    s.chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(path: &Path) {
        fs::write(path, b"test").unwrap();
    }

    #[test]
    fn test_parse_stem_author_title() {
        assert_eq!(
            parse_stem("someone - first beat"),
            ("someone".to_string(), "first beat".to_string())
        );
        assert_eq!(
            parse_stem("dj_x-second_beat"),
            ("dj x".to_string(), "second beat".to_string())
        );
    }

    #[test]
    fn test_parse_stem_without_separator() {
        assert_eq!(parse_stem("untitled"), (String::new(), "untitled".to_string()));
    }

    #[test]
    fn test_audio_stem_filters_extensions() {
        assert_eq!(audio_stem("a.wav"), Some("a"));
        assert_eq!(audio_stem("a.MP3"), Some("a"));
        assert_eq!(audio_stem("notes.txt"), None);
        assert_eq!(audio_stem("noextension"), None);
    }

    #[test]
    fn test_scan_nonexistent_root() {
        let scanner = BattleScanner::new(PathBuf::from("/nonexistent/battles"));
        assert!(matches!(
            scanner.battle_names(),
            Err(ScanError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_scan_discovers_battles_and_entries() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("round-1")).unwrap();
        write_file(&root.join("round-1").join("alice - opener.wav"));
        write_file(&root.join("round-1").join("bob - reply.mp3"));
        write_file(&root.join("round-1").join("cover.jpg"));
        fs::create_dir(root.join("round-2")).unwrap();
        write_file(&root.join("stray.wav"));

        let scanner = BattleScanner::new(root.to_path_buf());
        let battles = scanner.scan_all().unwrap();

        assert_eq!(battles.len(), 2);
        assert_eq!(battles[0].name, "round-1");
        assert_eq!(battles[0].entries.len(), 2, "jpg is skipped");
        assert_eq!(battles[0].entries[0].author, "alice");
        assert_eq!(battles[0].entries[0].title, "opener");
        assert_eq!(battles[0].entries[0].path, "round-1/alice - opener.wav");
        assert_eq!(battles[1].name, "round-2");
        assert!(battles[1].entries.is_empty());
    }

    #[test]
    fn test_nested_files_are_not_entries() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        fs::create_dir_all(root.join("round-1").join("extras")).unwrap();
        write_file(&root.join("round-1").join("extras").join("deep.wav"));

        let scanner = BattleScanner::new(root.to_path_buf());
        let battles = scanner.scan_all().unwrap();
        assert!(battles[0].entries.is_empty());
    }
}
