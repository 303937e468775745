//! Word lists: parsing, caching and the bundled default set
//!
//! List format is `/`-separated text:
//! - line 1: `<tag>/<version>`
//! - line 2: column header, ignored
//! - every further line: `<word>/<hint>`

pub mod pool;

use crate::game::Word;
use once_cell::sync::Lazy;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use pool::{PoolState, WordPool};

/// Bundled list compiled into the binary.
static BUNDLED_DATA: &str = include_str!("../../data/words.csv");

/// Parsed bundled list; the two-word fallback if it fails to parse.
static BUNDLED: Lazy<WordList> = Lazy::new(|| {
    parse(BUNDLED_DATA).unwrap_or_else(|e| {
        warn!(error = %e, "bundled word list is unusable");
        WordList::fallback()
    })
});

/// Separator between fields on a line.
const SEPARATOR: char = '/';

/// Errors from reading or parsing a word list.
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("word list has no version header")]
    MissingVersion,
    #[error("word list contains no usable words")]
    Empty,
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),
}

/// Anything that hands out secret words for new rounds.
pub trait WordSource {
    /// The next word, never one with empty text.
    fn next_word(&mut self) -> Result<Word, WordListError>;
}

/// A versioned list of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    pub version: u32,
    pub words: Vec<Word>,
}

impl WordList {
    /// Last-resort list used when nothing else loads.
    pub fn fallback() -> Self {
        Self {
            version: 0,
            words: vec![
                Word::new("КОТ", "Какое животное мурлыкает и ловит мышей?"),
                Word::new("ДОМ", "Где человек прячется от дождя?"),
            ],
        }
    }

    /// The list shipped with the binary.
    pub fn bundled() -> &'static WordList {
        &BUNDLED
    }
}

/// Parse the list format. Rows without a usable word are skipped.
pub fn parse(text: &str) -> Result<WordList, WordListError> {
    let mut lines = text.lines();

    let version = lines
        .next()
        .and_then(|header| header.split(SEPARATOR).nth(1))
        .and_then(|field| field.trim().parse::<u32>().ok())
        .ok_or(WordListError::MissingVersion)?;

    // Column header
    lines.next();

    let mut words = Vec::new();
    for (number, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(word) => words.push(word),
            None => debug!(row = number + 3, "skipping unusable word row"),
        }
    }

    if words.is_empty() {
        return Err(WordListError::Empty);
    }
    Ok(WordList { version, words })
}

/// One `<word>/<hint>` row. Words are upper-cased and must be letters only.
fn parse_row(line: &str) -> Option<Word> {
    let (text, hint) = line.split_once(SEPARATOR)?;
    let text = text.trim().to_uppercase();
    if text.is_empty() || !text.chars().all(char::is_alphabetic) {
        return None;
    }
    Some(Word::new(text, hint.trim()))
}

/// Read and parse a list file.
pub fn read_list(path: &Path) -> Result<WordList, WordListError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Pick the word list for this run.
///
/// If `import` names a list newer than the cached one it replaces the cache.
/// The cached list is used when it is newer than the bundled one, otherwise
/// the bundled list. Failures fall through to the next option and never
/// abort.
pub fn load(cache_path: Option<&Path>, import: Option<&Path>) -> WordList {
    let mut cached = cache_path.and_then(|path| match read_list(path) {
        Ok(list) => Some(list),
        Err(WordListError::Io(e)) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "ignoring unreadable word cache");
            None
        }
    });

    if let Some(import) = import {
        match import_into_cache(import, cache_path, cached.as_ref()) {
            Ok(Some(list)) => cached = Some(list),
            Ok(None) => {}
            Err(e) => warn!(error = %e, path = %import.display(), "word list import failed"),
        }
    }

    let bundled = WordList::bundled();
    match cached {
        Some(list) if list.version > bundled.version => {
            info!(version = list.version, words = list.words.len(), "using cached word list");
            list
        }
        _ => {
            info!(
                version = bundled.version,
                words = bundled.words.len(),
                "using bundled word list"
            );
            bundled.clone()
        }
    }
}

/// Copy `import` over the cache when it is newer. Returns the new list if
/// it was taken.
fn import_into_cache(
    import: &Path,
    cache_path: Option<&Path>,
    cached: Option<&WordList>,
) -> Result<Option<WordList>, WordListError> {
    let text = fs::read_to_string(import)?;
    let list = parse(&text)?;

    if cached.is_some_and(|current| current.version >= list.version) {
        debug!(version = list.version, "import is not newer than the cache");
        return Ok(None);
    }

    if let Some(path) = cache_path {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, &text)?;
    }
    info!(version = list.version, words = list.words.len(), "imported word list");
    Ok(Some(list))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_text(version: u32, rows: &[&str]) -> String {
        let mut text = format!("version/{}\nword/hint\n", version);
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_basic_list() {
        let list = parse(&list_text(3, &["кот/мурлычет", "ДОМ/крыша"])).unwrap();
        assert_eq!(list.version, 3);
        assert_eq!(list.words.len(), 2);
        assert_eq!(list.words[0], Word::new("КОТ", "мурлычет"));
        assert_eq!(list.words[1].text, "ДОМ");
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let list = parse(&list_text(1, &["", "/no word", "ДВА СЛОВА/x", "Р2Д2/x", "norow", "ЛЕС/деревья"]))
            .unwrap();
        assert_eq!(list.words, vec![Word::new("ЛЕС", "деревья")]);
    }

    #[test]
    fn test_parse_missing_version() {
        assert!(matches!(
            parse("words\nword/hint\nКОТ/x\n"),
            Err(WordListError::MissingVersion)
        ));
        assert!(matches!(parse(""), Err(WordListError::MissingVersion)));
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(matches!(
            parse(&list_text(2, &[])),
            Err(WordListError::Empty)
        ));
    }

    #[test]
    fn test_bundled_list_is_usable() {
        let list = WordList::bundled();
        assert!(list.version >= 1);
        assert!(list.words.len() > 30);
        assert!(list.words.iter().all(|w| !w.is_empty()));
        assert!(list
            .words
            .iter()
            .all(|w| w.text.chars().all(char::is_alphabetic)));
    }

    #[test]
    fn test_load_without_cache_uses_bundled() {
        let list = load(None, None);
        assert_eq!(&list, WordList::bundled());
    }

    #[test]
    fn test_load_prefers_newer_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("words.csv");
        fs::write(&cache, list_text(99, &["ЛЕС/деревья"])).unwrap();

        let list = load(Some(&cache), None);
        assert_eq!(list.version, 99);
        assert_eq!(list.words[0].text, "ЛЕС");
    }

    #[test]
    fn test_load_ignores_older_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("words.csv");
        fs::write(&cache, list_text(0, &["ЛЕС/деревья"])).unwrap();

        assert_eq!(&load(Some(&cache), None), WordList::bundled());
    }

    #[test]
    fn test_load_ignores_corrupt_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("words.csv");
        fs::write(&cache, "garbage").unwrap();

        assert_eq!(&load(Some(&cache), None), WordList::bundled());
    }

    #[test]
    fn test_import_newer_list_replaces_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache").join("words.csv");
        let import = dir.path().join("import.csv");
        fs::write(&import, list_text(50, &["РЕКА/течет"])).unwrap();

        let list = load(Some(&cache), Some(&import));
        assert_eq!(list.version, 50);
        assert_eq!(read_list(&cache).unwrap().version, 50);
    }

    #[test]
    fn test_import_older_list_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("words.csv");
        let import = dir.path().join("import.csv");
        fs::write(&cache, list_text(60, &["ЛЕС/деревья"])).unwrap();
        fs::write(&import, list_text(40, &["РЕКА/течет"])).unwrap();

        let list = load(Some(&cache), Some(&import));
        assert_eq!(list.version, 60);
        assert_eq!(list.words[0].text, "ЛЕС");
    }

    #[test]
    fn test_missing_import_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let import = dir.path().join("absent.csv");
        assert_eq!(&load(None, Some(&import)), WordList::bundled());
    }

    #[test]
    fn test_fallback_list() {
        let list = WordList::fallback();
        assert_eq!(list.words.len(), 2);
        assert_eq!(list.words[0].text, "КОТ");
    }
}
