//! Name-based resolver backed by tree-sitter.
//!
//! Lookup parses the target file and picks the identifier node under the
//! offset. The definition is the closest preceding declaring occurrence of
//! the same name in that file. The search streams every same-named
//! identifier in files of the same language under the root. There are no
//! symbol tables and no scoping: two unrelated `x` are the same identifier
//! here.
//!
//! # Algorithm
//! 1. A walker thread enumerates candidate files with walkdir
//! 2. Paths are fanned out on a bounded channel to a pool of workers
//! 3. Each worker parses one file at a time and sends matches as it finds them
//! 4. The result channels close when the walker and every worker have exited

use crate::cancel::CancelToken;
use crate::error::{RefsError, Result};
use crate::ingest::detect::{detect_language, Language};
use crate::ingest::ParsedSource;
use crate::position::Position;
use crate::resolve::declarations::is_declaring;
use crate::resolve::{Identifier, Reference, ReferenceStreams, Resolver};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::thread;
use walkdir::{DirEntry, WalkDir};

/// Paths queued per worker before the walker blocks.
const PATHS_PER_WORKER: usize = 4;

/// Lexical resolver over tree-sitter grammars.
#[derive(Debug, Clone)]
pub struct TreeSitterResolver {
    jobs: usize,
}

impl TreeSitterResolver {
    /// Resolver that searches with `jobs` worker threads (at least one).
    pub fn new(jobs: usize) -> Self {
        Self { jobs: jobs.max(1) }
    }

    /// Number of search workers.
    pub fn jobs(&self) -> usize {
        self.jobs
    }
}

impl Default for TreeSitterResolver {
    fn default() -> Self {
        let jobs = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(jobs)
    }
}

impl Resolver for TreeSitterResolver {
    fn lookup(&self, file: &Path, offset: usize) -> Result<Identifier> {
        let parsed = ParsedSource::read(file)?;
        let identifiers = parsed.identifiers(None);

        let target = identifiers
            .iter()
            .find(|n| n.start_byte() <= offset && offset < n.end_byte())
            .or_else(|| identifiers.iter().find(|n| n.end_byte() == offset))
            .copied()
            .ok_or_else(|| RefsError::IdentifierNotFound {
                file: file.to_path_buf(),
                offset,
            })?;
        let name = parsed.text(target)?.to_string();

        let declaring: Vec<_> = parsed
            .identifiers(Some(name.as_str()))
            .into_iter()
            .filter(|n| is_declaring(*n, parsed.language))
            .collect();
        let definition = declaring
            .iter()
            .rev()
            .find(|n| n.start_byte() <= target.start_byte())
            .or_else(|| declaring.first())
            .copied()
            .unwrap_or(target);

        log::info!(
            "Resolved '{}' at offset {} in {}",
            name,
            offset,
            file.display()
        );

        Ok(Identifier {
            name,
            position: node_position(file, definition),
        })
    }

    fn find_references(
        &self,
        ident: &Identifier,
        root: &Path,
        recursive: bool,
        cancel: &CancelToken,
    ) -> ReferenceStreams {
        let (ref_tx, ref_rx) = unbounded();
        let (err_tx, err_rx) = unbounded();

        let language = match detect_language(&ident.position.filename) {
            Some(language) => language,
            None => {
                let _ = err_tx.send(RefsError::UnsupportedLanguage {
                    path: ident.position.filename.clone(),
                });
                return ReferenceStreams {
                    references: ref_rx,
                    errors: err_rx,
                };
            }
        };

        let target = SearchTarget {
            name: ident.name.clone(),
            definition_file: std::fs::canonicalize(&ident.position.filename)
                .unwrap_or_else(|_| ident.position.filename.clone()),
            definition_offset: ident.position.offset,
        };

        log::info!(
            "Searching {} for references to '{}' in .{} files ({} workers)",
            root.display(),
            target.name,
            language.extensions().collect::<Vec<_>>().join(", ."),
            self.jobs
        );

        let (path_tx, path_rx) = bounded(self.jobs * PATHS_PER_WORKER);
        spawn_walker(
            root.to_path_buf(),
            recursive,
            language,
            path_tx,
            err_tx.clone(),
            cancel.clone(),
        );
        for _ in 0..self.jobs {
            spawn_worker(
                target.clone(),
                path_rx.clone(),
                ref_tx.clone(),
                err_tx.clone(),
                cancel.clone(),
            );
        }

        ReferenceStreams {
            references: ref_rx,
            errors: err_rx,
        }
    }
}

/// What a worker matches against.
#[derive(Debug, Clone)]
struct SearchTarget {
    name: String,
    /// Canonical path of the definition's file.
    definition_file: PathBuf,
    definition_offset: usize,
}

impl SearchTarget {
    fn is_definition(&self, file: &Path, offset: usize) -> bool {
        offset == self.definition_offset
            && std::fs::canonicalize(file)
                .map(|p| p == self.definition_file)
                .unwrap_or(false)
    }
}

fn node_position(file: &Path, node: tree_sitter::Node<'_>) -> Position {
    let point = node.start_position();
    Position::new(file, node.start_byte(), point.row + 1, point.column + 1)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "target")
        .unwrap_or(false)
}

fn spawn_walker(
    root: PathBuf,
    recursive: bool,
    language: Language,
    paths: Sender<PathBuf>,
    errors: Sender<RefsError>,
    cancel: CancelToken,
) {
    thread::spawn(move || {
        let mut walker = WalkDir::new(&root).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        for entry in walker.into_iter().filter_entry(|e| !is_skipped_dir(e)) {
            if cancel.is_cancelled() {
                log::debug!("Walk of {} cancelled", root.display());
                return;
            }
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let _ = errors.send(RefsError::Walk(e));
                    continue;
                }
            };
            if !entry.file_type().is_file() || !language.matches(entry.path()) {
                continue;
            }
            if paths.send(entry.into_path()).is_err() {
                // Every worker is gone
                return;
            }
        }
    });
}

fn spawn_worker(
    target: SearchTarget,
    paths: Receiver<PathBuf>,
    references: Sender<Reference>,
    errors: Sender<RefsError>,
    cancel: CancelToken,
) {
    thread::spawn(move || {
        for path in paths.iter() {
            if cancel.is_cancelled() {
                return;
            }
            log::debug!("Scanning {}", path.display());
            if let Err(e) = scan_file(&path, &target, &references, &errors) {
                let _ = errors.send(e);
            }
        }
    });
}

fn scan_file(
    path: &Path,
    target: &SearchTarget,
    references: &Sender<Reference>,
    errors: &Sender<RefsError>,
) -> Result<()> {
    let parsed = ParsedSource::read(path)?;
    // Reported, but the recovered tree is still searched
    if let Some(point) = parsed.first_syntax_error() {
        let _ = errors.send(RefsError::Parse {
            file: path.to_path_buf(),
            message: format!(
                "syntax error at line {} column {}",
                point.row + 1,
                point.column + 1
            ),
        });
    }
    for node in parsed.identifiers(Some(target.name.as_str())) {
        if target.is_definition(path, node.start_byte()) {
            continue;
        }
        let reference = Reference {
            position: node_position(path, node),
        };
        if references.send(reference).is_err() {
            // Consumer hung up
            break;
        }
    }
    Ok(())
}
