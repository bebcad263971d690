//! The project index.
//!
//! `ProjectIndex` owns the file cache and four maps keyed by module URI:
//! parsed modules, symbols, import edges, and the derived name map
//! (`defs_by_name`). The maps live in one `IndexState` behind one `RwLock`,
//! so a reader never sees a URI in some maps but not others.
//!
//! ## Build pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           build()                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Walk       (sequential): discover files, apply ignore rules  │
//! │  Parse      (rayon):      read via cache, parse, extract      │
//! │  Publish    (write lock): replace maps, rebuild name map once │
//! │  Signal:                  phase = Ready, open the ready gate  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsing happens with no index lock held. Builds are serialized with each
//! other by a separate mutex; `invalidate` and `rebuild` only take the write
//! lock for their final update.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::FileCache;
use crate::config::IndexConfig;
use crate::error::{Error, IndexError, IndexErrorKind, Result};
use crate::gate::ReadyGate;
use crate::imports::import_edges;
use crate::parser::{ParsedModule, PythonParser};
use crate::symbols::document_symbols;
use crate::types::{Definition, ImportEdge, IndexPhase, IndexStats, Symbol};
use crate::uri::{path_to_uri, uri_to_path};
use crate::walker::discover_files;

/// Everything extracted from one file, ready to insert.
#[derive(Debug)]
struct IndexedFile {
    uri: String,
    module: Arc<ParsedModule>,
    symbols: Vec<Symbol>,
    imports: Vec<ImportEdge>,
}

/// The four maps plus the statistics of the last full build.
#[derive(Debug, Default)]
struct IndexState {
    modules: HashMap<String, Arc<ParsedModule>>,
    symbols: HashMap<String, Vec<Symbol>>,
    imports: HashMap<String, Vec<ImportEdge>>,
    defs_by_name: HashMap<String, Vec<Definition>>,
    stats: IndexStats,
}

impl IndexState {
    fn insert(&mut self, file: IndexedFile) {
        self.modules.insert(file.uri.clone(), file.module);
        self.symbols.insert(file.uri.clone(), file.symbols);
        self.imports.insert(file.uri, file.imports);
    }

    /// Remove `uri` from the per-file maps. Returns whether it was indexed.
    fn remove(&mut self, uri: &str) -> bool {
        let had_module = self.modules.remove(uri).is_some();
        let had_symbols = self.symbols.remove(uri).is_some();
        let had_imports = self.imports.remove(uri).is_some();
        had_module || had_symbols || had_imports
    }

    /// Recompute `defs_by_name` from `symbols`.
    ///
    /// Each symbol is reachable by its bare name and, when it has a
    /// container, by its qualified name. Entries are ordered by URI, then by
    /// position in the file.
    fn rebuild_definitions(&mut self) {
        let mut uris: Vec<&String> = self.symbols.keys().collect();
        uris.sort();

        let mut defs: HashMap<String, Vec<Definition>> = HashMap::new();
        for uri in uris {
            for symbol in &self.symbols[uri] {
                let definition = Definition {
                    uri: uri.clone(),
                    symbol: symbol.clone(),
                };
                if symbol.container.is_some() {
                    defs.entry(symbol.qualified_name())
                        .or_default()
                        .push(definition.clone());
                }
                defs.entry(symbol.name.clone()).or_default().push(definition);
            }
        }
        self.defs_by_name = defs;
    }
}

/// In-memory code intelligence index for one Python project.
///
/// Shared as `Arc<ProjectIndex>`; every method takes `&self`.
#[derive(Debug)]
pub struct ProjectIndex {
    root: PathBuf,
    config: IndexConfig,
    cache: FileCache,
    state: RwLock<IndexState>,
    build_lock: Mutex<()>,
    phase: Mutex<IndexPhase>,
    gate: ReadyGate,
}

impl ProjectIndex {
    /// Create an empty index for `root` with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` doesn't exist or isn't a directory, or if
    /// the Python grammar can't be loaded.
    pub fn new(root: &Path) -> Result<Self> {
        Self::with_config(root, IndexConfig::default())
    }

    /// Create an empty index for `root`, reading `<root>/.rhea.yaml` if present.
    ///
    /// # Errors
    ///
    /// Same as [`ProjectIndex::new`], plus `Error::Config` for a malformed
    /// configuration file.
    pub fn open(root: &Path) -> Result<Self> {
        let root = canonical_root(root)?;
        let config = IndexConfig::load_or_default(&root)?;
        Self::with_config(&root, config)
    }

    /// Create an empty index for `root` with explicit configuration.
    ///
    /// Nothing is read from disk until [`ProjectIndex::build`].
    ///
    /// # Errors
    ///
    /// Same as [`ProjectIndex::new`].
    pub fn with_config(root: &Path, config: IndexConfig) -> Result<Self> {
        let root = canonical_root(root)?;
        // Surface grammar problems here instead of once per file.
        PythonParser::new()?;

        Ok(Self {
            root,
            config,
            cache: FileCache::new(),
            state: RwLock::new(IndexState::default()),
            build_lock: Mutex::new(()),
            phase: Mutex::new(IndexPhase::Empty),
            gate: ReadyGate::new(),
        })
    }

    // === Building ===

    /// Index every eligible file under the root, replacing the previous index.
    ///
    /// Per-file read and parse failures are counted in the returned
    /// statistics; they never abort the build. Concurrent calls run one
    /// after the other.
    pub fn build(&self) -> IndexStats {
        let _build = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        self.set_phase(IndexPhase::Building);

        let files = discover_files(&self.root, &self.config);
        debug!(files = files.len(), root = %self.root.display(), "Discovered source files");

        let mut indexed = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        for outcome in self.parse_files(&files) {
            match outcome {
                Ok(file) => indexed.push(file),
                Err(error) => errors.push(error),
            }
        }
        errors.sort_by(|a, b| a.path.cmp(&b.path));

        let stats = IndexStats {
            files_indexed: indexed.len(),
            parse_errors: errors.len(),
            errors,
        };

        {
            let mut state = self.write();
            let vanished: Vec<String> = {
                let live: HashSet<&str> = indexed.iter().map(|f| f.uri.as_str()).collect();
                state
                    .modules
                    .keys()
                    .filter(|uri| !live.contains(uri.as_str()))
                    .cloned()
                    .collect()
            };

            *state = IndexState::default();
            for file in indexed {
                state.insert(file);
            }
            state.stats = stats.clone();
            state.rebuild_definitions();

            for path in vanished.iter().filter_map(|uri| uri_to_path(uri).ok()) {
                self.cache.invalidate(&path);
            }
        }

        self.set_phase(IndexPhase::Ready);
        self.gate.open();

        info!(
            files_indexed = stats.files_indexed,
            parse_errors = stats.parse_errors,
            duration_ms = duration_ms(start.elapsed()),
            "Index build complete"
        );
        stats
    }

    /// Run [`ProjectIndex::build`] on a background thread.
    pub fn spawn_build(self: &Arc<Self>) -> JoinHandle<IndexStats> {
        let index = Arc::clone(self);
        std::thread::spawn(move || index.build())
    }

    /// Drop `uri` from the index and its file from the cache.
    ///
    /// Returns whether the URI was indexed.
    pub fn invalidate(&self, uri: &str) -> bool {
        let mut state = self.write();
        let existed = state.remove(uri);
        if let Ok(path) = uri_to_path(uri) {
            self.cache.invalidate(&path);
        }
        if existed {
            state.rebuild_definitions();
        }
        debug!(uri, existed, "Invalidated module");
        existed
    }

    /// Re-read and re-parse one file, replacing its entries.
    ///
    /// A URI that isn't a `file://` URI, names a missing file, or fails to
    /// read or parse ends up absent. Returns whether the URI is indexed
    /// afterwards. Build statistics are left untouched.
    pub fn rebuild(&self, uri: &str) -> bool {
        let Ok(path) = uri_to_path(uri) else {
            self.invalidate(uri);
            return false;
        };
        self.cache.invalidate(&path);

        let outcome = if path.is_file() {
            Some(PythonParser::new().map_or_else(
                |e| Err(IndexError::new(path.clone(), IndexErrorKind::ParseFailed, e.to_string())),
                |mut parser| index_file(&self.cache, &mut parser, &path),
            ))
        } else {
            None
        };

        let mut state = self.write();
        state.remove(uri);
        let canonical = path_to_uri(&path);
        if canonical != uri {
            state.remove(&canonical);
        }

        let indexed = match outcome {
            Some(Ok(file)) => {
                state.insert(file);
                true
            }
            Some(Err(error)) => {
                debug!(uri, %error, "Rebuild failed, module dropped");
                false
            }
            None => {
                debug!(uri, "File no longer exists, module dropped");
                false
            }
        };
        state.rebuild_definitions();
        indexed
    }

    fn parse_files(&self, files: &[PathBuf]) -> Vec<std::result::Result<IndexedFile, IndexError>> {
        if self.config.parallel {
            files
                .par_iter()
                .map_init(PythonParser::new, |parser, path| match parser {
                    Ok(parser) => index_file(&self.cache, parser, path),
                    Err(e) => Err(IndexError::new(
                        path.clone(),
                        IndexErrorKind::ParseFailed,
                        e.to_string(),
                    )),
                })
                .collect()
        } else {
            match PythonParser::new() {
                Ok(mut parser) => files
                    .iter()
                    .map(|path| index_file(&self.cache, &mut parser, path))
                    .collect(),
                Err(e) => files
                    .iter()
                    .map(|path| {
                        Err(IndexError::new(
                            path.clone(),
                            IndexErrorKind::ParseFailed,
                            e.to_string(),
                        ))
                    })
                    .collect(),
            }
        }
    }

    // === Reading ===

    /// Lock the index for reading.
    ///
    /// Hold the reader only as long as needed; builds and invalidations wait
    /// for it.
    #[must_use]
    pub fn read(&self) -> IndexReader<'_> {
        IndexReader {
            state: self.state.read().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Statistics of the most recent full build.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.read().stats().clone()
    }

    /// Parsed module for `uri`.
    #[must_use]
    pub fn module(&self, uri: &str) -> Option<Arc<ParsedModule>> {
        self.read().module(uri).cloned()
    }

    /// Symbols declared in `uri`; empty if the URI isn't indexed.
    #[must_use]
    pub fn symbols(&self, uri: &str) -> Vec<Symbol> {
        self.read().symbols(uri).to_vec()
    }

    /// Import edges of `uri`; empty if the URI isn't indexed.
    #[must_use]
    pub fn imports(&self, uri: &str) -> Vec<ImportEdge> {
        self.read().imports(uri).to_vec()
    }

    /// Definitions registered under a bare or qualified name.
    #[must_use]
    pub fn definitions(&self, name: &str) -> Vec<Definition> {
        self.read().definitions(name).to_vec()
    }

    /// Every indexed URI, sorted.
    #[must_use]
    pub fn get_all_uris(&self) -> Vec<String> {
        self.read().uris().into_iter().map(str::to_string).collect()
    }

    /// Canonical project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The file cache. Callers that modify a file should invalidate it here.
    #[must_use]
    pub fn file_cache(&self) -> &FileCache {
        &self.cache
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> IndexPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the first build has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    /// Block until the first build has completed.
    pub fn wait_ready(&self) {
        self.gate.wait_ready();
    }

    /// Block until the first build has completed or `timeout` elapses.
    #[must_use]
    pub fn wait_ready_timeout(&self, timeout: Duration) -> bool {
        self.gate.wait_ready_timeout(timeout)
    }

    fn set_phase(&self, phase: IndexPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read access to a consistent snapshot of the index.
pub struct IndexReader<'a> {
    state: RwLockReadGuard<'a, IndexState>,
}

impl IndexReader<'_> {
    /// Every parsed module by URI.
    #[must_use]
    pub fn modules(&self) -> &HashMap<String, Arc<ParsedModule>> {
        &self.state.modules
    }

    /// Parsed module for `uri`.
    #[must_use]
    pub fn module(&self, uri: &str) -> Option<&Arc<ParsedModule>> {
        self.state.modules.get(uri)
    }

    /// Whether `uri` is indexed.
    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.state.modules.contains_key(uri)
    }

    /// Number of indexed modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.modules.len()
    }

    /// Whether no module is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.modules.is_empty()
    }

    /// Symbols declared in `uri`.
    #[must_use]
    pub fn symbols(&self, uri: &str) -> &[Symbol] {
        self.state.symbols.get(uri).map_or(&[], Vec::as_slice)
    }

    /// Import edges of `uri`.
    #[must_use]
    pub fn imports(&self, uri: &str) -> &[ImportEdge] {
        self.state.imports.get(uri).map_or(&[], Vec::as_slice)
    }

    /// Definitions registered under a bare or qualified name.
    #[must_use]
    pub fn definitions(&self, name: &str) -> &[Definition] {
        self.state.defs_by_name.get(name).map_or(&[], Vec::as_slice)
    }

    /// The whole derived name map.
    #[must_use]
    pub fn defs_by_name(&self) -> &HashMap<String, Vec<Definition>> {
        &self.state.defs_by_name
    }

    /// Statistics of the most recent full build.
    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.state.stats
    }

    /// Every indexed URI, sorted.
    #[must_use]
    pub fn uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self.state.modules.keys().map(String::as_str).collect();
        uris.sort_unstable();
        uris
    }
}

/// Read, parse and extract one file.
fn index_file(
    cache: &FileCache,
    parser: &mut PythonParser,
    path: &Path,
) -> std::result::Result<IndexedFile, IndexError> {
    let text = cache.text(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Failed to read source file");
        IndexError::io_error(path.to_path_buf(), &e)
    })?;

    let uri = path_to_uri(path);
    let module = match parser.parse(text, &uri) {
        Ok(module) => Arc::new(module),
        Err(Error::Syntax(e)) => {
            debug!(path = %path.display(), line = e.line, offset = e.offset, "Syntax error");
            return Err(IndexError::parse_failed(path.to_path_buf(), &e));
        }
        Err(e) => {
            return Err(IndexError::new(
                path.to_path_buf(),
                IndexErrorKind::ParseFailed,
                e.to_string(),
            ));
        }
    };

    let symbols = document_symbols(&module);
    let imports = import_edges(&module);
    debug!(
        path = %path.display(),
        symbols = symbols.len(),
        imports = imports.len(),
        "Indexed file"
    );

    Ok(IndexedFile {
        uri,
        module,
        symbols,
        imports,
    })
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let root = root.canonicalize().map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("project root not found: {}", root.display()),
        ))
    })?;
    if !root.is_dir() {
        return Err(Error::Config(format!(
            "project root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

// Durations of a build fit in u64 milliseconds.
#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
