//! Call-site capture and source-map-aware resolution.
//!
//! Call sites are captured with `#[track_caller]` at the public logging
//! methods and rendered into the footer as `func (./path:line:column)`.
//! When a [`MapLoader`] is configured, a site in generated code is mapped
//! back to its original location; the loaded maps are cached per file path
//! with no eviction (the set of distinct call sites is small and stable for
//! a logging workload, so the table growth is bounded in practice).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

/// A resolved or raw code location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Enclosing function name, when the capture mechanism knows it.
    pub function: Option<String>,
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl CallSite {
    /// Capture the caller's location. Relies on `#[track_caller]` chains,
    /// so every public method between the user and this call must carry the
    /// attribute.
    #[track_caller]
    pub fn here() -> Self {
        let loc = std::panic::Location::caller();
        Self {
            function: None,
            file: PathBuf::from(loc.file()),
            line: loc.line(),
            column: loc.column(),
        }
    }

    /// Footer form: `func (path:line:column)`, or `path:line:column` when
    /// the function name is unknown.
    pub fn encode(&self) -> String {
        let path = self.file.display();
        match &self.function {
            Some(func) => format!("{func} ({path}:{}:{})", self.line, self.column),
            None => format!("{path}:{}:{}", self.line, self.column),
        }
    }
}

/// A decoded point in original (pre-compilation) source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPoint {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
}

/// Black-box source map for one generated file.
pub trait SourceMap: Send + Sync {
    /// Map a generated-file position to an original-source position.
    /// `None` means the map has no entry covering the point.
    fn decode_point(&self, line: u32, column: u32) -> Option<MappedPoint>;
}

/// Loads the source map belonging to a generated file, if one exists.
/// `None` is cached as "no mapping available" and the raw path is used.
pub trait MapLoader: Send + Sync {
    fn load(&self, source: &Path) -> Option<Box<dyn SourceMap>>;
}

/// Per-file source-map cache. Keyed by the generated file path; a miss is
/// cached too so absent maps are probed exactly once.
#[derive(Default)]
pub(crate) struct MapCache {
    maps: Mutex<HashMap<PathBuf, Option<Box<dyn SourceMap>>>>,
}

impl MapCache {
    /// Resolve a call site through the loader, degrading to the raw
    /// location when no map exists or the point is not covered. The
    /// returned path is made relative to `cwd` and `./`-prefixed.
    pub(crate) fn resolve(
        &self,
        loader: Option<&dyn MapLoader>,
        cwd: &Path,
        site: &CallSite,
    ) -> CallSite {
        let mut resolved = site.clone();
        if let Some(loader) = loader {
            let mut maps = self.maps.lock();
            let entry = maps
                .entry(site.file.clone())
                .or_insert_with(|| loader.load(&site.file));
            if let Some(map) = entry {
                match map.decode_point(site.line, site.column) {
                    Some(point) => {
                        resolved.file = point.file;
                        resolved.line = point.line;
                        resolved.column = point.column;
                    }
                    None => {
                        log::warn!(
                            "source map has no entry for {}:{}:{}",
                            site.file.display(),
                            site.line,
                            site.column
                        );
                    }
                }
            }
        }
        resolved.file = relativize(cwd, &resolved.file);
        resolved
    }
}

/// Make `path` relative to `cwd` where possible and prefix it with `./`.
fn relativize(cwd: &Path, path: &Path) -> PathBuf {
    let rel = path.strip_prefix(cwd).unwrap_or(path);
    if rel.is_absolute() || rel.starts_with(".") || rel.starts_with("..") {
        rel.to_path_buf()
    } else {
        Path::new(".").join(rel)
    }
}
