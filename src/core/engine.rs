//! The analysis engine: one value per workspace owning every cache and
//! collaborator, with one method per request.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde_json::Value;

use crate::{
    config::{Config, ConfigProvider, FileConfigProvider},
    core::{
        analysis::{self, BindingTable, read_declaration, reference_sites},
        cache::{CONFIG_FRESHNESS, Clock, ConfigCache, DictionaryCache, SystemClock, USAGE_TTL, UsageCache},
        data::{ContentNode, DictionaryRecord, FieldPath, Position, Range, ResolutionOrigin, UsageLocation},
        locate,
        parsers::script::{ParseContext, ParsedSource},
        project::ProjectRoots,
        usage_scanner,
        workspace::{FsWorkspace, WorkspaceSearch},
    },
};

/// Display type of framework nodes that wrap translated content.
pub const NODE_TYPE_NAME: &str = "IntlayerNode";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    pub origin: ResolutionOrigin,
    /// Field path without accessor suffixes.
    pub path: FieldPath,
    pub display_type: String,
    /// One entry per record that has something to show, in record order.
    pub entries: Vec<HoverEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HoverEntry {
    #[serde(rename_all = "camelCase")]
    Local {
        /// Absolute path of the declaring content file, when recorded.
        file_path: Option<PathBuf>,
        body: HoverBody,
    },
    #[serde(rename_all = "camelCase")]
    Remote { dashboard_url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "value", rename_all = "camelCase")]
pub enum HoverBody {
    /// `(locale, text)` per translation, in declaration order.
    Translations(Vec<(String, String)>),
    Json(Value),
    Scalar(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionTarget {
    pub file_path: PathBuf,
    pub position: Position,
    /// False when the field could not be located and `position` is the file
    /// start.
    pub exact: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file_path: PathBuf,
    pub range: Range,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedField {
    pub path: FieldPath,
    pub range: Range,
    pub is_group: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum UnusedReport {
    /// No file reads the dictionary at all.
    #[serde(rename_all = "camelCase")]
    DictionaryUnused { key: String, key_range: Range },
    /// The dictionary is read; these declared fields are not.
    #[serde(rename_all = "camelCase")]
    Fields { key: String, unused: Vec<UnusedField> },
}

impl UnusedReport {
    pub fn has_findings(&self) -> bool {
        match self {
            UnusedReport::DictionaryUnused { .. } => true,
            UnusedReport::Fields { unused, .. } => !unused.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlinePreview {
    /// Zero-based line the preview belongs to.
    pub line: u32,
    /// End of that line, where the preview is shown.
    pub anchor: Position,
    pub text: String,
    pub dictionary_key: String,
    pub path: FieldPath,
}

pub struct Engine {
    roots: ProjectRoots,
    config_provider: Box<dyn ConfigProvider>,
    workspace: Box<dyn WorkspaceSearch>,
    clock: Arc<dyn Clock>,
    configs: ConfigCache,
    dictionaries: DictionaryCache,
    usages: UsageCache,
    sources: ParseContext,
}

impl Engine {
    /// Engine over the filesystem for the workspace at `workspace_root`.
    pub fn new(workspace_root: impl AsRef<Path>) -> Result<Self> {
        let workspace_root = workspace_root.as_ref();
        if !workspace_root.is_dir() {
            bail!(
                "Workspace root does not exist or is not a directory: {}",
                workspace_root.display()
            );
        }
        let workspace_root = fs::canonicalize(workspace_root)
            .with_context(|| format!("Failed to resolve workspace root {:?}", workspace_root))?;

        Ok(Self {
            roots: ProjectRoots::new(workspace_root),
            config_provider: Box::new(FileConfigProvider),
            workspace: Box::new(FsWorkspace),
            clock: Arc::new(SystemClock),
            configs: ConfigCache::new(CONFIG_FRESHNESS),
            dictionaries: DictionaryCache::new(),
            usages: UsageCache::new(USAGE_TTL),
            sources: ParseContext::new(),
        })
    }

    pub fn with_config_provider(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.config_provider = Box::new(provider);
        self.configs.clear();
        self
    }

    pub fn with_workspace_search(mut self, workspace: impl WorkspaceSearch + 'static) -> Self {
        self.workspace = Box::new(workspace);
        self.usages.clear();
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        self.roots.workspace_root()
    }

    /// Absolute form of `file`; relative paths are taken from the workspace
    /// root.
    pub fn absolute(&self, file: &Path) -> PathBuf {
        let joined = if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.workspace_root().join(file)
        };
        fs::canonicalize(&joined).unwrap_or(joined)
    }

    /// Project root owning `file`.
    pub fn project_root_for(&mut self, file: &Path) -> PathBuf {
        let file = self.absolute(file);
        let dir = file.parent().unwrap_or(&file).to_path_buf();
        self.roots.find(&dir)
    }

    pub fn config_for(&mut self, project_root: &Path) -> Result<Arc<Config>> {
        let key = project_root.to_path_buf();
        let now = self.clock.now();
        if let Some(config) = self.configs.get(&key, now) {
            return Ok(config);
        }
        let config = Arc::new(self.config_provider.load(project_root)?);
        self.configs.insert(key, config.clone(), now);
        Ok(config)
    }

    /// Every record of dictionary `key` in `project_root`. A missing or
    /// malformed dictionary file is `None`.
    pub fn dictionaries(
        &mut self,
        project_root: &Path,
        key: &str,
    ) -> Result<Option<Arc<Vec<DictionaryRecord>>>> {
        let config = self.config_for(project_root)?;
        let path = config.dictionary_path(project_root, key);
        Ok(self.dictionaries.load(&path))
    }

    /// Parses `text` as the current content of `file`. Failures are logged.
    fn parse(&mut self, file: &Path, text: &str) -> Option<Arc<ParsedSource>> {
        match self.sources.parse(file, text) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                let error = format!("{:#}", e);
                tracing::warn!(path = %file.display(), %error, "cannot parse source");
                None
            }
        }
    }

    /// Dictionary field read by the expression at `position` in `file`.
    pub fn resolve_origin(&mut self, file: &Path, text: &str, position: Position) -> Option<ResolutionOrigin> {
        let file = self.absolute(file);
        let parsed = self.parse(&file, text)?;
        let offset = parsed.offset_at(position)?;
        let bindings = BindingTable::build(&parsed);
        analysis::resolve_origin(&parsed, &bindings, offset)
    }

    pub fn hover(&mut self, file: &Path, text: &str, position: Position) -> Result<Option<HoverInfo>> {
        let Some(origin) = self.resolve_origin(file, text, position) else {
            return Ok(None);
        };
        let root = self.project_root_for(file);
        let Some(records) = self.dictionaries(&root, &origin.dictionary_key)? else {
            return Ok(None);
        };
        let config = self.config_for(&root)?;

        let path = origin.content_path();
        let display_type = records
            .iter()
            .filter(|record| !record.location.is_remote_only())
            .find_map(|record| record.content.get(&path))
            .map(|node| display_type(node, &origin))
            .unwrap_or_else(|| "unknown".to_string());

        let mut entries = Vec::new();
        for record in records.iter() {
            if record.location.is_remote_only() {
                entries.push(HoverEntry::Remote {
                    dashboard_url: config.dashboard_url(&origin.dictionary_key),
                });
                continue;
            }
            if let Some(node) = record.content.get(&path) {
                entries.push(HoverEntry::Local {
                    file_path: record.file_path.as_ref().map(|p| root.join(p)),
                    body: hover_body(node),
                });
            }
        }

        Ok(Some(HoverInfo {
            origin,
            path,
            display_type,
            entries,
        }))
    }

    /// Dictionary key of the accessor call whose key literal is under
    /// `position`.
    fn accessor_key_at(&mut self, file: &Path, text: &str, position: Position) -> Option<String> {
        let file = self.absolute(file);
        let parsed = self.parse(&file, text)?;
        let offset = parsed.offset_at(position)?;
        analysis::accessor_key_at(&parsed, offset)?.key
    }

    /// Declaration sites of what is under `position`, one per local record
    /// whose content file exists.
    ///
    /// On the key literal of an accessor call these are the `key` properties
    /// of the declaring files; elsewhere, the declarations of the field read
    /// at `position`.
    pub fn definitions(&mut self, file: &Path, text: &str, position: Position) -> Result<Vec<DefinitionTarget>> {
        let (key, field_path) = match self.accessor_key_at(file, text, position) {
            Some(key) => (key, FieldPath::parse("key")),
            None => {
                let Some(origin) = self.resolve_origin(file, text, position) else {
                    return Ok(Vec::new());
                };
                let field_path = origin.content_path().prepend("content");
                (origin.dictionary_key, field_path)
            }
        };
        let root = self.project_root_for(file);
        let Some(records) = self.dictionaries(&root, &key)? else {
            return Ok(Vec::new());
        };

        let targets = records
            .iter()
            .filter(|record| !record.location.is_remote_only())
            .filter_map(|record| record.file_path.as_ref().map(|p| root.join(p)))
            .filter(|path| path.is_file())
            .map(|path| {
                let found = locate::locate_field(&path, &field_path);
                DefinitionTarget {
                    position: found.unwrap_or_default(),
                    exact: found.is_some(),
                    file_path: path,
                }
            })
            .collect();
        Ok(targets)
    }

    /// Usages of dictionary `key` in `project_root`, cached for a short while.
    pub fn find_usages(&mut self, project_root: &Path, key: &str) -> Result<Arc<Vec<UsageLocation>>> {
        let cache_key = (project_root.to_path_buf(), key.to_string());
        let now = self.clock.now();
        if let Some(usages) = self.usages.get(&cache_key, now) {
            tracing::debug!(key, "usage cache hit");
            return Ok(usages);
        }

        let config = self.config_for(project_root)?;
        let usages = Arc::new(usage_scanner::find_usages(
            self.workspace.as_ref(),
            project_root,
            key,
            &config.ignores,
        )?);
        self.usages.insert(cache_key, usages.clone(), now);
        Ok(usages)
    }

    /// From a content declaration file, the source locations that read what
    /// is under `position`.
    ///
    /// On the `key` property every usage's accessor call is returned. On a
    /// content property its precise reads are returned, or the accessor call
    /// of usages that read it only through an all-fields marker.
    pub fn field_references(
        &mut self,
        content_file: &Path,
        text: &str,
        position: Position,
    ) -> Result<Vec<SourceLocation>> {
        let content_file = self.absolute(content_file);
        let Some(parsed) = self.parse(&content_file, text) else {
            return Ok(Vec::new());
        };
        let Some(declaration) = read_declaration(&parsed) else {
            return Ok(Vec::new());
        };

        let on_key = declaration.is_on_key(position);
        let field = declaration.field_at(position).map(|f| f.path.clone());
        if !on_key && field.is_none() {
            return Ok(Vec::new());
        }

        let root = self.project_root_for(&content_file);
        let usages = self.find_usages(&root, &declaration.key)?;
        let mut locations = Vec::new();
        for usage in usages.iter() {
            let at = |range: Range| SourceLocation {
                file_path: usage.file_path.clone(),
                range,
            };
            match &field {
                _ if on_key => locations.push(at(usage.declaration_range)),
                Some(path) => {
                    let precise = usage.ranges_for(path);
                    if !precise.is_empty() {
                        locations.extend(precise.iter().copied().map(at));
                    } else if usage.covers_all(path) {
                        locations.push(at(usage.declaration_range));
                    }
                }
                None => {}
            }
        }
        Ok(locations)
    }

    /// Unused report for a content declaration file; `None` when the text
    /// declares no dictionary.
    pub fn unused_fields(&mut self, content_file: &Path, text: &str) -> Result<Option<UnusedReport>> {
        let content_file = self.absolute(content_file);
        let Some(parsed) = self.parse(&content_file, text) else {
            return Ok(None);
        };
        let Some(declaration) = read_declaration(&parsed) else {
            return Ok(None);
        };

        let root = self.project_root_for(&content_file);
        let usages = self.find_usages(&root, &declaration.key)?;
        if usages.is_empty() {
            return Ok(Some(UnusedReport::DictionaryUnused {
                key: declaration.key,
                key_range: declaration.key_range,
            }));
        }

        let unused = declaration
            .fields
            .into_iter()
            .filter(|field| !usages.iter().any(|usage| usage.uses_field(&field.path)))
            .map(|field| UnusedField {
                path: field.path,
                range: field.range,
                is_group: field.is_group,
            })
            .collect();
        Ok(Some(UnusedReport::Fields {
            key: declaration.key,
            unused,
        }))
    }

    /// Default-locale text of each content read in `file`, at most one per
    /// line.
    pub fn inline_previews(&mut self, file: &Path, text: &str) -> Result<Vec<InlinePreview>> {
        let file = self.absolute(file);
        let Some(parsed) = self.parse(&file, text) else {
            return Ok(Vec::new());
        };
        let bindings = BindingTable::build(&parsed);
        let sites = reference_sites(&parsed, &bindings);
        if sites.is_empty() {
            return Ok(Vec::new());
        }

        let root = self.project_root_for(&file);
        let locale = self.config_for(&root)?.default_locale.clone();
        let mut previews: Vec<InlinePreview> = Vec::new();
        for site in sites {
            let line = parsed.line_index.position_at(site.end).line;
            if previews.iter().any(|p| p.line == line) {
                continue;
            }
            let Some(records) = self.dictionaries(&root, &site.origin.dictionary_key)? else {
                continue;
            };
            let path = site.origin.content_path();
            let text = records
                .iter()
                .filter(|record| !record.location.is_remote_only())
                .filter_map(|record| record.content.get(&path))
                .find_map(|node| node.preview_text(&locale));
            if let Some(text) = text {
                previews.push(InlinePreview {
                    line,
                    anchor: line_end(&parsed, line),
                    text,
                    dictionary_key: site.origin.dictionary_key,
                    path,
                });
            }
        }
        Ok(previews)
    }

    pub fn locate_field(&self, file: &Path, field_path: &FieldPath) -> Option<Position> {
        locate::locate_field(&self.absolute(file), field_path)
    }

    /// Drops every cached config, scan, project root and parsed source.
    pub fn clear_caches(&mut self) {
        self.configs.clear();
        self.usages.clear();
        self.roots.clear();
        self.sources.clear();
    }
}

fn line_end(parsed: &ParsedSource, line: u32) -> Position {
    let index = &parsed.line_index;
    let offset = index
        .offset_at(Position::new(line, u32::MAX))
        .unwrap_or(index.text().len());
    index.position_at(offset)
}

/// Type shown for a read of `node`.
///
/// Translations read through framework accessors are nodes unless `.value`
/// or `.raw` unwraps them; the `intlayer` package hands out plain values.
fn display_type(node: &ContentNode, origin: &ResolutionOrigin) -> String {
    match node.translated_kind() {
        Some(kind) if origin.returns_raw_content() || origin.field_path.ends_with_accessor() => {
            kind.to_string()
        }
        Some(_) => NODE_TYPE_NAME.to_string(),
        None => node.kind().to_string(),
    }
}

fn hover_body(node: &ContentNode) -> HoverBody {
    match node {
        ContentNode::Translation(items) => HoverBody::Translations(
            items
                .iter()
                .map(|(locale, value)| (locale.clone(), scalar_text(value)))
                .collect(),
        ),
        ContentNode::Primitive(_) => HoverBody::Scalar(scalar_text(node)),
        other => HoverBody::Json(other.to_json()),
    }
}

fn scalar_text(node: &ContentNode) -> String {
    match node {
        ContentNode::Primitive(Value::String(s)) => s.clone(),
        other => other.to_json().to_string(),
    }
}
