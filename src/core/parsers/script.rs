use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, GLOBALS, Globals, SourceMap, Span, Spanned};
use swc_ecma_ast::{ExprStmt, Module, ModuleItem, Stmt};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

use crate::core::{
    data::{LineIndex, Position, Range},
    markup::{Dialect, Region, embedded_regions, normalize},
};

/// A parsed source file.
///
/// The module is parsed from the normalized text, while the line index holds
/// the original text. Normalization preserves offsets, so spans from the
/// module map directly onto the original. For markup dialects the module is
/// assembled from the embedded script blocks and template expressions, each
/// parsed at its own offset, with template expressions as expression
/// statements.
pub struct ParsedSource {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub module: Module,
    pub line_index: LineIndex,
    start_pos: BytePos,
}

impl ParsedSource {
    /// Original text.
    pub fn text(&self) -> &str {
        self.line_index.text()
    }

    /// Byte offset of a span position within the text.
    pub fn offset(&self, pos: BytePos) -> usize {
        pos.0.saturating_sub(self.start_pos.0) as usize
    }

    /// Span position of a byte offset within the text.
    pub fn byte_pos(&self, offset: usize) -> BytePos {
        BytePos(self.start_pos.0 + offset as u32)
    }

    pub fn position(&self, pos: BytePos) -> Position {
        self.line_index.position_at(self.offset(pos))
    }

    pub fn range(&self, span: Span) -> Range {
        self.line_index
            .range(self.offset(span.lo), self.offset(span.hi))
    }

    /// Byte offset of an editor position, if it lies inside the text.
    pub fn offset_at(&self, position: Position) -> Option<usize> {
        self.line_index.offset_at(position)
    }

    pub fn snippet(&self, span: Span) -> &str {
        let text = self.text();
        let lo = self.offset(span.lo).min(text.len());
        let hi = self.offset(span.hi).min(text.len());
        text.get(lo..hi).unwrap_or("")
    }
}

/// Parses `source` as the dialect implied by `path`.
///
/// Each call uses its own `SourceMap` and swc globals, so it is safe to call
/// from several threads at once.
pub fn parse_source(path: &Path, source: &str) -> Result<ParsedSource> {
    let dialect = Dialect::from_path(path).unwrap_or(Dialect::Script);
    let source_map: Arc<SourceMap> = Default::default();

    let code = normalize(source, dialect);

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(path.to_path_buf()).into(), code.clone());
        let start_pos = source_file.start_pos;

        let module = match dialect {
            Dialect::Script => parse_module(
                path,
                typescript(uses_tsx(path)),
                StringInput::from(&*source_file),
            )?,
            Dialect::Vue | Dialect::Svelte => {
                let regions = embedded_regions(source, dialect);
                parse_embedded(path, &code, &regions, start_pos)?
            }
        };

        Ok(ParsedSource {
            path: path.to_path_buf(),
            dialect,
            module,
            line_index: LineIndex::new(source),
            start_pos,
        })
    })
}

fn typescript(tsx: bool) -> Syntax {
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

fn parse_module(path: &Path, syntax: Syntax, input: StringInput<'_>) -> Result<Module> {
    let mut parser = Parser::new(syntax, input, None);
    let module = parser
        .parse_module()
        .map_err(|e| anyhow!("Failed to parse {}: {:?}", path.display(), e.kind()))?;

    let recovered = parser.take_errors();
    if !recovered.is_empty() {
        tracing::debug!(
            path = %path.display(),
            count = recovered.len(),
            "parsed with recoverable errors"
        );
    }
    Ok(module)
}

/// Parses every region of normalized markup `code` at its original offset
/// and merges them into one module spanning the whole file.
///
/// A script block that fails to parse fails the file. A template expression
/// that fails is skipped on its own.
fn parse_embedded(path: &Path, code: &str, regions: &[Region], start_pos: BytePos) -> Result<Module> {
    let at = |offset: usize| BytePos(start_pos.0 + offset as u32);
    let mut body = Vec::new();

    for region in regions {
        let range = region.range().clone();
        let input = StringInput::new(&code[range.clone()], at(range.start), at(range.end));
        match region {
            Region::Script { jsx, .. } => {
                body.extend(parse_module(path, typescript(*jsx), input)?.body);
            }
            Region::Expression(_) => {
                let mut parser = Parser::new(typescript(false), input, None);
                match parser.parse_expr() {
                    Ok(expr) if parser.take_errors().is_empty() => {
                        body.push(ModuleItem::Stmt(Stmt::Expr(ExprStmt {
                            span: expr.span(),
                            expr,
                        })));
                    }
                    Ok(_) => {
                        tracing::debug!(
                            path = %path.display(),
                            offset = range.start,
                            "skipping malformed template expression"
                        );
                    }
                    Err(e) => {
                        tracing::debug!(
                            path = %path.display(),
                            offset = range.start,
                            error = ?e.kind(),
                            "skipping unparsable template expression"
                        );
                    }
                }
            }
        }
    }

    Ok(Module {
        span: Span::new(at(0), at(code.len())),
        body,
        shebang: None,
    })
}

/// `.ts`-family files forbid JSX, since `<T>x` is a type assertion there.
fn uses_tsx(path: &Path) -> bool {
    !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts" | "mts" | "cts")
    )
}

/// Parsed sources keyed by virtual path.
///
/// Re-parsing a path replaces its entry and hands out a fresh handle. Handles
/// from earlier parses stay valid and unchanged for whoever holds them.
#[derive(Default)]
pub struct ParseContext {
    sources: HashMap<PathBuf, Arc<ParsedSource>>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `source` under `path`, replacing any earlier entry.
    ///
    /// On failure the earlier entry is dropped too, so a stale tree is never
    /// served for text that no longer parses.
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<Arc<ParsedSource>> {
        match parse_source(path, source) {
            Ok(parsed) => {
                let parsed = Arc::new(parsed);
                self.sources.insert(path.to_path_buf(), Arc::clone(&parsed));
                Ok(parsed)
            }
            Err(e) => {
                self.sources.remove(path);
                Err(e)
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<Arc<ParsedSource>> {
        self.sources.get(path).cloned()
    }

    pub fn remove(&mut self, path: &Path) -> Option<Arc<ParsedSource>> {
        self.sources.remove(path)
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
