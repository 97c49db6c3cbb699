//! Embedded code in markup-hosting source dialects.
//!
//! Vue and Svelte files mix markup with script. Only the `<script>` blocks and
//! the template expressions are code. This module finds their byte ranges in
//! the host file, so each piece can be parsed on its own at its original
//! offset and a broken piece never takes the others down with it. Nothing is
//! ever moved: every byte offset keeps pointing at the same character of the
//! original.

use std::{ops::Range, path::Path, sync::LazyLock};

use regex::Regex;

static SCRIPT_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());
static STYLE_BLOCK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").unwrap());
static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static JSX_LANG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\blang\s*=\s*["']?(?:tsx|jsx)\b"#).unwrap());

/// `:prop="..."`, `v-bind:prop="..."` and the directives whose value is a
/// plain expression.
static VUE_DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\s(?::[\w.\-\[\]]+|v-bind:[\w.\-\[\]]+|v-(?:if|else-if|show|html|text|model))\s*=\s*"([^"]*)""#,
    )
    .unwrap()
});
/// The iterated expression of `v-for="item in items"`.
static VUE_FOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sv-for\s*=\s*"[^"]*?\s(?:in|of)\s+([^"]*)""#).unwrap());

/// Svelte block and special tags whose tail is an expression.
static SVELTE_OPENER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#(?:if|each|await|key)|:else\s+if|@html|@render)\s+").unwrap()
});
static SVELTE_EACH_TAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+as\s").unwrap());
static SVELTE_AWAIT_TAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(?:then|catch)\b").unwrap());

/// Source dialect, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Plain script (`.ts`, `.tsx`, `.js`, ...), code throughout.
    Script,
    Vue,
    Svelte,
}

/// Extensions treated as plain script.
pub const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];

/// Extensions that host script inside markup.
pub const MARKUP_EXTENSIONS: &[&str] = &["vue", "svelte"];

impl Dialect {
    /// Dialect of a source file, or `None` for files that are not analysed.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext {
            "vue" => Some(Dialect::Vue),
            "svelte" => Some(Dialect::Svelte),
            _ if SCRIPT_EXTENSIONS.contains(&ext) => Some(Dialect::Script),
            _ => None,
        }
    }
}

/// A piece of code embedded in a markup file, as a byte range of the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Body of a `<script>` block. `jsx` when its `lang` asks for JSX.
    Script { range: Range<usize>, jsx: bool },
    /// One template expression.
    Expression(Range<usize>),
}

impl Region {
    pub fn range(&self) -> &Range<usize> {
        match self {
            Region::Script { range, .. } | Region::Expression(range) => range,
        }
    }
}

/// Code regions of a markup file, in source order.
///
/// Plain script has no embedded regions and yields nothing.
pub fn embedded_regions(source: &str, dialect: Dialect) -> Vec<Region> {
    if dialect == Dialect::Script {
        return Vec::new();
    }

    let mut regions = Vec::new();
    let mut excluded: Vec<Range<usize>> = Vec::new();
    for caps in SCRIPT_BLOCK_REGEX.captures_iter(source) {
        let (Some(block), Some(attrs), Some(body)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        excluded.push(block.range());
        regions.push(Region::Script {
            range: body.range(),
            jsx: JSX_LANG_REGEX.is_match(attrs.as_str()),
        });
    }
    excluded.extend(STYLE_BLOCK_REGEX.find_iter(source).map(|m| m.range()));
    excluded.extend(COMMENT_REGEX.find_iter(source).map(|m| m.range()));

    let template = blank_ranges(source, &excluded);
    let expressions = match dialect {
        Dialect::Vue => vue_expressions(&template),
        Dialect::Svelte => svelte_expressions(&template),
        Dialect::Script => Vec::new(),
    };
    regions.extend(
        expressions
            .into_iter()
            .filter(|range| source.get(range.clone()).is_some_and(|s| !s.trim().is_empty()))
            .map(Region::Expression),
    );

    regions.sort_by_key(|region| region.range().start);
    regions
}

/// Returns text with the same byte length and line structure as `source` in
/// which only code is left: script block bodies and template expressions stay
/// where they are and everything else is blanked. Plain script is returned
/// unchanged.
pub fn normalize(source: &str, dialect: Dialect) -> String {
    if dialect == Dialect::Script {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for region in embedded_regions(source, dialect) {
        let range = region.range();
        if range.start < cursor {
            continue;
        }
        out.push_str(&blank(&source[cursor..range.start]));
        out.push_str(&source[range.clone()]);
        cursor = range.end;
    }
    out.push_str(&blank(&source[cursor..]));
    out
}

/// `{{ ... }}` interpolations and directive values.
fn vue_expressions(template: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(open) = template[cursor..].find("{{") {
        let start = cursor + open + 2;
        let Some(close) = template[start..].find("}}") else {
            break;
        };
        found.push(start..start + close);
        cursor = start + close + 2;
    }
    for regex in [&*VUE_DIRECTIVE_REGEX, &*VUE_FOR_REGEX] {
        found.extend(
            regex
                .captures_iter(template)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.range()),
        );
    }
    found
}

/// Expressions of every `{ ... }` tag, attribute values included.
fn svelte_expressions(template: &str) -> Vec<Range<usize>> {
    let bytes = template.as_bytes();
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(open) = template[cursor..].find('{') {
        let open = cursor + open;
        let Some(close) = matching_brace(bytes, open) else {
            cursor = open + 1;
            continue;
        };
        if let Some(range) = svelte_tag_expression(template, open + 1..close) {
            found.push(range);
        }
        cursor = close + 1;
    }
    found
}

/// Expression part of the tag body `inner`. Block closers, `{:else}` and
/// the other bodiless tags have none.
fn svelte_tag_expression(template: &str, inner: Range<usize>) -> Option<Range<usize>> {
    let text = &template[inner.clone()];
    let trimmed = text.trim_start();
    let lead = inner.start + (text.len() - trimmed.len());

    if trimmed.starts_with("...") {
        return Some(lead + 3..inner.end);
    }
    if !trimmed.starts_with(['#', ':', '/', '@']) {
        return Some(inner);
    }

    let opener = SVELTE_OPENER_REGEX.find(trimmed)?;
    let start = lead + opener.end();
    let body = &template[start..inner.end];
    let tail = if trimmed.starts_with("#each") {
        SVELTE_EACH_TAIL_REGEX.find(body)
    } else if trimmed.starts_with("#await") {
        SVELTE_AWAIT_TAIL_REGEX.find(body)
    } else {
        None
    };
    let end = tail.map_or(inner.end, |m| start + m.start());
    Some(start..end)
}

/// Index of the `}` closing the `{` at `open`. Braces inside string and
/// template literals do not count.
fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// `source` with every range in `ranges` overwritten by whitespace of equal
/// byte length.
fn blank_ranges(source: &str, ranges: &[Range<usize>]) -> String {
    let mut out = source.to_string();
    for range in ranges {
        if let Some(fragment) = source.get(range.clone()) {
            out.replace_range(range.clone(), &blank(fragment));
        }
    }
    out
}

/// Whitespace of equal byte length. Line breaks are kept so line numbers
/// stay aligned.
fn blank(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        match c {
            '\n' | '\r' => out.push(c),
            _ => out.extend(std::iter::repeat_n(' ', c.len_utf8())),
        }
    }
    out
}
