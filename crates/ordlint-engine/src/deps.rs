//! Dependency analysis over rendered value expressions
//!
//! Finds references from an element's value to sibling elements:
//! self-qualified (`this.x`, `#x`) or container-qualified (`Ctor.x`,
//! `Ctor.#x`). The scanner is string/template/comment aware and tracks
//! call parentheses so that deferred lambda bodies are skipped while
//! immediately-invoked functions and callback arguments are scanned.
//! Static and instance references resolve in disjoint namespaces. Any
//! chain shape not listed above produces no edge.

use std::collections::HashMap;

use ordlint_core::Element;

use crate::config::{CompiledConfig, PatternSet};
use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    /// `this.x` or `#x`; resolves in the referring element's namespace.
    SelfQualified,
    /// `Container.x`; always resolves among static siblings.
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Referenced sibling name, `#` prefix stripped.
    pub name: String,
    pub qualifier: Qualifier,
}

/// Build the dependency graph for one element list.
pub fn analyze(
    elements: &[Element],
    container_name: Option<&str>,
    config: &CompiledConfig,
) -> DependencyGraph {
    let mut graph = DependencyGraph::new(elements.len());

    let mut static_lookup: HashMap<&str, usize> = HashMap::new();
    let mut instance_lookup: HashMap<&str, usize> = HashMap::new();
    for (i, element) in elements.iter().enumerate() {
        if element.is_anchor() {
            continue;
        }
        let key = element.name.trim_start_matches('#');
        let lookup = if element.is_static() {
            &mut static_lookup
        } else {
            &mut instance_lookup
        };
        // First declaration wins on duplicate names (overload style).
        lookup.entry(key).or_insert(i);
    }

    for (i, element) in elements.iter().enumerate() {
        if element.is_anchor() {
            continue;
        }
        let Some(value) = &element.value else {
            continue;
        };
        let references = scan_references(
            value,
            container_name,
            config.ignore_callback_patterns.as_ref(),
        );
        for reference in references {
            let lookup = match reference.qualifier {
                Qualifier::Container => &static_lookup,
                Qualifier::SelfQualified => {
                    if element.is_static() {
                        &static_lookup
                    } else {
                        &instance_lookup
                    }
                }
            };
            if let Some(&dependency) = lookup.get(reference.name.as_str()) {
                graph.add_edge(i, dependency);
            }
        }
    }

    graph.detect_cycles();
    graph
}

/// Scan one rendered value for sibling references.
pub fn scan_references(
    value: &str,
    container_name: Option<&str>,
    ignore_callbacks: Option<&PatternSet>,
) -> Vec<Reference> {
    let mut scanner = Scanner {
        src: value.as_bytes(),
        pos: 0,
        container: container_name,
        ignore: ignore_callbacks,
        refs: Vec::new(),
        call_stack: Vec::new(),
        last_ident: None,
        prev_byte: 0,
    };
    scanner.scan_region(false);
    scanner.refs
}

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
    container: Option<&'a str>,
    ignore: Option<&'a PatternSet>,
    refs: Vec<Reference>,
    /// Open parens, innermost last. `Some(name)` for a call's argument
    /// list, `None` for grouping parens.
    call_stack: Vec<Option<String>>,
    last_ident: Option<String>,
    prev_byte: u8,
}

enum LambdaDisposition {
    /// Body is scanned like ordinary code.
    Scan,
    /// Body is jumped over unless it turns out to be immediately invoked.
    Skip,
}

impl<'a> Scanner<'a> {
    /// Main loop. With `stop_on_close_brace`, consumes through the first
    /// unmatched `}` (template interpolations end there).
    fn scan_region(&mut self, stop_on_close_brace: bool) {
        let mut depth = 0i64;

        while self.pos < self.src.len() {
            let b = self.src[self.pos];

            if b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }

            match b {
                b'\'' | b'"' => {
                    self.skip_string(b);
                    self.last_ident = None;
                    self.prev_byte = b;
                }
                b'`' => {
                    self.scan_template();
                    self.last_ident = None;
                    self.prev_byte = b'`';
                }
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'(' => {
                    let callee = match self.last_ident.take() {
                        Some(name) if !is_keyword(&name) => Some(name),
                        _ => None,
                    };
                    self.call_stack.push(callee);
                    self.pos += 1;
                    self.prev_byte = b'(';
                }
                b')' => {
                    self.call_stack.pop();
                    self.last_ident = None;
                    self.pos += 1;
                    self.prev_byte = b')';
                }
                b'{' => {
                    depth += 1;
                    self.last_ident = None;
                    self.pos += 1;
                    self.prev_byte = b'{';
                }
                b'}' => {
                    if depth == 0 && stop_on_close_brace {
                        self.pos += 1;
                        return;
                    }
                    depth -= 1;
                    self.last_ident = None;
                    self.pos += 1;
                    self.prev_byte = b'}';
                }
                b'=' if self.peek(1) == Some(b'>') => {
                    self.pos += 2;
                    self.prev_byte = b'>';
                    self.last_ident = None;
                    if matches!(self.lambda_disposition(), LambdaDisposition::Skip) {
                        self.skip_arrow_body();
                    }
                }
                b'#' => {
                    let after_dot = self.prev_byte == b'.';
                    self.pos += 1;
                    if let Some(name) = self.read_ident() {
                        if !after_dot {
                            self.refs.push(Reference {
                                name,
                                qualifier: Qualifier::SelfQualified,
                            });
                        }
                        self.prev_byte = b'a';
                    } else {
                        self.prev_byte = b'#';
                    }
                    self.last_ident = None;
                }
                _ if is_ident_start(b) => self.scan_ident(),
                _ => {
                    self.last_ident = None;
                    self.pos += 1;
                    self.prev_byte = b;
                }
            }
        }
    }

    fn scan_ident(&mut self) {
        let after_dot = self.prev_byte == b'.';
        let word = self.read_ident().expect("caller checked ident start");
        self.prev_byte = b'a';

        if word == "this" && !after_dot {
            if let Some(name) = self.read_member_access() {
                self.refs.push(Reference {
                    name: name.clone(),
                    qualifier: Qualifier::SelfQualified,
                });
                self.last_ident = Some(name);
            } else {
                self.last_ident = None;
            }
            return;
        }

        if !after_dot && self.container == Some(word.as_str()) {
            if let Some(name) = self.read_member_access() {
                self.refs.push(Reference {
                    name: name.clone(),
                    qualifier: Qualifier::Container,
                });
                self.last_ident = Some(name);
            } else {
                self.last_ident = Some(word);
            }
            return;
        }

        if word == "function" && !after_dot {
            self.last_ident = None;
            if matches!(self.lambda_disposition(), LambdaDisposition::Skip) {
                self.skip_function_body();
            }
            return;
        }

        self.last_ident = Some(word);
    }

    /// `.name` or `.#name` following `this` or the container name.
    fn read_member_access(&mut self) -> Option<String> {
        let mut probe = self.pos;
        probe = skip_ws(self.src, probe);
        if self.src.get(probe) != Some(&b'.') {
            return None;
        }
        probe = skip_ws(self.src, probe + 1);
        if self.src.get(probe) == Some(&b'#') {
            probe += 1;
        }
        let start = probe;
        while probe < self.src.len() && is_ident_byte(self.src[probe]) {
            probe += 1;
        }
        if probe == start {
            return None;
        }
        let name = String::from_utf8_lossy(&self.src[start..probe]).into_owned();
        self.pos = probe;
        self.prev_byte = b'a';
        Some(name)
    }

    /// Innermost call frame decides whether a lambda body is scanned.
    fn lambda_disposition(&self) -> LambdaDisposition {
        for frame in self.call_stack.iter().rev() {
            if let Some(callee) = frame {
                let ignored = self
                    .ignore
                    .map(|patterns| patterns.is_match(callee))
                    .unwrap_or(false);
                return if ignored {
                    LambdaDisposition::Skip
                } else {
                    LambdaDisposition::Scan
                };
            }
        }
        LambdaDisposition::Skip
    }

    /// Position just after `=>`. Jumps over the body unless the lambda is
    /// immediately invoked.
    fn skip_arrow_body(&mut self) {
        let start = skip_ws(self.src, self.pos);
        if self.src.get(start) == Some(&b'{') {
            if let Some(end) = find_matching_brace(self.src, start) {
                if !invoked_after(self.src, end + 1) {
                    self.pos = end + 1;
                    self.prev_byte = b'}';
                }
            }
        } else {
            let end = expression_end(self.src, start);
            if !invoked_after(self.src, end) {
                self.pos = end;
                self.prev_byte = b'a';
            }
        }
    }

    /// Position just after the `function` keyword. Jumps over params and
    /// body unless the expression is immediately invoked.
    fn skip_function_body(&mut self) {
        let mut probe = skip_ws(self.src, self.pos);
        // Optional function name.
        while probe < self.src.len() && is_ident_byte(self.src[probe]) {
            probe += 1;
        }
        probe = skip_ws(self.src, probe);
        if self.src.get(probe) != Some(&b'(') {
            return;
        }
        let Some(params_end) = find_matching_paren(self.src, probe) else {
            return;
        };
        let body_start = skip_ws(self.src, params_end + 1);
        if self.src.get(body_start) != Some(&b'{') {
            return;
        }
        let Some(body_end) = find_matching_brace(self.src, body_start) else {
            return;
        };
        if !invoked_after(self.src, body_end + 1) {
            self.pos = body_end + 1;
            self.prev_byte = b'}';
        }
    }

    fn scan_template(&mut self) {
        self.pos += 1;
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\\' => self.pos += 2,
                b'`' => {
                    self.pos += 1;
                    return;
                }
                b'$' if self.peek(1) == Some(b'{') => {
                    self.pos += 2;
                    self.scan_region(true);
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.src.len() {
            match self.src[self.pos] {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.src.len() && self.src[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.src.len() {
            if self.src[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    fn read_ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self.pos < self.src.len() && is_ident_byte(self.src[self.pos]) {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(String::from_utf8_lossy(&self.src[start..self.pos]).into_owned())
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "if" | "for"
            | "while"
            | "switch"
            | "catch"
            | "return"
            | "typeof"
            | "void"
            | "delete"
            | "in"
            | "of"
            | "do"
            | "else"
            | "case"
            | "await"
            | "yield"
    )
}

fn skip_ws(src: &[u8], mut pos: usize) -> usize {
    while pos < src.len() && src[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// True when the text at `pos` (after optionally one closing paren) opens
/// a call, i.e. the preceding function expression is immediately invoked.
fn invoked_after(src: &[u8], pos: usize) -> bool {
    let mut probe = skip_ws(src, pos);
    if src.get(probe) == Some(&b')') {
        probe = skip_ws(src, probe + 1);
    }
    src.get(probe) == Some(&b'(')
}

fn find_matching_brace(src: &[u8], open: usize) -> Option<usize> {
    find_matching(src, open, b'{', b'}')
}

fn find_matching_paren(src: &[u8], open: usize) -> Option<usize> {
    find_matching(src, open, b'(', b')')
}

/// String- and comment-aware bracket matching.
fn find_matching(src: &[u8], open_pos: usize, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0i64;
    let mut pos = open_pos;
    while pos < src.len() {
        let b = src[pos];
        match b {
            b'\'' | b'"' | b'`' => pos = skip_quoted(src, pos, b),
            b'/' if src.get(pos + 1) == Some(&b'/') => {
                while pos < src.len() && src[pos] != b'\n' {
                    pos += 1;
                }
            }
            b'/' if src.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                while pos < src.len() {
                    if src[pos] == b'*' && src.get(pos + 1) == Some(&b'/') {
                        pos += 2;
                        break;
                    }
                    pos += 1;
                }
            }
            _ if b == open => {
                depth += 1;
                pos += 1;
            }
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
                pos += 1;
            }
            _ => pos += 1,
        }
    }
    None
}

/// End of an expression-bodied arrow: the first top-level delimiter.
fn expression_end(src: &[u8], from: usize) -> usize {
    let mut parens = 0i64;
    let mut braces = 0i64;
    let mut brackets = 0i64;
    let mut pos = from;
    while pos < src.len() {
        let b = src[pos];
        match b {
            b'\'' | b'"' | b'`' => {
                pos = skip_quoted(src, pos, b);
                continue;
            }
            b'(' => parens += 1,
            b'[' => brackets += 1,
            b'{' => braces += 1,
            b')' => {
                if parens == 0 {
                    return pos;
                }
                parens -= 1;
            }
            b']' => {
                if brackets == 0 {
                    return pos;
                }
                brackets -= 1;
            }
            b'}' => {
                if braces == 0 {
                    return pos;
                }
                braces -= 1;
            }
            b',' if parens == 0 && braces == 0 && brackets == 0 => return pos,
            _ => {}
        }
        pos += 1;
    }
    pos
}

fn skip_quoted(src: &[u8], start: usize, quote: u8) -> usize {
    let mut pos = start + 1;
    while pos < src.len() {
        match src[pos] {
            b'\\' => pos += 2,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    pos
}
