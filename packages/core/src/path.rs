//! Query paths: ordered elements with optional keyed parameters.

use std::collections::BTreeMap;
use std::fmt;

/// Errors related to parsing the textual path form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An element has no name (e.g. `/a//b` or `/[k=v]`).
    #[error("empty element name at position {position}")]
    EmptyName { position: usize },

    /// A `[` was opened but never closed.
    #[error("unterminated key in element '{element}'")]
    UnterminatedKey { element: String },

    /// A key clause has no `=` separator.
    #[error("key '{key}' in element '{element}' has no value")]
    MissingEquals { element: String, key: String },

    /// The same key appears twice in one element.
    #[error("duplicate key '{key}' in element '{element}'")]
    DuplicateKey { element: String, key: String },

    /// Trailing characters after the key clauses of an element.
    #[error("unexpected '{found}' after keys of element '{element}'")]
    TrailingInput { element: String, found: char },
}

/// A single path element: a name plus its keyed parameters.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Elem {
    name: String,
    keys: BTreeMap<String, String>,
}

impl Elem {
    /// Create an element without keys.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Add a keyed parameter, replacing any previous value for `key`.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(key.into(), value.into());
        self
    }

    /// The element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All keyed parameters, sorted by key.
    pub fn keys(&self) -> &BTreeMap<String, String> {
        &self.keys
    }

    /// Look up a keyed parameter.
    pub fn key(&self, key: &str) -> Option<&str> {
        self.keys.get(key).map(String::as_str)
    }
}

impl fmt::Display for Elem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", escape(&self.name, NAME_SPECIAL))?;
        for (k, v) in &self.keys {
            write!(
                f,
                "[{}={}]",
                escape(k, KEY_SPECIAL),
                escape(v, VALUE_SPECIAL)
            )?;
        }
        Ok(())
    }
}

/// An ordered, immutable sequence of [`Elem`]s.
///
/// Elements are never reordered once the path is built. The textual form is
/// the gNMI string form: `/sonic/system/firmware[directory=/lib/firmware]/files`.
/// A backslash escapes `/`, `[`, `]` and `\` in names, `=`, `]` and `\` in
/// keys, and `]` and `\` in values, so a nested file name such as
/// `sub/c.bin` renders as `sub\/c.bin`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct Path {
    elems: Vec<Elem>,
}

impl Path {
    /// Build a path from elements, in order.
    pub fn new(elems: Vec<Elem>) -> Self {
        Self { elems }
    }

    /// Parse the textual path form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fsquery_core::Path;
    ///
    /// let path = Path::parse("/sonic/system/filesystem[path=/host]/disk-space").unwrap();
    /// assert_eq!(path.len(), 4);
    /// assert_eq!(path[2].key("path"), Some("/host"));
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let trimmed = s.strip_prefix('/').unwrap_or(s);
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let mut elems = Vec::new();
        for (position, raw) in split_elements(trimmed).into_iter().enumerate() {
            elems.push(parse_elem(&raw, position)?);
        }
        Ok(Self { elems })
    }

    /// The elements, in order.
    pub fn elems(&self) -> &[Elem] {
        &self.elems
    }

    /// The element at `index`, if the path is long enough.
    pub fn get(&self, index: usize) -> Option<&Elem> {
        self.elems.get(index)
    }

    /// Check if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    /// Iterate over the elements.
    pub fn iter(&self) -> impl Iterator<Item = &Elem> {
        self.elems.iter()
    }

    /// Check whether the element names at the start of this path equal `names`.
    pub fn has_name_prefix(&self, names: &[&str]) -> bool {
        names.len() <= self.elems.len()
            && names
                .iter()
                .zip(&self.elems)
                .all(|(name, elem)| elem.name == *name)
    }

    /// Return a new path with `elem` appended.
    #[must_use]
    pub fn child(&self, elem: Elem) -> Path {
        let mut elems = self.elems.clone();
        elems.push(elem);
        Path { elems }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elems.is_empty() {
            return write!(f, "/");
        }
        for elem in &self.elems {
            write!(f, "/{}", elem)?;
        }
        Ok(())
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Elem;

    fn index(&self, i: usize) -> &Self::Output {
        &self.elems[i]
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl From<Vec<Elem>> for Path {
    fn from(elems: Vec<Elem>) -> Self {
        Path::new(elems)
    }
}

/// Characters escaped with `\` in each part of the textual form.
const NAME_SPECIAL: &[char] = &['/', '[', ']', '\\'];
const KEY_SPECIAL: &[char] = &['=', ']', '\\'];
const VALUE_SPECIAL: &[char] = &[']', '\\'];

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Split on unescaped `/` outside of key brackets. Escapes are kept for
/// `parse_elem`.
fn split_elements(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_key = false;
    let mut escaped = false;

    for c in s.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            '[' if !in_key => {
                in_key = true;
                current.push(c);
            }
            ']' if in_key => {
                in_key = false;
                current.push(c);
            }
            '/' if !in_key => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

fn parse_elem(raw: &str, position: usize) -> Result<Elem, PathError> {
    let mut chars = raw.chars();
    let mut name = String::new();
    let mut has_keys = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' => name.extend(chars.next()),
            '[' => {
                has_keys = true;
                break;
            }
            _ => name.push(c),
        }
    }
    if name.is_empty() {
        return Err(PathError::EmptyName { position });
    }

    let mut elem = Elem::new(name.as_str());
    let mut open = has_keys;
    loop {
        if !open {
            match chars.next() {
                None => break,
                Some('[') => {}
                Some(found) => {
                    return Err(PathError::TrailingInput {
                        element: name,
                        found,
                    })
                }
            }
        }
        open = false;

        let (key, value) = parse_clause(&mut chars, &name)?;
        if elem.keys.contains_key(&key) {
            return Err(PathError::DuplicateKey { element: name, key });
        }
        elem.keys.insert(key, value);
    }

    Ok(elem)
}

/// Read `key=value]` after an opening `[`, unescaping both sides.
fn parse_clause(
    chars: &mut std::str::Chars<'_>,
    element: &str,
) -> Result<(String, String), PathError> {
    let mut key = String::new();
    let mut value: Option<String> = None;
    loop {
        let Some(c) = chars.next() else {
            return Err(PathError::UnterminatedKey {
                element: element.to_string(),
            });
        };
        match c {
            '\\' => value.as_mut().unwrap_or(&mut key).extend(chars.next()),
            '=' if value.is_none() => value = Some(String::new()),
            ']' => break,
            _ => value.as_mut().unwrap_or(&mut key).push(c),
        }
    }
    match value {
        Some(value) => Ok((key, value)),
        None => Err(PathError::MissingEquals {
            element: element.to_string(),
            key,
        }),
    }
}
