//! `config.xml` access
//!
//! The manifest is edited in place: each setter splices the new value into
//! the original text, so comments and formatting survive.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::error::{CreateError, Result};

const ROOT_ELEMENT: &str = "widget";

/// A `config.xml` file read fresh from disk
#[derive(Debug, Clone)]
pub struct ConfigManifest {
    path: PathBuf,
    text: String,
}

/// One text replacement
struct Splice {
    range: Range<usize>,
    replacement: String,
}

impl ConfigManifest {
    /// Read and validate `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not well-formed XML,
    /// or its root element is not `<widget>`.
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| CreateError::io("Failed to read manifest", path, e))?;
        Self::parse(path.to_path_buf(), text)
    }

    /// Validate `text` as the manifest at `path` without touching disk
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a `<widget>` document.
    pub fn parse(path: PathBuf, text: String) -> Result<Self> {
        {
            let doc = Document::parse(&text).map_err(|e| CreateError::manifest(&path, e.to_string()))?;
            let root = doc.root_element().tag_name().name();
            if root != ROOT_ELEMENT {
                return Err(CreateError::manifest(
                    &path,
                    format!("expected <{ROOT_ELEMENT}> root element, found <{root}>"),
                ));
            }
        }

        Ok(Self { path, text })
    }

    /// Current document text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// App id (`widget@id`)
    #[must_use]
    pub fn package_name(&self) -> Option<String> {
        self.root_attribute("id")
    }

    /// App version (`widget@version`)
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.root_attribute("version")
    }

    /// Display name (`<name>`)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.child_text("name")
    }

    /// Author (`<author>`), surrounding whitespace trimmed
    #[must_use]
    pub fn author(&self) -> Option<String> {
        self.child_text("author")
    }

    /// Set the app id
    ///
    /// # Errors
    ///
    /// Returns an error if the document can no longer be parsed.
    pub fn set_package_name(&mut self, id: &str) -> Result<()> {
        self.set_root_attribute("id", id)
    }

    /// Set the app version
    ///
    /// # Errors
    ///
    /// Returns an error if the document can no longer be parsed.
    pub fn set_version(&mut self, version: &str) -> Result<()> {
        self.set_root_attribute("version", version)
    }

    /// Set the display name
    ///
    /// # Errors
    ///
    /// Returns an error if the document can no longer be parsed.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.set_child_text("name", name)
    }

    /// Write back to the file it was read from
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self) -> Result<()> {
        fs::write(&self.path, &self.text)
            .map_err(|e| CreateError::io("Failed to write manifest", &self.path, e))
    }

    fn document(&self) -> Result<Document<'_>> {
        Document::parse(&self.text).map_err(|e| CreateError::manifest(&self.path, e.to_string()))
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        let doc = self.document().ok()?;
        doc.root_element().attribute(name).map(ToString::to_string)
    }

    fn child_text(&self, name: &str) -> Option<String> {
        let doc = self.document().ok()?;
        let child = find_child(doc.root_element(), name)?;
        let text: String = child
            .descendants()
            .filter(Node::is_text)
            .filter_map(|n| n.text())
            .collect();
        Some(text.trim().to_string())
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let splice = {
            let doc = self.document()?;
            let root = doc.root_element();
            let escaped = escape(value, true);

            match root
                .attributes()
                .find(|a| a.name() == name && a.namespace().is_none())
            {
                Some(attr) => Splice {
                    range: attr.range_value(),
                    replacement: escaped,
                },
                None => {
                    let at = start_tag_name_end(&self.text, root.range().start);
                    Splice {
                        range: at..at,
                        replacement: format!(" {name}=\"{escaped}\""),
                    }
                }
            }
        };

        self.apply(splice)
    }

    fn set_child_text(&mut self, name: &str, value: &str) -> Result<()> {
        let splice = {
            let doc = self.document()?;
            let root = doc.root_element();
            let escaped = escape(value, false);

            match find_child(root, name) {
                Some(child) => {
                    let texts: Vec<Node<'_, '_>> =
                        child.children().filter(Node::is_text).collect();
                    let only_text = child.children().all(|n| n.is_text());
                    match texts.as_slice() {
                        [text] if only_text => Splice {
                            range: text.range(),
                            replacement: escaped,
                        },
                        _ => Splice {
                            range: child.range(),
                            replacement: format!("<{name}>{escaped}</{name}>"),
                        },
                    }
                }
                None => insert_first_child(
                    &self.text,
                    root,
                    &format!("\n    <{name}>{escaped}</{name}>"),
                ),
            }
        };

        self.apply(splice)
    }

    fn apply(&mut self, splice: Splice) -> Result<()> {
        let mut text = self.text.clone();
        text.replace_range(splice.range, &splice.replacement);
        Document::parse(&text).map_err(|e| CreateError::manifest(&self.path, e.to_string()))?;
        self.text = text;
        Ok(())
    }
}

fn find_child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

/// Splice that inserts `fragment` as the first child of `root`
fn insert_first_child(text: &str, root: Node<'_, '_>, fragment: &str) -> Splice {
    if let Some(first) = root.first_child() {
        let at = first.range().start;
        return Splice {
            range: at..at,
            replacement: fragment.to_string(),
        };
    }

    let range = root.range();
    let element = &text[range.clone()];
    if element.ends_with("/>") {
        // `<widget .../>` becomes `<widget ...>fragment\n</widget>`
        let tag = &text[range.start + 1..start_tag_name_end(text, range.start)];
        Splice {
            range: range.end - 2..range.end,
            replacement: format!(">{fragment}\n</{tag}>"),
        }
    } else {
        let at = element
            .rfind("</")
            .map_or(range.end, |offset| range.start + offset);
        Splice {
            range: at..at,
            replacement: format!("{fragment}\n"),
        }
    }
}

/// Byte offset just past the element name of the start tag opening at `start`
fn start_tag_name_end(text: &str, start: usize) -> usize {
    text[start + 1..]
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .map_or(text.len(), |offset| start + 1 + offset)
}

fn escape(value: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
