//! Mirroring a folder into the project descriptor's group/file tree.
//!
//! EWARM shows a project as a tree of `<group>` elements holding `<file>`
//! leaves; each carries a `<name>` child. A folder on disk becomes one group
//! and every file below it a `<file>` whose name is a `$PROJ_DIR$`-relative
//! path:
//!
//! ```text
//! drivers/                 <group><name>drivers</name>
//!   a.c                      <file><name>$PROJ_DIR$/../source/drivers/a.c</name></file>
//!   sub/                     <group><name>sub</name>
//!     b.c                      <file><name>$PROJ_DIR$/../source/drivers/sub/b.c</name></file>
//!                            </group>
//!                          </group>
//! ```
//!
//! The tree is built in memory ([`FolderSynthesizer`]) and then written into
//! the descriptor in a single streaming pass ([`splice`]).

use std::io::Write;
use std::ops::Range;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, trace};

use super::{EwarmError, EwarmResult};
use crate::fsutil;

/// Encoding declared in, and used for, every written descriptor.
pub const DESCRIPTOR_ENCODING: &str = "iso-8859-1";

/// Indentation for new nodes when the root has no indented children.
const DEFAULT_INDENT: &str = "    ";

/// One node of the descriptor's virtual file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A folder.
    Group {
        /// Display name.
        name: String,
        /// Sub-groups and files, in folder order.
        children: Vec<Node>,
    },
    /// A source file.
    File {
        /// Toolchain-relative path.
        path: String,
    },
}

impl Node {
    /// Element tag for this node.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Group { .. } => "group",
            Self::File { .. } => "file",
        }
    }

    /// Text of the node's `<name>` child.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Group { name, .. } => name,
            Self::File { path } => path,
        }
    }

    /// Children of a group; empty for files.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Group { children, .. } => children,
            Self::File { .. } => &[],
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Self::count).sum::<usize>()
    }

    /// Number of nesting levels in this subtree; a lone node has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Collects the paths of all file leaves, depth first.
    #[must_use]
    pub fn file_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_files(&mut paths);
        paths
    }

    fn collect_files<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::File { path } => out.push(path),
            Self::Group { children, .. } => {
                for child in children {
                    child.collect_files(out);
                }
            }
        }
    }
}

/// File-name suffixes to leave out of the descriptor.
///
/// Parsed from the command line form `o/obj/`: entries are separated by `/`
/// and empty entries are dropped. Matching is a plain suffix test on the
/// file name, so `o` also matches `a.o`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
    suffixes: Vec<String>,
}

impl IgnoreList {
    /// Parses a slash-separated suffix list.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self {
            suffixes: list
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// The parsed suffixes.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// Returns `true` if `file_name` ends with any listed suffix.
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

/// Builds [`Node`] trees from folders.
#[derive(Debug, Clone)]
pub struct FolderSynthesizer {
    prefix: String,
    ignore: IgnoreList,
}

impl FolderSynthesizer {
    /// Creates a synthesizer writing file paths below `prefix`
    /// (e.g. `$PROJ_DIR$/../source`).
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ignore: IgnoreList::default(),
        }
    }

    /// Sets the suffixes to skip.
    #[must_use]
    pub fn with_ignore(mut self, ignore: IgnoreList) -> Self {
        self.ignore = ignore;
        self
    }

    /// Mirrors `folder` into a group named after its base name.
    ///
    /// Entries are visited in name order. File paths are
    /// `<prefix>/<base name>/<sub folders>/<file>`.
    ///
    /// # Errors
    ///
    /// Returns [`EwarmError::FolderNotFound`] if `folder` is not a folder or
    /// has no base name, or an I/O error if a folder cannot be listed.
    pub fn synthesize(&self, folder: &Path) -> EwarmResult<Node> {
        if !folder.is_dir() {
            return Err(EwarmError::folder_not_found(folder));
        }
        let name = fsutil::base_name(folder)
            .ok_or_else(|| EwarmError::folder_not_found(folder))?
            .to_string_lossy()
            .into_owned();

        let relative = format!("{}/{name}", self.prefix);
        let children = self.walk(folder, &relative)?;
        Ok(Node::Group { name, children })
    }

    fn walk(&self, folder: &Path, relative: &str) -> EwarmResult<Vec<Node>> {
        let mut nodes = Vec::new();
        for entry in fsutil::sorted_entries(folder)? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if path.is_dir() {
                let children = self.walk(&path, &format!("{relative}/{name}"))?;
                nodes.push(Node::Group { name, children });
            } else if self.ignore.matches(&name) {
                trace!(file = %path.display(), "Ignored");
            } else {
                nodes.push(Node::File {
                    path: format!("{relative}/{name}"),
                });
            }
        }
        Ok(nodes)
    }
}

/// Errors raised while streaming a descriptor through the XML reader.
#[derive(Debug, thiserror::Error)]
enum SpliceError {
    #[error("{0}")]
    Xml(#[from] quick_xml::Error),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("document has no root element")]
    NoRoot,
    #[error("document is too large")]
    Offset,
}

/// Where the new nodes go.
enum Edit {
    /// Before the root end tag, at byte `at`. `compact` is set when no line
    /// break precedes the end tag.
    Insert { at: usize, compact: bool },
    /// The root is an empty element spanning `range`; it is opened, filled
    /// and closed again.
    Expand { range: Range<usize>, name: String },
}

/// Appends `nodes` as the last children of the root element of `document`.
///
/// Only two things change: the XML declaration becomes
/// `<?xml version="1.0" encoding="iso-8859-1"?>` and the new nodes are
/// inserted before the root end tag. Every other byte of `document` is kept,
/// including whitespace and empty values. The new nodes are indented like
/// the root's existing children (four spaces when there are none). Existing
/// groups are left untouched, even when a new group has the same name.
///
/// # Errors
///
/// Returns [`EwarmError::Xml`] (attributed to `path`) if the document is not
/// well-formed or has no root element.
pub fn splice(document: &str, nodes: &[Node], path: &Path) -> EwarmResult<String> {
    splice_events(document, nodes).map_err(|e| EwarmError::xml(path, e.to_string()))
}

fn splice_events(document: &str, nodes: &[Node]) -> Result<String, SpliceError> {
    let mut reader = Reader::from_str(document);

    let mut declaration = None;
    let mut child_indent: Option<&str> = None;
    let mut trailing_space: Option<usize> = None;
    let mut depth = 0usize;
    let mut edit = None;

    loop {
        let start = offset(&reader)?;
        let event = reader.read_event()?;
        let end = offset(&reader)?;
        let text = &document[start..end];

        let mut space_before_next = None;
        match event {
            Event::Eof => break,
            Event::Decl(_) if depth == 0 => declaration = Some(start..end),
            Event::Text(_) if depth == 1 && text.trim().is_empty() => {
                if child_indent.is_none() {
                    child_indent = text.rfind('\n').map(|i| &text[i + 1..]);
                }
                space_before_next = Some(start);
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 0 && edit.is_none() {
                    edit = Some(Edit::Insert {
                        at: trailing_space.unwrap_or(start),
                        compact: trailing_space.is_none(),
                    });
                }
            }
            Event::Empty(tag) if depth == 0 && edit.is_none() => {
                edit = Some(Edit::Expand {
                    range: start..end,
                    name: String::from_utf8_lossy(tag.name().as_ref()).into_owned(),
                });
            }
            _ => {}
        }
        trailing_space = space_before_next;
    }

    let edit = edit.ok_or(SpliceError::NoRoot)?;
    let indent = child_indent
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INDENT);
    let newline = if document.contains("\r\n") { "\r\n" } else { "\n" };
    let body = render_nodes(nodes, indent, newline)?;

    let mut out = String::with_capacity(document.len() + body.len() + 64);
    let head_end = match declaration {
        Some(range) => {
            out.push_str(&document[..range.start]);
            out.push_str(&render_declaration()?);
            range.end
        }
        None => {
            out.push_str(&render_declaration()?);
            out.push_str(newline);
            0
        }
    };

    match edit {
        Edit::Insert { at, compact } => {
            out.push_str(&document[head_end..at]);
            out.push_str(&body);
            if compact {
                out.push_str(newline);
            }
            out.push_str(&document[at..]);
        }
        Edit::Expand { range, name } => {
            let open = document[range.clone()]
                .trim_end_matches('>')
                .trim_end_matches('/')
                .trim_end();
            out.push_str(&document[head_end..range.start]);
            out.push_str(open);
            out.push('>');
            out.push_str(&body);
            out.push_str(&format!("{newline}</{name}>"));
            out.push_str(&document[range.end..]);
        }
    }
    Ok(out)
}

/// Byte offset of the reader in its input.
fn offset(reader: &Reader<&[u8]>) -> Result<usize, SpliceError> {
    usize::try_from(reader.buffer_position()).map_err(|_| SpliceError::Offset)
}

fn render_declaration() -> Result<String, SpliceError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some(DESCRIPTOR_ENCODING),
        None,
    )))?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Renders each node on its own lines, every line prefixed by `newline` and
/// `indent`, and nesting levels indented by `indent` again.
fn render_nodes(nodes: &[Node], indent: &str, newline: &str) -> Result<String, SpliceError> {
    let unit = indent.as_bytes().first().copied().unwrap_or(b' ');
    let mut out = String::new();
    for node in nodes {
        let mut writer = Writer::new_with_indent(Vec::new(), unit, indent.len());
        write_node(&mut writer, node)?;
        let xml = String::from_utf8_lossy(&writer.into_inner()).into_owned();
        for line in xml.trim_start_matches('\n').lines() {
            out.push_str(newline);
            out.push_str(indent);
            out.push_str(line);
        }
    }
    Ok(out)
}

fn write_nodes<W: Write>(writer: &mut Writer<W>, nodes: &[Node]) -> Result<(), SpliceError> {
    for node in nodes {
        write_node(writer, node)?;
    }
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), SpliceError> {
    writer.write_event(Event::Start(BytesStart::new(node.tag())))?;

    writer.write_event(Event::Start(BytesStart::new("name")))?;
    writer.write_event(Event::Text(BytesText::new(node.name())))?;
    writer.write_event(Event::End(BytesEnd::new("name")))?;

    write_nodes(writer, node.children())?;

    writer.write_event(Event::End(BytesEnd::new(node.tag())))?;
    Ok(())
}

/// Appends `nodes` to the root of the descriptor file at `path`, in place.
///
/// The file is decoded as its BOM or declaration says and written back in
/// the descriptor codepage, with numeric character references for anything
/// outside it.
///
/// # Errors
///
/// Returns [`EwarmError::FileNotFound`] if `path` is missing,
/// [`EwarmError::Xml`] if it is not well-formed, or an I/O error if it
/// cannot be rewritten.
pub fn splice_into_file(path: &Path, nodes: &[Node]) -> EwarmResult<()> {
    let document = fsutil::read_xml(path)?;
    let updated = splice(&document, nodes, path)?;
    fsutil::write_text(path, &updated)?;
    debug!(
        project = %path.display(),
        nodes = nodes.iter().map(Node::count).sum::<usize>(),
        "Descriptor updated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn drivers_tree(root: &Path) -> std::path::PathBuf {
        let drivers = root.join("drivers");
        fs::create_dir_all(drivers.join("sub")).unwrap();
        fs::write(drivers.join("a.c"), "").unwrap();
        fs::write(drivers.join("a.o"), "").unwrap();
        fs::write(drivers.join("sub/b.c"), "").unwrap();
        drivers
    }

    #[test]
    fn ignore_list_parsing() {
        let ignore = IgnoreList::parse("o/obj/");
        assert_eq!(ignore.suffixes(), ["o", "obj"]);
        assert!(ignore.matches("a.o"));
        assert!(ignore.matches("lib.obj"));
        assert!(!ignore.matches("a.c"));
        assert!(!IgnoreList::parse("").matches("a.c"));
        assert!(!IgnoreList::parse("/").matches("a.c"));
    }

    #[test]
    fn mirrors_nesting_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let drivers = drivers_tree(dir.path());

        let tree = FolderSynthesizer::new("$PROJ_DIR$/../source")
            .with_ignore(IgnoreList::parse("o/obj/"))
            .synthesize(&drivers)
            .unwrap();

        assert_eq!(
            tree,
            Node::Group {
                name: "drivers".to_string(),
                children: vec![
                    Node::File {
                        path: "$PROJ_DIR$/../source/drivers/a.c".to_string()
                    },
                    Node::Group {
                        name: "sub".to_string(),
                        children: vec![Node::File {
                            path: "$PROJ_DIR$/../source/drivers/sub/b.c".to_string()
                        }],
                    },
                ],
            }
        );
        assert_eq!(tree.count(), 4);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn without_ignore_list_every_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let drivers = drivers_tree(dir.path());

        let tree = FolderSynthesizer::new("$PROJ_DIR$/../source")
            .synthesize(&drivers)
            .unwrap();
        assert_eq!(
            tree.file_paths(),
            [
                "$PROJ_DIR$/../source/drivers/a.c",
                "$PROJ_DIR$/../source/drivers/a.o",
                "$PROJ_DIR$/../source/drivers/sub/b.c",
            ]
        );
    }

    #[test]
    fn ignore_list_never_drops_groups() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("lib");
        fs::create_dir_all(root.join("obj")).unwrap();
        fs::write(root.join("obj/x.obj"), "").unwrap();

        let tree = FolderSynthesizer::new("P")
            .with_ignore(IgnoreList::parse("obj"))
            .synthesize(&root)
            .unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.children()[0].name(), "obj");
        assert!(tree.children()[0].children().is_empty());
    }

    #[test]
    fn empty_folder_gives_childless_group() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let tree = FolderSynthesizer::new("P").synthesize(&empty).unwrap();
        assert_eq!(
            tree,
            Node::Group {
                name: "empty".to_string(),
                children: Vec::new()
            }
        );
    }

    #[test]
    fn trailing_slash_is_ignored_for_the_group_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("hal")).unwrap();
        let with_slash = format!("{}/hal/", dir.path().display());

        let tree = FolderSynthesizer::new("P")
            .synthesize(Path::new(&with_slash))
            .unwrap();
        assert_eq!(tree.name(), "hal");
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let result = FolderSynthesizer::new("P").synthesize(&dir.path().join("nope"));
        assert!(matches!(result, Err(EwarmError::FolderNotFound { .. })));
    }

    #[test]
    fn splice_appends_after_existing_groups() {
        let document = r#"<?xml version="1.0" encoding="iso-8859-1"?>

<project>
  <fileVersion>3</fileVersion>
  <group>
    <name>drivers</name>
  </group>
</project>
"#;
        let nodes = [Node::Group {
            name: "drivers".to_string(),
            children: vec![Node::File {
                path: "$PROJ_DIR$/../source/drivers/a&b.c".to_string(),
            }],
        }];

        let out = splice(document, &nodes, Path::new("app.ewp")).unwrap();
        let expected = r#"<?xml version="1.0" encoding="iso-8859-1"?>

<project>
  <fileVersion>3</fileVersion>
  <group>
    <name>drivers</name>
  </group>
  <group>
    <name>drivers</name>
    <file>
      <name>$PROJ_DIR$/../source/drivers/a&amp;b.c</name>
    </file>
  </group>
</project>
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn splice_keeps_existing_values_verbatim() {
        let document = "<project><option><name>CCDefines</name><state></state><state> x </state></option></project>";
        let nodes = [Node::Group {
            name: "g".to_string(),
            children: Vec::new(),
        }];

        let out = splice(document, &nodes, Path::new("app.ewp")).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n\
             <project><option><name>CCDefines</name><state></state><state> x </state></option>\n\
             \x20   <group>\n\
             \x20       <name>g</name>\n\
             \x20   </group>\n\
             </project>"
        );
    }

    #[test]
    fn splice_follows_tab_indentation() {
        let document = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project>\n\t<group>\n\t\t<name>user</name>\n\t</group>\n</project>\n";
        let nodes = [Node::Group {
            name: "hal".to_string(),
            children: vec![Node::File {
                path: "P/hal/gpio.c".to_string(),
            }],
        }];

        let out = splice(document, &nodes, Path::new("app.ewp")).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<project>\n\t<group>\n\t\t<name>user</name>\n\t</group>\n\
             \t<group>\n\t\t<name>hal</name>\n\t\t<file>\n\t\t\t<name>P/hal/gpio.c</name>\n\t\t</file>\n\t</group>\n</project>\n"
        );
    }

    #[test]
    fn splice_keeps_crlf_line_endings() {
        let document = "<project>\r\n  <group>\r\n    <name>user</name>\r\n  </group>\r\n</project>\r\n";
        let nodes = [Node::Group {
            name: "hal".to_string(),
            children: Vec::new(),
        }];

        let out = splice(document, &nodes, Path::new("app.ewp")).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\r\n<project>\r\n  <group>\r\n    <name>user</name>\r\n  </group>\r\n\
             \x20 <group>\r\n    <name>hal</name>\r\n  </group>\r\n</project>\r\n"
        );
    }

    #[test]
    fn splice_into_empty_root() {
        let nodes = [Node::Group {
            name: "user".to_string(),
            children: Vec::new(),
        }];
        let out = splice("<project/>\n", &nodes, Path::new("app.ewp")).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<project>\n    <group>\n        <name>user</name>\n    </group>\n</project>\n"
        );
    }

    #[test]
    fn utf8_descriptor_is_rewritten_as_latin1() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ewp");
        let document = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<project>\n  <group>\n    <name>caf\u{e9} \u{3a9}</name>\n  </group>\n</project>\n";
        fs::write(&path, document.as_bytes()).unwrap();

        let nodes = [Node::Group {
            name: "r\u{e9}seau".to_string(),
            children: Vec::new(),
        }];
        splice_into_file(&path, &nodes).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<project>"));
        assert!(bytes.windows(5).any(|w| w == b"caf\xe9 "));
        assert!(bytes.windows(6).any(|w| w == b"&#937;"));
        assert!(bytes.windows(6).any(|w| w == b"r\xe9seau"));
        assert!(!bytes.windows(2).any(|w| w == [0xc3, 0xa9]));
    }

    #[test]
    fn latin1_descriptor_bytes_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.ewp");
        let mut document = b"<?xml version=\"1.0\" encoding=\"iso-8859-1\"?>\n<project>\n  <state>caf\xe9 \x80</state>\n".to_vec();
        document.extend_from_slice(b"</project>\n");
        fs::write(&path, &document).unwrap();

        let nodes = [Node::Group {
            name: "x".to_string(),
            children: Vec::new(),
        }];
        splice_into_file(&path, &nodes).unwrap();

        let bytes = fs::read(&path).unwrap();
        let kept = &document[..document.len() - b"\n</project>\n".len()];
        assert!(bytes.starts_with(kept));
        assert!(bytes.ends_with(b"  <group>\n    <name>x</name>\n  </group>\n</project>\n"));
    }

    #[test]
    fn splice_rejects_malformed_documents() {
        let nodes = [Node::File {
            path: "x.c".to_string(),
        }];
        let result = splice("<project><group></project>", &nodes, Path::new("bad.ewp"));
        assert!(matches!(result, Err(EwarmError::Xml { .. })));

        let result = splice("", &nodes, Path::new("empty.ewp"));
        assert!(matches!(result, Err(EwarmError::Xml { .. })));
    }
}
