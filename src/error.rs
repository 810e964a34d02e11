use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    /// A required package part is absent (e.g. styles or relationships).
    MissingPart(String),
    /// A part's bytes are not valid UTF-8.
    PartEncoding(String),
    ParagraphOutOfRange {
        index: usize,
        count: usize,
    },
    /// An offset range could not be mapped onto the paragraph's leaves.
    UnresolvedSpan {
        start: usize,
        end: usize,
    },
    /// A node the structural edit depends on is missing from the tree.
    NodeNotFound(&'static str),
    /// The editor was opened from bytes and has no backing path to save to.
    NoBackingPath,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Zip(e) => write!(f, "zip error: {e}"),
            Error::Xml(e) => write!(f, "xml parse error: {e}"),
            Error::MissingPart(name) => write!(f, "missing required part: {name}"),
            Error::PartEncoding(name) => write!(f, "part is not valid utf-8: {name}"),
            Error::ParagraphOutOfRange { index, count } => {
                write!(f, "paragraph index {index} out of range (document has {count})")
            }
            Error::UnresolvedSpan { start, end } => {
                write!(f, "character range {start}..{end} does not resolve to paragraph text")
            }
            Error::NodeNotFound(what) => write!(f, "{what} not found in document tree"),
            Error::NoBackingPath => write!(f, "document was opened from bytes; use save_as"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Zip(e) => Some(e),
            Error::Xml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}
