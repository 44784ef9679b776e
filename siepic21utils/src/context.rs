/// Enumerated conversion contexts.
/// Pushed and popped by the importers and exporters, and reported in their errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorContext {
    Library(String),
    Fixture(String),
    Cell(String),
    Instance(String),
    Array(String),
    Units,
    Geometry,
    Label,
    Unknown,
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Library(s) => write!(f, "library `{}`", s),
            Self::Fixture(s) => write!(f, "fixture `{}`", s),
            Self::Cell(s) => write!(f, "cell `{}`", s),
            Self::Instance(s) => write!(f, "instance of `{}`", s),
            Self::Array(s) => write!(f, "array of `{}`", s),
            Self::Units => write!(f, "units"),
            Self::Geometry => write!(f, "geometry"),
            Self::Label => write!(f, "label"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
