use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    /// Input document could not be parsed or is structurally invalid.
    Input(String),
    /// Page geometry leaves no usable drawing area.
    Geometry(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "i/o error: {e}"),
            Error::Input(msg) => write!(f, "invalid input: {msg}"),
            Error::Geometry(msg) => write!(f, "invalid page geometry: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
