use std::path::PathBuf;

#[derive(Debug)]
pub enum DataProcessingError {
    ExpectedSlicesSameLength {
        expected: usize,
        other: usize,
        context: String,
    },
    InvalidPeak {
        index: usize,
        mz: f64,
        intensity: f64,
        context: String,
    },
    EmptyInput {
        context: Option<String>,
    },
    ScanRange {
        start: usize,
        end: usize,
        len: usize,
    },
    MalformedRecord {
        line_number: usize,
        line: String,
    },
}

impl std::fmt::Display for DataProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataProcessingError::ExpectedSlicesSameLength {
                expected,
                other,
                context,
            } => {
                write!(
                    f,
                    "Expected slices of the same length ({} vs {}): {}",
                    expected, other, context
                )
            }
            DataProcessingError::InvalidPeak {
                index,
                mz,
                intensity,
                context,
            } => {
                write!(
                    f,
                    "Invalid peak at index {} (mz: {}, intensity: {}): {}",
                    index, mz, intensity, context
                )
            }
            DataProcessingError::EmptyInput { context } => match context {
                Some(x) => write!(f, "Expected non-empty input: {}", x),
                None => write!(f, "Expected non-empty input"),
            },
            DataProcessingError::ScanRange { start, end, len } => {
                write!(
                    f,
                    "Invalid scan range [{}, {}) over {} spectra",
                    start, end, len
                )
            }
            DataProcessingError::MalformedRecord { line_number, line } => {
                write!(
                    f,
                    "Malformed candidate record at line {}: {:?}",
                    line_number, line
                )
            }
        }
    }
}

impl DataProcessingError {
    pub fn append_to_context(mut self, context: &str) -> Self {
        match &mut self {
            DataProcessingError::ExpectedSlicesSameLength {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::InvalidPeak {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::EmptyInput {
                context: owned_context,
            } => match owned_context {
                Some(x) => x.push_str(context),
                None => *owned_context = Some(context.to_string()),
            },
            DataProcessingError::ScanRange { .. } => {}
            DataProcessingError::MalformedRecord { .. } => {}
        }
        self
    }
}

#[derive(Debug)]
pub enum IsopairError {
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    ParseError {
        msg: String,
    },
    DataProcessingError(DataProcessingError),
}

impl std::fmt::Display for IsopairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IsopairError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "IO error on {:?}: {}", path, source)
                } else {
                    write!(f, "IO error: {}", source)
                }
            }
            IsopairError::ParseError { msg } => write!(f, "Parse error: {}", msg),
            IsopairError::DataProcessingError(e) => write!(f, "{}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, IsopairError>;

impl From<std::io::Error> for IsopairError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}

impl From<DataProcessingError> for IsopairError {
    fn from(x: DataProcessingError) -> Self {
        Self::DataProcessingError(x)
    }
}

impl From<std::num::ParseFloatError> for IsopairError {
    fn from(x: std::num::ParseFloatError) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}

impl From<csv::Error> for IsopairError {
    fn from(x: csv::Error) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}
