/// A single frame of a stack trace, as reported by the host runtime.
///
/// Lines and columns are 1-based.
pub trait CallSite {
    fn file_name(&self) -> Option<&str>;
    fn line_number(&self) -> Option<u32>;
    fn column_number(&self) -> Option<u32>;
    fn function_name(&self) -> Option<&str>;
    fn method_name(&self) -> Option<&str>;

    /// The name displayed for this frame.
    fn display_name(&self) -> &str {
        self.function_name()
            .filter(|name| !name.is_empty())
            .or_else(|| self.method_name().filter(|name| !name.is_empty()))
            .unwrap_or("<anonymous>")
    }
}

/// An owned [`CallSite`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
    pub function_name: Option<String>,
    pub method_name: Option<String>,
}

impl Frame {
    /// Creates a frame at the given location.
    pub fn new(file_name: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file_name: Some(file_name.into()),
            line_number: Some(line),
            column_number: Some(column),
            ..Default::default()
        }
    }

    /// Sets the function name of this frame.
    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }
}

impl CallSite for Frame {
    fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
    fn line_number(&self) -> Option<u32> {
        self.line_number
    }
    fn column_number(&self) -> Option<u32> {
        self.column_number
    }
    fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }
    fn method_name(&self) -> Option<&str> {
        self.method_name.as_deref()
    }
}

/// The error a stack trace is being formatted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub name: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// The file name of `site`, `None` if it is missing or empty.
pub(crate) fn known_file(site: &dyn CallSite) -> Option<&str> {
    site.file_name().filter(|file| !file.is_empty())
}

/// Hosts report `0` for lines and columns they don't know.
pub(crate) fn known_position(value: Option<u32>) -> Option<u32> {
    value.filter(|&value| value != 0)
}

/// Renders a frame with its unmapped coordinates, using `?` for missing values.
pub(crate) fn format_raw(site: &dyn CallSite) -> String {
    let name = site.display_name();
    let file = known_file(site).unwrap_or("unknown");
    let line = known_position(site.line_number())
        .map_or_else(|| "?".to_owned(), |l| l.to_string());
    let column = known_position(site.column_number())
        .map_or_else(|| "?".to_owned(), |c| c.to_string());
    format!("{name} ({file}:{line}:{column})")
}

/// Joins the error header with the rendered `frames`.
pub(crate) fn format_trace<I>(error: &ErrorInfo, frames: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let frames: Vec<_> = frames
        .into_iter()
        .map(|frame| format!("    at {frame}"))
        .collect();
    format!("{}: {}\n{}", error.name, error.message, frames.join("\n"))
}
