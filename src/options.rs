use serde::Deserialize;

/// Host variables that turn on debug logging when set to anything but `"0"`.
const DEBUG_CONVARS: [&str; 2] = ["developer", "sv_fivem_debug"];

/// Configuration of the source map support.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Log loading of source maps and lifecycle events.
    pub debug: bool,
    /// Extension of generated files. Only frames in such files are mapped.
    pub generated_extension: String,
    /// Extension that replaces `generated_extension` in displayed source paths.
    pub original_extension: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            debug: false,
            generated_extension: ".js".into(),
            original_extension: ".ts".into(),
        }
    }
}

impl Options {
    /// Creates the default options, with debug logging configured from host variables.
    ///
    /// `convar` returns the value of the named host variable, if it is set.
    pub fn from_convars<F>(convar: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = DEBUG_CONVARS
            .iter()
            .any(|name| convar(name).is_some_and(|value| value != "0"));
        Self {
            debug,
            ..Default::default()
        }
    }
}
