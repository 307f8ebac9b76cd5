use std::cell::Cell;
use std::collections::HashMap;

/// Access to the text files of the host's resource bundles.
///
/// Hosts only allow reading files that belong to a resource, so this is the
/// only way source maps are loaded.
pub trait ResourceLoader {
    /// The name of the resource the running code belongs to.
    fn current_resource(&self) -> String;

    /// Loads the file at `path`, relative to the root of `resource`.
    fn load_text(&self, resource: &str, path: &str) -> Option<String>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for &L {
    fn current_resource(&self) -> String {
        (**self).current_resource()
    }

    fn load_text(&self, resource: &str, path: &str) -> Option<String> {
        (**self).load_text(resource, path)
    }
}

/// A [`ResourceLoader`] serving files from memory.
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    resource: String,
    files: HashMap<(String, String), String>,
    unavailable: Cell<bool>,
}

impl InMemoryLoader {
    /// Creates an empty loader for code running inside `resource`.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            ..Default::default()
        }
    }

    /// Adds a file to the current resource.
    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(self.resource.clone(), path, contents);
        self
    }

    /// Adds a file to an arbitrary resource.
    pub fn insert(
        &mut self,
        resource: impl Into<String>,
        path: impl Into<String>,
        contents: impl Into<String>,
    ) {
        self.files
            .insert((resource.into(), path.into()), contents.into());
    }

    /// Makes all further loads fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }
}

impl ResourceLoader for InMemoryLoader {
    fn current_resource(&self) -> String {
        self.resource.clone()
    }

    fn load_text(&self, resource: &str, path: &str) -> Option<String> {
        if self.unavailable.get() {
            return None;
        }
        self.files
            .get(&(resource.to_owned(), path.to_owned()))
            .cloned()
    }
}
