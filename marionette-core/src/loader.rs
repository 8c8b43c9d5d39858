/// Named mesh sources and the loader that turns them into [`MeshData`]
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::geometry::MeshData;
use crate::obj::parse_obj;

/// Provides the raw text of a named asset
pub trait AssetSource {
    fn read(&self, name: &str) -> io::Result<String>;
}

/// Reads assets from a directory on disk
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.root.join(name))
    }
}

/// Assets held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.assets.insert(name.into(), text.into());
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl AssetSource for MemorySource {
    fn read(&self, name: &str) -> io::Result<String> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no asset named `{name}`")))
    }
}

/// Loads and normalizes meshes from an [`AssetSource`].
///
/// Every call parses the source again, so loading the same name twice yields
/// two independent meshes.
pub struct MeshLoader<'a, S: AssetSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: AssetSource + ?Sized> MeshLoader<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    pub fn load(&self, name: &str) -> Result<MeshData> {
        let text = self.source.read(name).map_err(|source| Error::Io {
            name: name.to_string(),
            source,
        })?;

        let mesh = parse_obj(&text).map_err(|source| Error::Parse {
            name: name.to_string(),
            source,
        })?;

        log::debug!(
            "loaded `{}`: {} vertices, {} triangles",
            name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}
