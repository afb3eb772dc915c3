//! String keyed caches used to memoize search results
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use log::info;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A string keyed store of string values.
///
/// The engine only needs `has`, `get` and `set`. A miss is never an error.
pub trait Cache {
    /// Returns `true` if there is a value stored under `key`
    fn has(&self, key: &str) -> bool;

    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str);

    /// Removes the value stored under `key`
    fn remove(&mut self, key: &str);

    /// Stores `value` under `key` unless there is already a value there. Returns `true` if the
    /// value was stored.
    fn add(&mut self, key: &str, value: &str) -> bool {
        if self.has(key) {
            false
        } else {
            self.set(key, value);
            true
        }
    }

    /// Writes the cache to durable storage, if it has any.
    fn persist(&mut self) -> Result<()> {
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A cache held in memory only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCache {
    map: HashMap<String, String>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored values
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every stored value
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl Cache for MemoryCache {
    fn has(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A cache backed by a JSON file holding a single object of strings
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    inner: MemoryCache,
}

impl FileCache {
    /// Opens the cache file at `path`, creating an empty one if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or created, or doesn't hold a JSON object of
    /// strings.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut cache = FileCache {
            path: path.as_ref().to_owned(),
            inner: MemoryCache::new(),
        };

        if cache.path.exists() {
            cache.load()?;
        } else {
            cache.save()?;
        }

        Ok(cache)
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of stored values
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Replaces the contents of the cache with the contents of the file
    pub fn load(&mut self) -> Result<()> {
        let text = fs::read_to_string(&self.path)?;
        let map: HashMap<String, String> = if text.trim().is_empty() {
            HashMap::new()
        } else {
            serde_json::from_str(&text)?
        };

        info!("loaded {} cached values from {}", map.len(), self.path.display());
        self.inner.map = map;

        Ok(())
    }

    /// Writes the contents of the cache to the file
    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string(&self.inner.map)?;
        fs::write(&self.path, text)?;
        info!("saved {} cached values to {}", self.inner.len(), self.path.display());

        Ok(())
    }

    /// Removes every value, both in memory and in the file
    pub fn delete(&mut self) -> Result<()> {
        self.inner.clear();
        self.save()
    }
}

impl Cache for FileCache {
    fn has(&self, key: &str) -> bool {
        self.inner.has(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.inner.remove(key)
    }

    fn persist(&mut self) -> Result<()> {
        self.save()
    }
}

/// A cache shared between threads
impl<C: Cache> Cache for Arc<Mutex<C>> {
    fn has(&self, key: &str) -> bool {
        self.lock().unwrap_or_else(|e| e.into_inner()).has(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.lock().unwrap_or_else(|e| e.into_inner()).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.lock().unwrap_or_else(|e| e.into_inner()).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.lock().unwrap_or_else(|e| e.into_inner()).remove(key)
    }

    fn persist(&mut self) -> Result<()> {
        self.lock().unwrap_or_else(|e| e.into_inner()).persist()
    }
}

/// A borrowed cache
impl<C: Cache> Cache for &mut C {
    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }

    fn persist(&mut self) -> Result<()> {
        (**self).persist()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// An error reading or writing a cache file
#[derive(Debug)]
pub enum Error {
    /// The file couldn't be read or written
    Io(io::Error),
    /// The file doesn't hold a JSON object of strings
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "cache file: {}", err),
            Error::Json(err) => write!(f, "cache file: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// The result type for cache files
pub type Result<T> = std::result::Result<T, Error>;
