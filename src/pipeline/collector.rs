//! Growable, ordered store of discovered paths.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::Clip64Error;
use crate::utils::config::PATH_LIMIT;

/// Destination for paths found by [`walk`](super::walk::walk).
pub trait Accumulator {
    fn append(&mut self, path: PathBuf) -> Result<(), Clip64Error>;
}

/// Paths in discovery order. `len() <= capacity()` always holds and capacity never shrinks.
#[derive(Debug)]
pub struct PathCollector {
    paths: Vec<PathBuf>,
    capacity: usize,
    path_limit: usize,
}

impl PathCollector {
    /// Empty collector with room for `initial_capacity` paths (at least 1).
    pub fn new(initial_capacity: usize) -> Result<Self, Clip64Error> {
        Self::with_path_limit(initial_capacity, PATH_LIMIT)
    }

    /// Same as [`new`](Self::new) with a custom path-length limit instead of the platform one.
    pub fn with_path_limit(initial_capacity: usize, path_limit: usize) -> Result<Self, Clip64Error> {
        let capacity = initial_capacity.max(1);
        let mut paths = Vec::new();
        paths
            .try_reserve_exact(capacity)
            .map_err(|_| Clip64Error::OutOfMemory {
                requested: capacity,
            })?;
        Ok(Self {
            paths,
            capacity,
            path_limit,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path_limit(&self) -> usize {
        self.path_limit
    }

    /// Iterate stored paths in discovery order. Does not consume; may be called repeatedly.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    /// Next capacity when full: double, or `size + 1` when doubling exceeds the allocation limit.
    fn grown_capacity(&self) -> usize {
        let max_elems = isize::MAX as usize / std::mem::size_of::<PathBuf>();
        match self.capacity.checked_mul(2) {
            Some(doubled) if doubled <= max_elems => doubled,
            _ => self.paths.len() + 1,
        }
    }

    fn grow(&mut self) -> Result<(), Clip64Error> {
        let new_capacity = self.grown_capacity();
        self.paths
            .try_reserve_exact(new_capacity - self.paths.len())
            .map_err(|_| Clip64Error::OutOfMemory {
                requested: new_capacity,
            })?;
        debug!("collector grew {} -> {}", self.capacity, new_capacity);
        self.capacity = new_capacity;
        Ok(())
    }
}

/// Length used for the path-limit check: bytes of the platform encoding.
pub fn path_len(path: &Path) -> usize {
    path.as_os_str().as_encoded_bytes().len()
}

impl Accumulator for PathCollector {
    /// Checked before storing: an over-long path is rejected, never truncated.
    fn append(&mut self, path: PathBuf) -> Result<(), Clip64Error> {
        let len = path_len(&path);
        if len >= self.path_limit {
            return Err(Clip64Error::PathTooLong {
                path,
                len,
                limit: self.path_limit,
            });
        }
        if self.paths.len() == self.capacity {
            self.grow()?;
        }
        self.paths.push(path);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PathCollector {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
