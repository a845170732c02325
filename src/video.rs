//! Frame sources.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    image::{self, Image},
    timer::Timer,
};

/// Something that produces a sequence of video frames.
pub trait FrameSource {
    /// Reads the next frame, or returns `None` once the source is exhausted.
    fn read(&mut self) -> anyhow::Result<Option<Image>>;
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn read(&mut self) -> anyhow::Result<Option<Image>> {
        (**self).read()
    }
}

/// Reads frames from a directory of PNG and JPEG images, in file name order.
///
/// Files with other extensions are skipped. Sub-directories are not searched.
pub struct ImageSequence {
    paths: Vec<PathBuf>,
    next: usize,
    t_decode: Timer,
}

impl ImageSequence {
    pub fn open<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        Self::open_impl(dir.as_ref())
    }

    fn open_impl(dir: &Path) -> anyhow::Result<Self> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("failed to read frame directory '{}'", dir.display()))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && image::is_supported_path(&path) {
                paths.push(path);
            } else {
                log::trace!("skipping '{}'", path.display());
            }
        }
        paths.sort();
        log::debug!("found {} frames in '{}'", paths.len(), dir.display());

        Ok(Self {
            paths,
            next: 0,
            t_decode: Timer::new("decode"),
        })
    }

    /// Returns the total number of frames in the sequence.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the path of the frame that was returned last.
    pub fn current_path(&self) -> Option<&Path> {
        self.next
            .checked_sub(1)
            .and_then(|i| self.paths.get(i))
            .map(|p| p.as_path())
    }

    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_decode]
    }
}

impl FrameSource for ImageSequence {
    fn read(&mut self) -> anyhow::Result<Option<Image>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        let image = self.t_decode.time(|| Image::load(path))?;
        self.next += 1;
        Ok(Some(image))
    }
}
