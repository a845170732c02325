//! Playback of recorded detection results.
//!
//! Recordings are [JSON Lines] files: every non-blank line holds one serialized
//! [`DetectionResult`], and line *n* belongs to the *n*-th frame passed to
//! [`LandmarkProvider::detect`]. This allows running the whole pipeline without a model, for
//! example on a folder of frames together with the landmarks a model produced for them earlier.
//!
//! [JSON Lines]: https://jsonlines.org/

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::{bail, Context};

use crate::landmark::DetectionResult;

use super::provider::{LandmarkProvider, PixelBuffer, ProviderOptions};

/// A [`LandmarkProvider`] that replays a recording instead of running a model.
///
/// The [`ProviderOptions`] are applied to the recorded hands the way a live model would apply
/// them: hands scoring below the active confidence threshold are dropped, and at most
/// `max_hands` hands are reported per frame.
pub struct ReplayProvider<R = BufReader<File>> {
    reader: R,
    source: String,
    options: ProviderOptions,
    line: String,
    line_no: usize,
    frames: usize,
    /// Whether the previous frame produced at least one hand.
    tracking: bool,
}

impl ReplayProvider {
    /// Opens the recording at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: ProviderOptions) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open recording '{}'", path.display()))?;
        let mut this = Self::from_reader(BufReader::new(file), options)?;
        this.source = path.display().to_string();
        Ok(this)
    }
}

impl<R: BufRead> ReplayProvider<R> {
    /// Creates a provider that reads the recording from `reader`.
    pub fn from_reader(reader: R, options: ProviderOptions) -> anyhow::Result<Self> {
        options.validate()?;
        Ok(Self {
            reader,
            source: String::from("<recording>"),
            options,
            line: String::new(),
            line_no: 0,
            frames: 0,
            tracking: false,
        })
    }

    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// Returns the number of frames replayed so far.
    pub fn frames_replayed(&self) -> usize {
        self.frames
    }

    fn next_recorded(&mut self) -> anyhow::Result<DetectionResult> {
        loop {
            self.line.clear();
            let read = self
                .reader
                .read_line(&mut self.line)
                .with_context(|| format!("failed to read from {}", self.source))?;
            if read == 0 {
                bail!(
                    "{} ended after {} frames, but another frame was requested",
                    self.source,
                    self.frames
                );
            }
            self.line_no += 1;

            let line = self.line.trim();
            if line.is_empty() {
                continue;
            }
            return serde_json::from_str(line).with_context(|| {
                format!("{}:{}: malformed detection result", self.source, self.line_no)
            });
        }
    }
}

impl<R: BufRead> LandmarkProvider for ReplayProvider<R> {
    fn detect(&mut self, frame: PixelBuffer<'_>) -> anyhow::Result<DetectionResult> {
        let mut result = self.next_recorded()?;
        let recorded = result.len();
        let threshold = self.options.threshold(self.tracking);
        result.retain_first(self.options.max_hands, |hand| hand.score() >= threshold);

        log::trace!(
            "replayed frame {} ({frame:?}): {} of {recorded} hands at threshold {threshold}",
            self.frames,
            result.len(),
        );
        self.tracking = !result.is_empty();
        self.frames += 1;
        Ok(result)
    }
}
