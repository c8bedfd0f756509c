//! Streaming `FeatureCollection` output.

use kmlstream_core::{Feature, Result};
use std::io::Write;

const OPEN: &[u8] = b"{\"type\": \"FeatureCollection\", \"features\":[\n";
const SEPARATOR: &[u8] = b"\n,\n";
const CLOSE: &[u8] = b"\n]}\n";

/// Writes features into a `FeatureCollection` envelope one at a time, so
/// output never has to hold more than a single feature.
pub struct FeatureCollectionWriter<W: Write> {
    inner: W,
    pretty: bool,
    count: usize,
}

impl<W: Write> FeatureCollectionWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pretty: false,
            count: 0,
        }
    }

    /// Pretty-print each feature.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Number of features written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn write_feature(&mut self, feature: &Feature) -> Result<()> {
        self.inner
            .write_all(if self.count == 0 { OPEN } else { SEPARATOR })?;
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.inner, feature)?;
        } else {
            serde_json::to_writer(&mut self.inner, feature)?;
        }
        self.count += 1;
        Ok(())
    }

    /// Closes the envelope, flushes, and returns the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        if self.count == 0 {
            self.inner.write_all(OPEN)?;
        }
        self.inner.write_all(CLOSE)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writes every feature of `features` as one collection.
///
/// Stops at the first error from either the source or the sink.
pub fn write_collection<I, W>(features: I, writer: W, pretty: bool) -> Result<usize>
where
    I: IntoIterator<Item = Result<Feature>>,
    W: Write,
{
    let mut writer = FeatureCollectionWriter::new(writer).pretty(pretty);
    for feature in features {
        writer.write_feature(&feature?)?;
    }
    let count = writer.count();
    writer.finish()?;
    Ok(count)
}
