//! Suffix-selected compressed streams: `.gz` and `.bz2` files are
//! transparently (de)compressed, anything else passes through.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;

/// A write sink whose compression is chosen from the output path suffix.
pub enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
    Bzip2(BzEncoder<BufWriter<File>>),
}

impl Sink {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        let writer = BufWriter::new(file);
        Ok(match extension(path) {
            Some("gz") => Sink::Gzip(GzEncoder::new(writer, flate2::Compression::default())),
            Some("bz2") => Sink::Bzip2(BzEncoder::new(writer, bzip2::Compression::default())),
            _ => Sink::Plain(writer),
        })
    }

    /// Flush all buffered output and finalize the compressed container.
    pub fn finish(self) -> Result<()> {
        match self {
            Sink::Plain(mut w) => w.flush()?,
            Sink::Gzip(w) => {
                w.finish()?.flush()?;
            }
            Sink::Bzip2(w) => {
                w.finish()?.flush()?;
            }
        }
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
            Sink::Bzip2(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
            Sink::Bzip2(w) => w.flush(),
        }
    }
}

/// Open a possibly compressed input file as a buffered reader.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| anyhow!("Failed to open input file {}: {}", path.display(), e))?;
    Ok(match extension(path) {
        Some("gz") => Box::new(BufReader::new(GzDecoder::new(BufReader::new(file)))),
        Some("bz2") => Box::new(BufReader::new(BzDecoder::new(BufReader::new(file)))),
        _ => Box::new(BufReader::new(file)),
    })
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn round_trip(name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut sink = Sink::create(&path).unwrap();
        writeln!(sink, "S=2").unwrap();
        writeln!(sink, "G=3 N=1 P=3 W=2 17 23=2,").unwrap();
        sink.finish().unwrap();

        let mut text = String::new();
        open_source(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "S=2\nG=3 N=1 P=3 W=2 17 23=2,\n");
    }

    #[test]
    fn test_plain_round_trip() {
        round_trip("counts.txt");
    }

    #[test]
    fn test_gzip_round_trip() {
        round_trip("counts.gz");
    }

    #[test]
    fn test_bzip2_round_trip() {
        round_trip("counts.bz2");
    }
}
