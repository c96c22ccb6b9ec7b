//! Sample file I/O
//!
//! Two on-disk layouts are produced by the upstream renderer:
//!
//! - **Gzip array** (`*.bin.gz`): gzip stream holding three little-endian
//!   `u32` shape values `(height, width, channels)` followed by the
//!   row-major `f32` samples.
//! - **Raw dump**: little-endian `u32` `width`, `height`, `channels`, then
//!   `f32` samples with rows in the reverse order of the gzip array. The
//!   renderer flips its readback before writing these, so loading reverses
//!   the rows again and both formats yield the same grid row order.
//!
//! Both must carry exactly three channels (depth, orientation, value).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::core::error::Error;
use crate::core::types::Result;
use super::grid::{DirectionValueGrid, CHANNELS};

/// On-disk sample layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleFormat {
    GzipArray,
    Raw,
}

impl SampleFormat {
    /// `.gz` files are gzip arrays, everything else is a raw dump
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => SampleFormat::GzipArray,
            _ => SampleFormat::Raw,
        }
    }
}

/// Load a sample grid, choosing the format from the file extension
pub fn load_grid(path: impl AsRef<Path>) -> Result<DirectionValueGrid> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let grid = match SampleFormat::from_path(path) {
        SampleFormat::GzipArray => read_gzip_array(reader)?,
        SampleFormat::Raw => read_raw(reader)?,
    };
    log::info!(
        "Loaded {}x{} sample grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}

/// Save a sample grid, choosing the format from the file extension
pub fn save_grid(grid: &DirectionValueGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    match SampleFormat::from_path(path) {
        SampleFormat::GzipArray => write_gzip_array(grid, &mut writer)?,
        SampleFormat::Raw => write_raw(grid, &mut writer)?,
    }
    writer.flush()?;
    Ok(())
}

/// Read a gzip-compressed `(height, width, channels)` array
pub fn read_gzip_array<R: Read>(reader: R) -> Result<DirectionValueGrid> {
    let mut decoder = GzDecoder::new(reader);
    let [height, width, channels] = read_header(&mut decoder)?;
    check_channels(channels)?;
    let samples = read_samples(&mut decoder, width, height)?;
    DirectionValueGrid::from_samples(width, height, samples)
}

/// Write a grid as a gzip-compressed `(height, width, channels)` array
pub fn write_gzip_array<W: Write>(grid: &DirectionValueGrid, writer: W) -> Result<()> {
    let mut encoder = GzEncoder::new(writer, Compression::default());
    write_header(&mut encoder, [grid.height(), grid.width(), CHANNELS as u32])?;
    for value in grid.samples() {
        encoder.write_all(&value.to_le_bytes())?;
    }
    encoder.finish()?;
    Ok(())
}

/// Read a raw dump, reversing its rows into grid order
pub fn read_raw<R: Read>(mut reader: R) -> Result<DirectionValueGrid> {
    let [width, height, channels] = read_header(&mut reader)?;
    check_channels(channels)?;
    let reversed = read_samples(&mut reader, width, height)?;

    let row_len = width as usize * CHANNELS;
    let samples = reversed
        .chunks_exact(row_len)
        .rev()
        .flatten()
        .copied()
        .collect();
    DirectionValueGrid::from_samples(width, height, samples)
}

/// Write a raw dump, last grid row first
pub fn write_raw<W: Write>(grid: &DirectionValueGrid, mut writer: W) -> Result<()> {
    write_header(&mut writer, [grid.width(), grid.height(), CHANNELS as u32])?;
    let row_len = grid.width() as usize * CHANNELS;
    for row in grid.samples().chunks_exact(row_len).rev() {
        for value in row {
            writer.write_all(&value.to_le_bytes())?;
        }
    }
    Ok(())
}

fn read_header<R: Read>(reader: &mut R) -> Result<[u32; 3]> {
    let mut bytes = [0u8; 12];
    reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::Format("truncated header".into()),
        _ => Error::Io(e),
    })?;
    let word = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    Ok([word(0), word(4), word(8)])
}

fn write_header<W: Write>(writer: &mut W, header: [u32; 3]) -> Result<()> {
    for word in header {
        writer.write_all(&word.to_le_bytes())?;
    }
    Ok(())
}

fn check_channels(channels: u32) -> Result<()> {
    if channels as usize != CHANNELS {
        return Err(Error::Format(format!(
            "expected {} channels (depth, orientation, value), found {}",
            CHANNELS, channels
        )));
    }
    Ok(())
}

fn read_samples<R: Read>(reader: &mut R, width: u32, height: u32) -> Result<Vec<f32>> {
    let count = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| Error::Format(format!("shape {}x{} is too large", width, height)))?;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    if bytes.len() != count * 4 {
        return Err(Error::Format(format!(
            "expected {} bytes of sample data, found {}",
            count * 4,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid() -> DirectionValueGrid {
        DirectionValueGrid::from_fn(3, 2, |x, y| (x as f32, 0.1 * y as f32, (x * y) as f32)).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(SampleFormat::from_path(Path::new("render.bin.gz")), SampleFormat::GzipArray);
        assert_eq!(SampleFormat::from_path(Path::new("render.GZ")), SampleFormat::GzipArray);
        assert_eq!(SampleFormat::from_path(Path::new("render.bin")), SampleFormat::Raw);
    }

    #[test]
    fn test_gzip_header_is_height_width_channels() {
        let grid = test_grid();
        let mut compressed = Vec::new();
        write_gzip_array(&grid, &mut compressed).unwrap();

        let mut raw = Vec::new();
        GzDecoder::new(&compressed[..]).read_to_end(&mut raw).unwrap();
        assert_eq!(&raw[0..4], &2u32.to_le_bytes());
        assert_eq!(&raw[4..8], &3u32.to_le_bytes());
        assert_eq!(&raw[8..12], &3u32.to_le_bytes());
        assert_eq!(raw.len(), 12 + 3 * 2 * 3 * 4);

        let loaded = read_gzip_array(&compressed[..]).unwrap();
        assert_eq!(loaded.samples(), grid.samples());
    }

    #[test]
    fn test_raw_rows_are_flipped() {
        let grid = test_grid();
        let mut bytes = Vec::new();
        write_raw(&grid, &mut bytes).unwrap();

        // The last grid row (y = 1, orientation 0.1) is stored first
        let first_orientation = f32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
        assert!((first_orientation - 0.1).abs() < 1e-6);

        let loaded = read_raw(&bytes[..]).unwrap();
        assert_eq!(loaded.cell(2, 1), grid.cell(2, 1));
        assert_eq!(loaded.samples(), grid.samples());
    }

    #[test]
    fn test_wrong_channel_count() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, [1, 1, 4]).unwrap();
        bytes.extend(std::iter::repeat(0u8).take(16));
        assert!(matches!(read_raw(&bytes[..]), Err(Error::Format(_))));
    }

    #[test]
    fn test_truncated_data() {
        let mut bytes = Vec::new();
        write_header(&mut bytes, [2, 2, 3]).unwrap();
        bytes.extend(std::iter::repeat(0u8).take(20));
        assert!(matches!(read_raw(&bytes[..]), Err(Error::Format(_))));
        assert!(matches!(read_raw(&bytes[..5]), Err(Error::Format(_))));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = tempfile::tempdir().unwrap();
        let grid = test_grid();
        for name in ["render.bin.gz", "render.bin"] {
            let path = dir.path().join(name);
            save_grid(&grid, &path).unwrap();
            let loaded = load_grid(&path).unwrap();
            assert_eq!(loaded.width(), 3);
            assert_eq!(loaded.height(), 2);
            assert_eq!(loaded.samples(), grid.samples());
        }
    }
}
