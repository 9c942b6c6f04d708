//! Mask sinks.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use immerse_embed::Mask;
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// Where a mask sits inside the full solver array, in `(z, y, x)` order.
///
/// A process writing its own block of a decomposed domain sets `start` to the
/// block's corner and `count` to its size; a single writer uses
/// [`MaskDescriptor::whole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskDescriptor {
    /// Size of the full array.
    pub shape: [usize; 3],
    /// First index of this block.
    pub start: [usize; 3],
    /// Size of this block.
    pub count: [usize; 3],
}

impl MaskDescriptor {
    /// A descriptor covering all of `mask`.
    pub fn whole(mask: &Mask) -> Self {
        let shape = mask.shape().to_zyx();
        Self {
            shape,
            start: [0; 3],
            count: shape,
        }
    }

    fn check(&self, name: &str, mask: &Mask) -> Result<()> {
        let invalid = |reason: String| IoError::InvalidDescriptor {
            name: name.to_string(),
            reason,
        };
        if self.count != mask.shape().to_zyx() {
            return Err(invalid(format!(
                "count {:?} does not match mask shape {}",
                self.count,
                mask.shape()
            )));
        }
        for axis in 0..3 {
            let end = self.start[axis].checked_add(self.count[axis]);
            if end.map_or(true, |end| end > self.shape[axis]) {
                return Err(invalid(format!(
                    "block {:?}+{:?} exceeds array shape {:?}",
                    self.start, self.count, self.shape
                )));
            }
        }
        Ok(())
    }
}

/// Destination for the variables a solver reads at startup.
pub trait MaskSink {
    /// Record an integer flag.
    fn write_scalar(&mut self, name: &str, value: i64) -> Result<()>;

    /// Record a mask block.
    fn write_mask(&mut self, name: &str, mask: &Mask, descriptor: &MaskDescriptor) -> Result<()>;

    /// Flush everything; later writes fail with [`IoError::Closed`].
    fn close(&mut self) -> Result<()>;
}

/// One entry of a [`RawSink`] descriptor file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variable {
    /// Integer stored inline.
    Scalar {
        /// The value.
        value: i64,
    },
    /// Array stored in a sibling binary file.
    Array {
        /// File name, relative to the descriptor.
        file: String,
        /// Element type.
        dtype: String,
        /// Element byte order.
        byte_order: String,
        /// Placement in the full array.
        descriptor: MaskDescriptor,
    },
}

/// Contents of a [`RawSink`] descriptor file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Variables by name.
    pub variables: BTreeMap<String, Variable>,
}

/// Writes masks as raw little-endian f64 files plus a JSON descriptor.
///
/// For stem `out/ibm`, mask `ep1` goes to `out/ibm.ep1.bin` and the
/// descriptor to `out/ibm.json` on [`close`](MaskSink::close).
#[derive(Debug)]
pub struct RawSink {
    stem: PathBuf,
    descriptor: Descriptor,
    closed: bool,
}

impl RawSink {
    /// Create a sink writing next to `stem`, creating its directory.
    pub fn create(stem: impl AsRef<Path>) -> Result<Self> {
        let stem = stem.as_ref().to_path_buf();
        if let Some(parent) = stem.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            stem,
            descriptor: Descriptor::default(),
            closed: false,
        })
    }

    /// Path of the descriptor written on close.
    pub fn descriptor_path(&self) -> PathBuf {
        self.with_suffix(".json")
    }

    /// Path of the data file for variable `name`.
    pub fn data_path(&self, name: &str) -> PathBuf {
        self.with_suffix(&format!(".{name}.bin"))
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = OsString::from(self.stem.as_os_str());
        path.push(suffix);
        PathBuf::from(path)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(IoError::Closed);
        }
        Ok(())
    }
}

impl MaskSink for RawSink {
    fn write_scalar(&mut self, name: &str, value: i64) -> Result<()> {
        self.ensure_open()?;
        self.descriptor
            .variables
            .insert(name.to_string(), Variable::Scalar { value });
        Ok(())
    }

    fn write_mask(&mut self, name: &str, mask: &Mask, descriptor: &MaskDescriptor) -> Result<()> {
        self.ensure_open()?;
        descriptor.check(name, mask)?;

        let path = self.data_path(name);
        let mut out = BufWriter::new(File::create(&path)?);
        for value in mask.as_slice() {
            out.write_all(&value.to_le_bytes())?;
        }
        out.flush()?;
        log::debug!("wrote {} values to {}", mask.as_slice().len(), path.display());

        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.descriptor.variables.insert(
            name.to_string(),
            Variable::Array {
                file,
                dtype: "f64".into(),
                byte_order: "little".into(),
                descriptor: *descriptor,
            },
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        let path = self.descriptor_path();
        let json = serde_json::to_string_pretty(&self.descriptor)?;
        std::fs::write(&path, json)?;
        self.closed = true;
        log::info!("wrote descriptor {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use immerse_math::Shape3;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("immerse-io-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_raw_sink_writes_data_and_descriptor() {
        let dir = scratch("roundtrip");
        let mask = Mask::fluid(Shape3::new(4, 3, 2));
        let mut sink = RawSink::create(dir.join("ibm")).unwrap();
        sink.write_scalar("iibm", 1).unwrap();
        sink.write_mask("ep1", &mask, &MaskDescriptor::whole(&mask)).unwrap();
        sink.close().unwrap();

        let bytes = std::fs::read(dir.join("ibm.ep1.bin")).unwrap();
        assert_eq!(bytes.len(), 8 * 4 * 3 * 2);
        assert_eq!(&bytes[..8], &1.0f64.to_le_bytes());

        let text = std::fs::read_to_string(dir.join("ibm.json")).unwrap();
        let descriptor: Descriptor = serde_json::from_str(&text).unwrap();
        assert_eq!(descriptor.variables["iibm"], Variable::Scalar { value: 1 });
        match &descriptor.variables["ep1"] {
            Variable::Array { file, dtype, descriptor, .. } => {
                assert_eq!(file, "ibm.ep1.bin");
                assert_eq!(dtype, "f64");
                assert_eq!(descriptor.shape, [2, 3, 4]);
                assert_eq!(descriptor.count, [2, 3, 4]);
                assert_eq!(descriptor.start, [0, 0, 0]);
            }
            other => panic!("expected array, got {other:?}"),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_closed_sink_rejects_writes() {
        let dir = scratch("closed");
        let mut sink = RawSink::create(dir.join("ibm")).unwrap();
        sink.close().unwrap();
        assert!(matches!(sink.write_scalar("iibm", 1), Err(IoError::Closed)));
        assert!(matches!(sink.close(), Err(IoError::Closed)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_descriptor_must_fit_mask() {
        let dir = scratch("descriptor");
        let mask = Mask::fluid(Shape3::new(2, 2, 2));
        let mut sink = RawSink::create(dir.join("ibm")).unwrap();

        let wrong_count = MaskDescriptor {
            shape: [4, 4, 4],
            start: [0, 0, 0],
            count: [2, 2, 3],
        };
        assert!(matches!(
            sink.write_mask("ep1", &mask, &wrong_count),
            Err(IoError::InvalidDescriptor { .. })
        ));

        let overflowing = MaskDescriptor {
            shape: [4, 4, 4],
            start: [3, 0, 0],
            count: [2, 2, 2],
        };
        assert!(sink.write_mask("ep1", &mask, &overflowing).is_err());

        let block = MaskDescriptor {
            shape: [4, 4, 4],
            start: [2, 2, 0],
            count: [2, 2, 2],
        };
        sink.write_mask("ep1", &mask, &block).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_descriptor_start_near_usize_max_is_rejected() {
        let dir = scratch("wrapping");
        let mask = Mask::fluid(Shape3::new(2, 2, 2));
        let mut sink = RawSink::create(dir.join("ibm")).unwrap();

        let wrapping = MaskDescriptor {
            shape: [usize::MAX, 2, 2],
            start: [usize::MAX, 0, 0],
            count: [2, 2, 2],
        };
        assert!(matches!(
            sink.write_mask("ep1", &mask, &wrapping),
            Err(IoError::InvalidDescriptor { .. })
        ));
        assert!(!sink.data_path("ep1").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
