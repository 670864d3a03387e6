use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::dir_entry::{SaveEntry, DIR_RECORD_SIZE};
use crate::superblock::Superblock;
use crate::Error;

/// Upper bound on root-directory records examined in one scan. Caps the
/// work done on a malformed image instead of trusting an in-band count.
pub const MAX_ROOT_ENTRIES: usize = 100;

/// One-shot reader over a card image handle.
///
/// Owns the handle for the duration of a single scan and drops it with the
/// reader; a scan is restarted by opening the image again, not by reusing
/// the reader.
pub struct CardReader<R> {
    source: R,
}

impl<R: Read + Seek> CardReader<R> {
    pub fn new(source: R) -> CardReader<R> {
        CardReader { source }
    }

    /// Consumes the reader and hands the underlying handle back.
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Reads the superblock, then walks the root directory once in physical
    /// order. A missing superblock is fatal; everything past it is
    /// best-effort, returning whatever was collected before the region ran
    /// out.
    pub fn entries(&mut self) -> Result<Vec<SaveEntry>, Error> {
        let superblock = Superblock::read(&mut self.source)?;
        Ok(self.scan_root(superblock.root_dir_offset()))
    }

    /// Decodes the superblock without scanning.
    pub fn superblock(&mut self) -> Result<Superblock, Error> {
        self.source.seek(SeekFrom::Start(0))?;
        Superblock::read(&mut self.source)
    }

    fn scan_root(&mut self, root_dir_offset: u64) -> Vec<SaveEntry> {
        let mut entries = Vec::new();

        if let Err(err) = self.source.seek(SeekFrom::Start(root_dir_offset)) {
            log::warn!("seek to root directory at {root_dir_offset} failed: {err}");
            return entries;
        }

        let mut record = [0u8; DIR_RECORD_SIZE];
        for _ in 0..MAX_ROOT_ENTRIES {
            // Running out of readable slots is the expected end of the
            // region, not corruption; keep what was collected.
            if self.source.read_exact(&mut record).is_err() {
                break;
            }
            if let Some(entry) = SaveEntry::from_record(&record) {
                entries.push(entry);
            }
        }

        entries
    }
}

/// Lists the saves in the root directory of the card image at `path`,
/// in physical directory order.
///
/// An image that cannot be opened or that ends before the superblock
/// presents as an empty card rather than an error, the same listing a
/// browser shows for it. Use [`read_saves`] to tell the two apart.
pub fn list_saves<P: AsRef<Path>>(path: P) -> Vec<SaveEntry> {
    match read_saves(&path) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("{}: {err}", path.as_ref().display());
            Vec::new()
        }
    }
}

/// Strict variant of [`list_saves`]: open and superblock failures are
/// reported instead of flattened into an empty listing.
pub fn read_saves<P: AsRef<Path>>(path: P) -> Result<Vec<SaveEntry>, Error> {
    let file = File::open(path)?;
    CardReader::new(file).entries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::dir_entry::DF_EXISTS;
    use crate::superblock::{CLUSTER_SIZE, SUPERBLOCK_SIZE};

    fn record(mode: u32, length: u32, name: &[u8]) -> [u8; DIR_RECORD_SIZE] {
        let mut record = [0u8; DIR_RECORD_SIZE];
        record[..4].copy_from_slice(&mode.to_le_bytes());
        record[4..8].copy_from_slice(&length.to_le_bytes());
        record[0x40..0x40 + name.len()].copy_from_slice(name);
        record
    }

    fn image(alloc_offset: u32, rootdir_cluster: u32, records: &[[u8; DIR_RECORD_SIZE]]) -> Vec<u8> {
        let dir_start = (u64::from(alloc_offset) + u64::from(rootdir_cluster)) * CLUSTER_SIZE;
        let mut image = vec![0u8; dir_start as usize];
        image[0x34..0x38].copy_from_slice(&alloc_offset.to_le_bytes());
        image[0x3C..0x40].copy_from_slice(&rootdir_cluster.to_le_bytes());
        for record in records {
            image.extend_from_slice(record);
        }
        image
    }

    #[test]
    fn collects_entries_in_physical_order() {
        let data = image(
            1,
            1,
            &[
                record(DF_EXISTS, 100, b"BESLES-12345"),
                record(DF_EXISTS, 200, b"BASLUS-67890"),
            ],
        );
        let mut reader = CardReader::new(Cursor::new(data));
        let entries = reader.entries().expect("entries");

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["BESLES-12345", "BASLUS-67890"]);
    }

    #[test]
    fn skipped_records_do_not_stop_the_scan() {
        let data = image(
            1,
            0,
            &[
                record(0, 0, b""),
                record(0xFFFF_FFFF, 0, b"JUNK"),
                record(DF_EXISTS, 7, b"KEPT"),
            ],
        );
        let mut reader = CardReader::new(Cursor::new(data));
        let entries = reader.entries().expect("entries");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "KEPT");
    }

    #[test]
    fn truncated_directory_returns_the_prefix() {
        let mut data = image(
            1,
            0,
            &[
                record(DF_EXISTS, 1, b"FIRST"),
                record(DF_EXISTS, 2, b"SECOND"),
            ],
        );
        // Cut the second record short.
        data.truncate(data.len() - 10);
        let mut reader = CardReader::new(Cursor::new(data));
        let entries = reader.entries().expect("entries");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "FIRST");
    }

    #[test]
    fn directory_beyond_the_image_reads_as_empty() {
        // Superblock points past the end of the data.
        let mut data = image(1, 0, &[]);
        data.truncate(SUPERBLOCK_SIZE);
        let mut reader = CardReader::new(Cursor::new(data));

        assert!(reader.entries().expect("entries").is_empty());
    }

    #[test]
    fn image_shorter_than_the_superblock_is_an_error() {
        let mut reader = CardReader::new(Cursor::new(vec![0u8; SUPERBLOCK_SIZE / 2]));

        match reader.entries() {
            Err(Error::TruncatedSuperblock) => {}
            other => panic!("expected TruncatedSuperblock, got {other:?}"),
        }
    }

    #[test]
    fn superblock_accessor_rewinds_first() {
        let data = image(1, 0, &[record(DF_EXISTS, 1, b"SAVE")]);
        let mut reader = CardReader::new(Cursor::new(data));

        let _ = reader.entries().expect("entries");
        let superblock = reader.superblock().expect("superblock");
        assert_eq!(superblock.alloc_offset, 1);
    }
}
