use byteorder::{ByteOrder, LittleEndian};

/// Size of one directory record slot.
pub const DIR_RECORD_SIZE: usize = 512;

/// Slot is in use.
pub const DF_EXISTS: u32 = 0x8000;
/// Entry is a subdirectory.
pub const DF_DIRECTORY: u32 = 0x0020;
/// Entry is a plain file.
pub const DF_FILE: u32 = 0x0010;

/// Largest declared size still treated as plausible. Anything above this is
/// a corrupt record, not a save.
pub const MAX_SANE_LENGTH: u32 = 1_000_000_000;

const MODE_POS: usize = 0x00;
const LENGTH_POS: usize = 0x04;
const NAME_POS: usize = 0x40;
const NAME_LEN: usize = 32;

/// One save recorded in the card's root directory.
///
/// For a directory entry `size` is the number of entries it holds; for a
/// file entry it is the payload size in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    pub name: String,
    pub size: u32,
    pub is_directory: bool,
}

impl SaveEntry {
    /// Decodes one raw 512-byte directory record.
    ///
    /// Returns `None` for every slot a card browser must not surface:
    /// erased or never-used slots, slots without the in-use flag, the
    /// `.`/`..` pseudo-entries, names that filter down to nothing, and
    /// records whose declared size is implausible. The checks run in that
    /// order; it is load-bearing for how ambiguous records classify.
    pub fn from_record(record: &[u8]) -> Option<SaveEntry> {
        if record.len() < DIR_RECORD_SIZE {
            return None;
        }

        let mode = LittleEndian::read_u32(&record[MODE_POS..MODE_POS + 4]);
        if mode == 0 || mode == 0xFFFF_FFFF {
            return None;
        }
        if mode & DF_EXISTS == 0 {
            return None;
        }

        let name = decode_name(&record[NAME_POS..NAME_POS + NAME_LEN]);
        if name.is_empty() || name == "." || name == ".." {
            return None;
        }

        let length = LittleEndian::read_u32(&record[LENGTH_POS..LENGTH_POS + 4]);
        if length > MAX_SANE_LENGTH {
            log::debug!("skipping {name:?}: implausible length {length}");
            return None;
        }

        Some(SaveEntry {
            name,
            size: length,
            is_directory: mode & DF_DIRECTORY != 0,
        })
    }
}

/// Decodes the fixed-width name buffer: stop at the first NUL, keep only
/// printable ASCII. Out-of-range bytes are dropped, not replaced, so the
/// result can be shorter than the raw span.
fn decode_name(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&byte| byte != 0)
        .filter(|&&byte| (0x20..=0x7E).contains(&byte))
        .map(|&byte| byte as char)
        .collect()
}
