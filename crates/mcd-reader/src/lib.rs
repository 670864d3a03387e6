//! Reader for PS2 memory-card images (`.ps2`).
//!
//! The card format is a fixed-layout container: a 512-byte superblock that
//! locates the root directory, followed by 512-byte directory records. This
//! crate decodes the superblock, walks the root directory once in physical
//! order, and returns the saves it finds. Damaged or unfamiliar images are
//! handled the way the card browser expects: bad records are skipped and a
//! truncated directory yields whatever was collected before the cut. An
//! unreadable card presents as an empty one.

pub mod card;
pub mod dir_entry;
pub mod superblock;

pub use card::{list_saves, read_saves, CardReader};
pub use dir_entry::SaveEntry;
pub use superblock::Superblock;

#[derive(Debug)]
pub enum Error {
    TruncatedSuperblock,
    IoError(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::TruncatedSuperblock => {
                write!(f, "image ends before the 512-byte superblock")
            }
            Error::IoError(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}
