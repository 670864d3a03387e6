use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::Error;

/// Size of the superblock, the first block of every card image.
pub const SUPERBLOCK_SIZE: usize = 512;
/// Allocation unit used to address regions within the image.
pub const CLUSTER_SIZE: u64 = 1024;

const FORMAT_ID_LEN: usize = 28;
const ALLOC_OFFSET_POS: usize = 0x34;
const ROOTDIR_CLUSTER_POS: usize = 0x3C;

/// Decoded view of the card's first block.
///
/// Only the fields needed to locate the root directory are interpreted.
/// Nothing here is validated against the rest of the image; a superblock
/// full of garbage simply sends the scan somewhere it cannot read, which
/// ends it with an empty listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Superblock {
    /// Base cluster of the allocatable area.
    pub alloc_offset: u32,
    /// Cluster of the root directory, relative to the allocatable area.
    pub rootdir_cluster: u32,
    format_id: [u8; FORMAT_ID_LEN],
}

impl Superblock {
    /// Reads and decodes the superblock from the start of `source`.
    ///
    /// Fails with [`Error::TruncatedSuperblock`] when fewer than 512 bytes
    /// are available, which is fatal for a scan: without the superblock
    /// there is no way to locate the directory.
    pub fn read<R: Read>(source: &mut R) -> Result<Superblock, Error> {
        let mut block = [0u8; SUPERBLOCK_SIZE];
        source.read_exact(&mut block).map_err(|err| {
            if err.kind() == ErrorKind::UnexpectedEof {
                Error::TruncatedSuperblock
            } else {
                Error::IoError(err)
            }
        })?;
        Ok(Self::parse(&block))
    }

    fn parse(block: &[u8; SUPERBLOCK_SIZE]) -> Superblock {
        let mut format_id = [0u8; FORMAT_ID_LEN];
        format_id.copy_from_slice(&block[..FORMAT_ID_LEN]);

        Superblock {
            alloc_offset: LittleEndian::read_u32(&block[ALLOC_OFFSET_POS..ALLOC_OFFSET_POS + 4]),
            rootdir_cluster: LittleEndian::read_u32(
                &block[ROOTDIR_CLUSTER_POS..ROOTDIR_CLUSTER_POS + 4],
            ),
            format_id,
        }
    }

    /// Byte offset of the first root-directory record.
    pub fn root_dir_offset(&self) -> u64 {
        (u64::from(self.alloc_offset) + u64::from(self.rootdir_cluster)) * CLUSTER_SIZE
    }

    /// The identifier string stamped at the start of the card
    /// (`Sony PS2 Memory Card Format ...` on retail-formatted cards).
    ///
    /// Display-only: the scan never accepts or rejects an image based on
    /// this string.
    pub fn format_id(&self) -> String {
        let printable: String = self
            .format_id
            .iter()
            .take_while(|&&byte| byte != 0)
            .filter(|&&byte| (0x20..=0x7E).contains(&byte))
            .map(|&byte| byte as char)
            .collect();
        printable.trim().to_string()
    }
}
