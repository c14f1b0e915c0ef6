use anyhow::{bail, Result};
use log::info;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use crate::position::Position;
use crate::transposition_table::{next_prime, PartialKey, PartialKeyTable};
use crate::{HEIGHT, WIDTH};

/// Precomputed scores for every position up to a fixed depth
///
/// The on-disk format is a 6-byte header (board width and height, book
/// depth, key width in bytes, value width in bytes, base-two log of the
/// table size) followed by the truncated keys and then the score values of
/// a [`PartialKeyTable`]. Lookups go through [`Position::key3`], so a
/// position and its mirror share an entry.
#[derive(Clone)]
pub struct OpeningBook {
    max_depth: usize,
    table: Rc<BookTable>,
}

enum BookTable {
    U8(PartialKeyTable<u8>),
    U16(PartialKeyTable<u16>),
    U32(PartialKeyTable<u32>),
}

impl BookTable {
    fn get(&self, key: u64) -> i32 {
        match self {
            BookTable::U8(table) => table.get(key),
            BookTable::U16(table) => table.get(key),
            BookTable::U32(table) => table.get(key),
        }
    }
}

impl OpeningBook {
    /// Reads a book from disk, validating its header against the board
    /// dimensions baked into this crate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path)?);

        let mut header = [0u8; 6];
        file.read_exact(&mut header)?;
        let [width, height, max_depth, key_bytes, value_bytes, log_size] = header;

        if width as usize != WIDTH || height as usize != HEIGHT {
            bail!("book is for a {}x{} board", width, height);
        }
        if max_depth as usize > WIDTH * HEIGHT {
            bail!("book depth {} exceeds the board", max_depth);
        }
        if value_bytes != 1 {
            bail!("unsupported book value width: {} bytes", value_bytes);
        }
        if log_size == 0 || log_size > 40 {
            bail!("unsupported book size: 2^{} entries", log_size);
        }

        let size = next_prime(1 << log_size) as usize;
        let table = match key_bytes {
            1 => BookTable::U8(load_table(&mut file, size)?),
            2 => BookTable::U16(load_table(&mut file, size)?),
            4 => BookTable::U32(load_table(&mut file, size)?),
            _ => bail!("unsupported book key width: {} bytes", key_bytes),
        };

        info!(
            "loaded opening book {} (depth {}, {} slots)",
            path.display(),
            max_depth,
            size
        );
        Ok(Self {
            max_depth: max_depth as usize,
            table: Rc::new(table),
        })
    }

    /// Looks up a position, returning its stored score or 0 when the
    /// position is deeper than the book or absent from it
    pub fn get(&self, position: &Position) -> i32 {
        if position.num_moves() > self.max_depth {
            return 0;
        }
        self.table.get(position.key3())
    }
}

fn load_table<K: PartialKey>(file: &mut impl Read, size: usize) -> Result<PartialKeyTable<K>> {
    let mut buffer = vec![0; K::BYTES * size];
    file.read_exact(&mut buffer)?;
    let keys = buffer
        .chunks_exact(K::BYTES)
        .map(K::from_le_slice)
        .collect();

    let mut buffer = vec![0; size];
    file.read_exact(&mut buffer)?;
    let values = buffer.into_iter().map(|value| value as i8).collect();

    Ok(PartialKeyTable::from_parts(keys, values))
}
