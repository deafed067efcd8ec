//! Block-cached `Read + Seek` adapter over a [`ByteSource`].
//!
//! TIFF decoding seeks back and forth between the header, IFDs and chunk
//! data; fixed-size blocks kept in an LRU cache turn those small reads into
//! a handful of range requests.

use std::io::{self, Read, Seek, SeekFrom};
use std::num::NonZeroUsize;

use lru::LruCache;

use crate::source::ByteSource;

/// Default block size: 64 KiB.
pub const DEFAULT_BLOCK_SIZE: u64 = 64 * 1024;

/// LRU cache of fixed-size blocks keyed by block index.
pub struct BlockCache {
    inner: LruCache<u64, Vec<u8>>,
}

impl BlockCache {
    /// Create a cache holding up to `capacity` blocks (at least one).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(cap),
        }
    }

    pub fn get(&mut self, block: u64) -> Option<&Vec<u8>> {
        self.inner.get(&block)
    }

    pub fn insert(&mut self, block: u64, data: Vec<u8>) {
        self.inner.put(block, data);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Seekable reader fetching whole blocks from `source` on demand.
pub struct BlockReader<S> {
    source: S,
    cache: BlockCache,
    block_size: u64,
    pos: u64,
    fetches: usize,
}

impl<S: ByteSource> BlockReader<S> {
    pub fn new(source: S, block_size: u64, cache_blocks: usize) -> Self {
        Self {
            source,
            cache: BlockCache::new(cache_blocks),
            block_size: block_size.max(1),
            pos: 0,
            fetches: 0,
        }
    }

    /// Number of range reads issued against the source so far.
    pub fn fetches(&self) -> usize {
        self.fetches
    }

    fn block(&mut self, index: u64) -> io::Result<&Vec<u8>> {
        if self.cache.get(index).is_none() {
            let data = self
                .source
                .read_range(index * self.block_size, self.block_size)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            self.fetches += 1;
            self.cache.insert(index, data);
        }
        self.cache
            .get(index)
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "block evicted"))
    }
}

impl<S: ByteSource> Read for BlockReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.pos >= self.source.len() {
            return Ok(0);
        }
        let index = self.pos / self.block_size;
        let within = (self.pos % self.block_size) as usize;
        let block = self.block(index)?;
        if within >= block.len() {
            return Ok(0);
        }

        let n = buf.len().min(block.len() - within);
        buf[..n].copy_from_slice(&block[within..within + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl<S: ByteSource> Seek for BlockReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => Some(p),
            SeekFrom::End(d) => self.source.len().checked_add_signed(d),
            SeekFrom::Current(d) => self.pos.checked_add_signed(d),
        };
        self.pos = target.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of file")
        })?;
        Ok(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    #[test]
    fn cache_eviction() {
        let mut cache = BlockCache::new(2);
        cache.insert(0, vec![1]);
        cache.insert(1, vec![2]);
        cache.insert(2, vec![3]); // evicts 0
        assert!(cache.get(0).is_none());
        assert_eq!(cache.get(2), Some(&vec![3]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reads_across_blocks_and_reuses_cache() {
        let data: Vec<u8> = (0..=255).collect();
        let mut reader = BlockReader::new(MemorySource::new(data), 16, 8);

        reader.seek(SeekFrom::Start(10)).unwrap();
        let mut buf = [0u8; 20];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 10);
        assert_eq!(buf[19], 29);
        assert_eq!(reader.fetches(), 2);

        reader.seek(SeekFrom::Current(-20)).unwrap();
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.fetches(), 2);

        assert_eq!(reader.seek(SeekFrom::End(-1)).unwrap(), 255);
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![255]);
    }
}
