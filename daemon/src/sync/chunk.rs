use ucp_common::block::Block;

// A contiguous range of block numbers downloaded as one remote call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub first: u64,
    pub last: u64,
}

impl Chunk {
    // number of blocks covered by the range
    pub fn size(&self) -> u64 {
        self.last - self.first + 1
    }
}

// A chunk once its blocks have been fetched, sorted ascending by number
#[derive(Clone, Debug)]
pub struct DownloadedChunk {
    pub first: u64,
    pub last: u64,
    pub blocks: Vec<Block>,
}

// Tile the half-open range (local, target] with fixed-width chunks
// `local_height` is None when no chain exists yet
pub fn plan_chunks(local_height: Option<u64>, target: u64, chunk_size: u64) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    let mut first = match local_height {
        Some(height) if height >= target => return Vec::new(),
        Some(height) => height + 1,
        None => 0,
    };

    let mut chunks = Vec::new();
    while first <= target {
        let last = target.min(first + chunk_size - 1);
        chunks.push(Chunk { first, last });
        match last.checked_add(1) {
            Some(next) => first = next,
            None => break,
        }
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_node_tiling() {
        let chunks = plan_chunks(None, 1200, 500);
        assert_eq!(
            chunks,
            vec![
                Chunk { first: 0, last: 499 },
                Chunk { first: 500, last: 999 },
                Chunk { first: 1000, last: 1200 },
            ]
        );
    }

    #[test]
    fn test_incremental_tiling() {
        let chunks = plan_chunks(Some(999), 1002, 500);
        assert_eq!(chunks, vec![Chunk { first: 1000, last: 1002 }]);
    }

    #[test]
    fn test_no_op_when_target_reached() {
        assert!(plan_chunks(Some(1200), 1200, 500).is_empty());
        assert!(plan_chunks(Some(1500), 1200, 500).is_empty());
    }

    #[test]
    fn test_single_block_range() {
        let chunks = plan_chunks(Some(41), 42, 500);
        assert_eq!(chunks, vec![Chunk { first: 42, last: 42 }]);
        assert_eq!(chunks[0].size(), 1);
    }

    #[test]
    fn test_tiling_partitions_the_range() {
        for &(local, target, size) in &[
            (None, 0u64, 1u64),
            (None, 999, 250),
            (Some(7u64), 1000, 3),
            (Some(0), 1, 500),
            (None, 1500, 499),
        ] {
            let chunks = plan_chunks(local, target, size);
            let mut expected = match local {
                Some(height) => height + 1,
                None => 0,
            };
            for chunk in &chunks {
                assert_eq!(chunk.first, expected, "gap or overlap in tiling");
                assert!(chunk.first <= chunk.last);
                assert!(chunk.size() <= size);
                expected = chunk.last + 1;
            }
            assert_eq!(expected, target + 1, "range not fully covered");
        }
    }
}
