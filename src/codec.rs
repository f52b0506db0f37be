use byteorder::{BigEndian, ByteOrder};

use crate::block::BLOCK_SIZE;
use crate::btree::node::{Node, MAX_KEYS};
use crate::error::BtError;

//-------------------------------------------------------------------------
// Header block (block 0)

pub const MAGIC: &[u8; 8] = b"4348PRJ3";

const HDR_MAGIC: usize = 0;
const HDR_ROOT: usize = 8;
const HDR_NEXT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub root: u64,
    pub next: u64,
}

pub fn encode_header(header: &Header) -> [u8; BLOCK_SIZE] {
    let mut buf = [0u8; BLOCK_SIZE];
    buf[HDR_MAGIC..HDR_MAGIC + 8].copy_from_slice(MAGIC);
    BigEndian::write_u64(&mut buf[HDR_ROOT..HDR_ROOT + 8], header.root);
    BigEndian::write_u64(&mut buf[HDR_NEXT..HDR_NEXT + 8], header.next);
    buf
}

/// Fails if the buffer is short or the magic marker doesn't match. The
/// returned error carries no path context; callers that know the path
/// (the allocator) attach it.
pub fn decode_header(buf: &[u8]) -> Result<Header, BtError> {
    if buf.len() < BLOCK_SIZE {
        return Err(BtError::ShortBlock(0));
    }
    if &buf[HDR_MAGIC..HDR_MAGIC + 8] != MAGIC {
        return Err(BtError::BadMagic(String::new()));
    }
    let root = BigEndian::read_u64(&buf[HDR_ROOT..HDR_ROOT + 8]);
    let next = BigEndian::read_u64(&buf[HDR_NEXT..HDR_NEXT + 8]);
    Ok(Header { root, next })
}

//-------------------------------------------------------------------------
// Node block (block id >= 1)

const NODE_BLOCK_ID: usize = 0;
const NODE_PARENT: usize = 8;
const NODE_NUM_KEYS: usize = 16;
const NODE_KEYS: usize = 24;
const NODE_VALUES: usize = NODE_KEYS + MAX_KEYS * 8; // 176
const NODE_CHILDREN: usize = NODE_VALUES + MAX_KEYS * 8; // 328

pub fn encode_node(node: &Node) -> [u8; BLOCK_SIZE] {
    debug_assert!(node.keys.len() <= MAX_KEYS);
    debug_assert!(node.values.len() == node.keys.len());
    // A leaf's children slots are all zero regardless of array length (a
    // leaf read back from disk keeps its on-disk num_keys + 1 zero
    // slots even after further inserts, since leaves never touch their
    // children array); only a genuine internal node must match exactly.
    debug_assert!(node.is_leaf() || node.children.len() == node.keys.len() + 1);

    let mut buf = [0u8; BLOCK_SIZE];
    BigEndian::write_u64(&mut buf[NODE_BLOCK_ID..NODE_BLOCK_ID + 8], node.block_id);
    BigEndian::write_u64(&mut buf[NODE_PARENT..NODE_PARENT + 8], node.parent_id);
    BigEndian::write_u64(
        &mut buf[NODE_NUM_KEYS..NODE_NUM_KEYS + 8],
        node.keys.len() as u64,
    );

    for (i, &k) in node.keys.iter().enumerate() {
        let off = NODE_KEYS + i * 8;
        BigEndian::write_u64(&mut buf[off..off + 8], k);
    }
    for (i, &v) in node.values.iter().enumerate() {
        let off = NODE_VALUES + i * 8;
        BigEndian::write_u64(&mut buf[off..off + 8], v);
    }
    for (i, &c) in node.children.iter().enumerate() {
        let off = NODE_CHILDREN + i * 8;
        BigEndian::write_u64(&mut buf[off..off + 8], c);
    }

    buf
}

/// Fails if the buffer is short or `num_keys > 19`. On-disk arrays are
/// trimmed to their logical length: keys and values to `num_keys`,
/// children to `num_keys + 1`, read straight from their slots regardless
/// of whether they are all zero. A node is a leaf iff those `num_keys + 1`
/// slots are all zero, not by array length.
pub fn decode_node(buf: &[u8]) -> Result<Node, BtError> {
    if buf.len() < BLOCK_SIZE {
        return Err(BtError::ShortBlock(0));
    }

    let block_id = BigEndian::read_u64(&buf[NODE_BLOCK_ID..NODE_BLOCK_ID + 8]);
    let parent_id = BigEndian::read_u64(&buf[NODE_PARENT..NODE_PARENT + 8]);
    let num_keys_raw = BigEndian::read_u64(&buf[NODE_NUM_KEYS..NODE_NUM_KEYS + 8]);

    if num_keys_raw as usize > MAX_KEYS {
        return Err(BtError::BadNumKeys(block_id, num_keys_raw));
    }
    let num_keys = num_keys_raw as usize;

    let mut keys = Vec::with_capacity(num_keys);
    for i in 0..num_keys {
        let off = NODE_KEYS + i * 8;
        keys.push(BigEndian::read_u64(&buf[off..off + 8]));
    }

    let mut values = Vec::with_capacity(num_keys);
    for i in 0..num_keys {
        let off = NODE_VALUES + i * 8;
        values.push(BigEndian::read_u64(&buf[off..off + 8]));
    }

    let mut children = Vec::with_capacity(num_keys + 1);
    for i in 0..=num_keys {
        let off = NODE_CHILDREN + i * 8;
        children.push(BigEndian::read_u64(&buf[off..off + 8]));
    }

    Ok(Node {
        block_id,
        parent_id,
        keys,
        values,
        children,
        dirty: false,
    })
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let h = Header { root: 7, next: 42 };
        let buf = encode_header(&h);
        assert_eq!(&buf[0..8], MAGIC);
        let h2 = decode_header(&buf).unwrap();
        assert_eq!(h, h2);
    }

    #[test]
    fn header_padding_is_zero() {
        let h = Header { root: 1, next: 2 };
        let buf = encode_header(&h);
        assert!(buf[24..].iter().all(|&b| b == 0));
    }

    #[test]
    fn header_rejects_bad_magic() {
        let buf = [0u8; BLOCK_SIZE];
        assert!(matches!(decode_header(&buf), Err(BtError::BadMagic(_))));
    }

    #[test]
    fn header_rejects_short_buffer() {
        let buf = [0u8; 100];
        assert!(matches!(decode_header(&buf), Err(BtError::ShortBlock(_))));
    }

    #[test]
    fn leaf_node_round_trips() {
        let node = Node {
            block_id: 3,
            parent_id: 1,
            keys: vec![10, 20, 30],
            values: vec![100, 200, 300],
            children: vec![],
            dirty: true,
        };
        let buf = encode_node(&node);
        let back = decode_node(&buf).unwrap();
        assert_eq!(back.block_id, 3);
        assert_eq!(back.parent_id, 1);
        assert_eq!(back.keys, vec![10, 20, 30]);
        assert_eq!(back.values, vec![100, 200, 300]);
        assert_eq!(back.children, vec![0, 0, 0, 0]);
        assert!(back.is_leaf());
        assert!(!back.dirty);
    }

    #[test]
    fn internal_node_round_trips() {
        let node = Node {
            block_id: 5,
            parent_id: 0,
            keys: vec![10],
            values: vec![100],
            children: vec![2, 3],
            dirty: false,
        };
        let buf = encode_node(&node);
        let back = decode_node(&buf).unwrap();
        assert_eq!(back.children, vec![2, 3]);
        assert!(!back.is_leaf());
    }

    #[test]
    fn empty_node_reads_back_as_a_leaf_with_one_zero_child_slot() {
        let node = Node::empty(9);
        let buf = encode_node(&node);
        let back = decode_node(&buf).unwrap();
        assert_eq!(back.num_keys(), 0);
        assert_eq!(back.children, vec![0]);
        assert!(back.is_leaf());
    }

    #[test]
    fn node_padding_beyond_children_is_zero() {
        let node = Node {
            block_id: 1,
            parent_id: 0,
            keys: vec![1],
            values: vec![1],
            children: vec![0, 0],
            dirty: false,
        };
        let buf = encode_node(&node);
        assert!(buf[NODE_CHILDREN + 2 * 8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn full_node_round_trips() {
        let keys: Vec<u64> = (0..MAX_KEYS as u64).collect();
        let values: Vec<u64> = keys.iter().map(|k| k * 10).collect();
        let children: Vec<u64> = (0..=MAX_KEYS as u64).map(|i| i + 100).collect();
        let node = Node {
            block_id: 2,
            parent_id: 1,
            keys: keys.clone(),
            values: values.clone(),
            children: children.clone(),
            dirty: false,
        };
        let buf = encode_node(&node);
        let back = decode_node(&buf).unwrap();
        assert_eq!(back.keys, keys);
        assert_eq!(back.values, values);
        assert_eq!(back.children, children);
    }

    #[test]
    fn decode_rejects_impossible_num_keys() {
        let mut buf = [0u8; BLOCK_SIZE];
        BigEndian::write_u64(&mut buf[NODE_NUM_KEYS..NODE_NUM_KEYS + 8], 20);
        assert!(matches!(decode_node(&buf), Err(BtError::BadNumKeys(_, 20))));
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let buf = [0u8; 10];
        assert!(matches!(decode_node(&buf), Err(BtError::ShortBlock(_))));
    }
}
