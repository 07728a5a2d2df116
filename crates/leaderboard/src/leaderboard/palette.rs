/// Size of the badge palette the dashboard cycles through.
pub const DEFAULT_PALETTE_SIZE: usize = 7;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Map a grouping label to a palette slot. Same label, same slot, on every run.
pub fn palette_index(label: &str, palette_size: usize) -> usize {
    if palette_size == 0 {
        return 0;
    }

    let hash = label.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    });
    hash as usize % palette_size
}
