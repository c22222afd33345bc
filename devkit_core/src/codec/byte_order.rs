use super::types::Endianness;

/// Lays a big-endian buffer out in `order`, reversing each `element_width`
/// chunk for little-endian. The transform is its own inverse, so decode
/// calls it with the same arguments to get back to big-endian.
pub fn reorder(bytes: &mut [u8], order: Endianness, element_width: usize) {
    if order == Endianness::Big || element_width <= 1 {
        return;
    }
    for element in bytes.chunks_mut(element_width) {
        element.reverse();
    }
}
