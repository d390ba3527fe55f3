// Common utilities for tests, demos and benches

pub fn str_to_u8(s: &str) -> &[u8] {
    s.as_bytes()
}

pub fn str_from_u8(buf: &[u8]) -> &str {
    let len = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    match std::str::from_utf8(&buf[..len]) {
        Ok(s) => s,
        Err(e) => panic!(
            "couldn't parse as utf-8 string, err: {:?} buf: {:?}",
            e, buf
        ),
    }
}

/// Write `s` at the start of a record and zero the rest.
pub fn copy_str_to_slice(s: &str, buf: &mut [u8]) {
    let s_bytes = str_to_u8(s);
    assert!(s_bytes.len() <= buf.len(), "dst buffer not large enough!");

    buf[..s_bytes.len()].copy_from_slice(s_bytes);
    buf[s_bytes.len()..].fill(0);
}

/// Stamp a little-endian message id into the first eight bytes of a record.
pub fn stamp_id(id: u64, buf: &mut [u8]) {
    assert!(buf.len() >= size_of::<u64>(), "record too small for an id");
    buf[..size_of::<u64>()].copy_from_slice(&id.to_le_bytes());
}

/// Read back an id written by [`stamp_id`].
pub fn read_id(buf: &[u8]) -> u64 {
    let mut bytes = [0u8; size_of::<u64>()];
    bytes.copy_from_slice(&buf[..size_of::<u64>()]);
    u64::from_le_bytes(bytes)
}
