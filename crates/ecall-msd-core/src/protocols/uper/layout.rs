//! Field widths and order of the MSD structure.
//!
//! Widths come from declared value ranges, not byte boundaries. The field
//! order below is the wire order; `parser` and `encoder` both follow it.

/// Bits needed to represent `count` distinct values (0 for a single value).
pub const fn bits_for_count(count: u32) -> u32 {
    if count <= 1 {
        0
    } else {
        u32::BITS - (count - 1).leading_zeros()
    }
}

pub const MESSAGE_IDENTIFIER_BITS: u32 = 8;
pub const FLAG_BITS: u32 = 1;

pub const VEHICLE_TYPE_COUNT: u32 = 23;
pub const VEHICLE_TYPE_BITS: u32 = bits_for_count(VEHICLE_TYPE_COUNT);

/// Permitted VIN characters, sorted; a character is sent as its index.
pub const VIN_ALPHABET: &[u8; 33] = b"0123456789ABCDEFGHJKLMNPRSTUVWXYZ";
pub const VIN_CHAR_BITS: u32 = bits_for_count(VIN_ALPHABET.len() as u32);
/// WMI, VDS, model year, plant + serial.
pub const VIN_GROUPS: [usize; 4] = [3, 6, 1, 7];

pub const PROPULSION_FLAGS: usize = 7;
pub const TIMESTAMP_BITS: u32 = 32;
pub const POSITION_BITS: u32 = 32;
pub const DIRECTION_BITS: u32 = 8;
pub const DELTA_BITS: u32 = 16;
pub const OCCUPANTS_BITS: u32 = 8;

/// Bits of an MSD without the optional occupant count value.
pub const MSD_MIN_BITS: usize = (MESSAGE_IDENTIFIER_BITS
    + 3 * FLAG_BITS
    + VEHICLE_TYPE_BITS
    + VIN_CHAR_BITS * 17
    + PROPULSION_FLAGS as u32 * FLAG_BITS
    + TIMESTAMP_BITS
    + 2 * POSITION_BITS
    + DIRECTION_BITS
    + 4 * DELTA_BITS
    + FLAG_BITS) as usize;
pub const MSD_MAX_BITS: usize = MSD_MIN_BITS + OCCUPANTS_BITS as usize;

pub const fn octets_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

pub fn vin_char_index(ch: char) -> Option<u8> {
    if !ch.is_ascii() {
        return None;
    }
    VIN_ALPHABET
        .iter()
        .position(|&c| c == ch as u8)
        .map(|idx| idx as u8)
}

pub fn vin_char(index: u64) -> Option<char> {
    usize::try_from(index)
        .ok()
        .and_then(|idx| VIN_ALPHABET.get(idx))
        .map(|&c| c as char)
}
