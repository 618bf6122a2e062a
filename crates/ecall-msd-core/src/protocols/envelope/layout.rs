//! Outer envelope framing: `SEQUENCE { msdVersion, msd OCTET STRING }`.

pub const UPER_VERSION_OFFSET: usize = 0;
pub const UPER_MSD_OFFSET: usize = 1;
/// Version octet plus at least one MSD octet.
pub const UPER_MIN_LEN: usize = UPER_MSD_OFFSET + 1;

pub const SEQUENCE_TAG: u8 = 0x30;
/// `[0] IMPLICIT INTEGER`, as written under automatic tagging.
pub const VERSION_TAG: u8 = 0x80;
pub const INTEGER_TAG: u8 = 0x02;
/// `[1] IMPLICIT OCTET STRING`, as written under automatic tagging.
pub const MSD_TAG: u8 = 0x81;
pub const OCTET_STRING_TAG: u8 = 0x04;

pub const VERSION_TAGS: &[u8] = &[VERSION_TAG, INTEGER_TAG];
pub const MSD_TAGS: &[u8] = &[MSD_TAG, OCTET_STRING_TAG];

pub const LONG_FORM_FLAG: u8 = 0x80;
pub const INDEFINITE_LENGTH: u8 = 0x80;
pub const MAX_LENGTH_OCTETS: usize = 4;
pub const MAX_VERSION_OCTETS: usize = 2;
