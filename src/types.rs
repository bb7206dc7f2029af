pub use zerocopy::IntoBytes;
use zerocopy::{
    byteorder::little_endian::{U16, U32},
    Immutable, KnownLayout, Unaligned,
};

pub const CE_SIGNATURE: [u8; 4] = *b"MSCE";
pub const HEADER_SIZE: u32 = 100;
pub const PATH_SEPARATOR: char = '\\';
pub const ROOT_VARIABLE_PREFIX: &str = "CE";

/// Named CPU architectures accepted by the device installer, with their codes.
pub const ARCHITECTURES: &[(&str, u32)] = &[
    ("SH3", 103),
    ("SH4", 104),
    ("i386", 386),
    ("i486", 486),
    ("i586", 586),
    ("PowerPC", 601),
    ("ARM720", 1824),
    ("ARM820", 2080),
    ("ARM920", 2336),
    ("StrongARM", 2577),
    ("MIPS", 4000),
];

/// Looks up an architecture code, ignoring ASCII case.
pub fn architecture_code(name: &str) -> Option<u32> {
    ARCHITECTURES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

/// NUL-pads `text` to a multiple of four bytes, always adding at least one NUL.
pub fn padded(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut data = Vec::with_capacity(padded_len(bytes.len()));
    data.extend_from_slice(bytes);
    data.resize(padded_len(bytes.len()), 0);
    data
}

pub fn padded_len(len: usize) -> usize { (len / 4 + 1) * 4 }

#[repr(C)]
#[derive(IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct HeaderFields {
    pub signature:          [u8; 4],
    pub reserved_1:         U32,
    pub total_length:       U32,
    pub reserved_2:         U32,
    pub format_marker:      U32,
    pub architecture:       U32,
    pub min_version_major:  U32,
    pub min_version_minor:  U32,
    pub max_version_major:  U32,
    pub max_version_minor:  U32,
    pub min_build:          U32,
    pub max_build:          U32,
    pub string_count:       U16,
    pub directory_count:    U16,
    pub file_count:         U16,
    pub hive_count:         U16,
    pub key_count:          U16,
    pub link_count:         U16,
    pub string_offset:      U32,
    pub directory_offset:   U32,
    pub file_offset:        U32,
    pub hive_offset:        U32,
    pub key_offset:         U32,
    pub link_offset:        U32,
    pub app_name_offset:    U16,
    pub app_name_length:    U16,
    pub provider_offset:    U16,
    pub provider_length:    U16,
    pub unsupported_offset: U16,
    pub unsupported_length: U16,
    pub reserved_3:         U16,
    pub reserved_4:         U16,
}

const _: () = assert!(std::mem::size_of::<HeaderFields>() == HEADER_SIZE as usize);

#[repr(C)]
#[derive(IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct StringRecord {
    pub id:     U16,
    pub length: U16,
}

#[repr(C)]
#[derive(IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct DirectoryRecord {
    pub id:     U16,
    pub length: U16,
}

#[repr(C)]
#[derive(IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct FileRecord {
    pub id:          U16,
    pub directory:   U16,
    pub payload:     U16,
    pub flags:       U32,
    pub name_length: U16,
}

#[repr(C)]
#[derive(IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct LinkRecord {
    pub id:          U16,
    pub reserved:    U16,
    pub base:        U16,
    pub target:      U16,
    pub kind:        U16,
    pub path_length: U16,
}

/// Writes a zero-terminated list of 16-bit ids.
pub fn write_id_list<W: std::io::Write>(sink: &mut W, ids: &[u16]) -> std::io::Result<()> {
    for id in ids {
        sink.write_all(&id.to_le_bytes())?;
    }
    sink.write_all(&0u16.to_le_bytes())
}

/// Byte length of an encoded id list, terminator included.
pub fn id_list_len(ids: &[u16]) -> usize { 2 * ids.len() + 2 }
