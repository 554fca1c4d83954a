use crate::raster::{read_png_size, PNG_SIGNATURE};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Seek, SeekFrom};

//===========================================================================//

/// The size of the ICONDIR header, in bytes.
pub const HEADER_LEN: u32 = 6;

/// The size of one ICONDIRENTRY, in bytes.
pub const ENTRY_LEN: u32 = 16;

// Fixed field values written into every directory entry.
const NUM_COLORS: u8 = 0;
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// The type of resource stored in an ICO/CUR file.  Only icons are ever
/// written, but either kind can be read.
pub enum ResourceType {
    /// Plain images (ICO files)
    Icon,
    /// Images with cursor hotspots (CUR files)
    Cursor,
}

impl ResourceType {
    pub(crate) fn from_number(number: u16) -> Option<ResourceType> {
        match number {
            1 => Some(ResourceType::Icon),
            2 => Some(ResourceType::Cursor),
            _ => None,
        }
    }

    pub(crate) fn number(&self) -> u16 {
        match *self {
            ResourceType::Icon => 1,
            ResourceType::Cursor => 2,
        }
    }
}

//===========================================================================//

/// How the one-byte width and height fields of a directory entry are derived
/// from an image's pixel size.  A byte of zero means "256 or more".
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum SizeByteRule {
    /// Both bytes are zero when the *width* is 256 or more, whatever the
    /// height; otherwise each byte is derived from its own dimension.  This
    /// matches icons produced by earlier releases of the icon export tool,
    /// even for non-square images.
    #[default]
    WidthKeyed,
    /// Each byte is derived from its own dimension.
    PerAxis,
}

impl SizeByteRule {
    /// Returns the `(width, height)` bytes to store for an image of the given
    /// pixel size.
    pub fn size_bytes(&self, width: u32, height: u32) -> (u8, u8) {
        match *self {
            SizeByteRule::WidthKeyed => {
                if width > 255 {
                    (0, 0)
                } else {
                    (width as u8, size_byte(height))
                }
            }
            SizeByteRule::PerAxis => (size_byte(width), size_byte(height)),
        }
    }
}

fn size_byte(size: u32) -> u8 {
    if size > 255 {
        0
    } else {
        size as u8
    }
}

//===========================================================================//

/// Returns the 6-byte ICONDIR header for an icon file with `count` images.
pub fn header_bytes(count: u16) -> [u8; HEADER_LEN as usize] {
    let mut header = [0u8; HEADER_LEN as usize];
    // Bytes 0-1 are reserved and stay zero.
    LittleEndian::write_u16(&mut header[2..4], ResourceType::Icon.number());
    LittleEndian::write_u16(&mut header[4..6], count);
    header
}

/// Returns one 16-byte ICONDIRENTRY for an embedded 32-bit image whose
/// payload is `data_size` bytes long and starts `data_offset` bytes into the
/// file.
pub fn entry_bytes(
    (width, height): (u8, u8),
    data_size: u32,
    data_offset: u32,
) -> [u8; ENTRY_LEN as usize] {
    let mut entry = [0u8; ENTRY_LEN as usize];
    entry[0] = width;
    entry[1] = height;
    entry[2] = NUM_COLORS;
    // Byte 3 is reserved and stays zero.
    LittleEndian::write_u16(&mut entry[4..6], COLOR_PLANES);
    LittleEndian::write_u16(&mut entry[6..8], BITS_PER_PIXEL);
    LittleEndian::write_u32(&mut entry[8..12], data_size);
    LittleEndian::write_u32(&mut entry[12..16], data_offset);
    entry
}

//===========================================================================//

/// The parsed contents of an ICO or CUR file.
#[derive(Clone, Debug)]
pub struct IconDir {
    restype: ResourceType,
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Returns the type of resource stored in this file, either icons or
    /// cursors.
    pub fn resource_type(&self) -> ResourceType {
        self.restype
    }

    /// Returns the entries in this file, in directory order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Reads an ICO or CUR file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_data!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        let restype = match ResourceType::from_number(restype) {
            Some(restype) => restype,
            None => invalid_data!("Invalid resource type ({})", restype),
        };
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        let mut sizes = Vec::<u32>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                invalid_data!(
                    "Invalid reserved field value in ICONDIRENTRY \
                     (was {}, but must be 0)",
                    reserved
                );
            }
            let color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            // A size byte of zero stands for 256 or more.  Start from that
            // guess and replace it with the real size from the PNG data
            // below, when there is any.
            let width = if width_byte == 0 { 256 } else { width_byte as u32 };
            let height =
                if height_byte == 0 { 256 } else { height_byte as u32 };
            entries.push(IconDirEntry {
                width_byte,
                height_byte,
                width,
                height,
                num_colors,
                color_planes,
                bits_per_pixel,
                data_offset,
                data: Vec::new(),
            });
            sizes.push(data_size);
        }
        for (entry, &data_size) in entries.iter_mut().zip(sizes.iter()) {
            reader.seek(SeekFrom::Start(entry.data_offset as u64))?;
            let mut data = vec![0u8; data_size as usize];
            reader.read_exact(&mut data)?;
            entry.data = data;
            if entry.is_png() {
                // Leave the guess in place if the PNG is malformed.
                if let Ok((width, height)) = read_png_size(&entry.data) {
                    entry.width = width;
                    entry.height = height;
                }
            }
        }
        Ok(IconDir { restype, entries })
    }
}

//===========================================================================//

/// One entry in an ICO or CUR file.
#[derive(Clone, Debug)]
pub struct IconDirEntry {
    width_byte: u8,
    height_byte: u8,
    width: u32,
    height: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data_offset: u32,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Returns the width of the image, in pixels.  For PNG payloads this is
    /// the width stored in the PNG itself.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.  For PNG payloads this is
    /// the height stored in the PNG itself.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the raw width byte from the directory entry.
    pub fn width_byte(&self) -> u8 {
        self.width_byte
    }

    /// Returns the raw height byte from the directory entry.
    pub fn height_byte(&self) -> u8 {
        self.height_byte
    }

    /// Returns the palette size byte (zero for true-color images).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the value of the color planes field.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the value of the bits-per-pixel field.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the absolute byte offset of the payload within the file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    /// Returns true if the payload is a PNG image.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Returns the raw, encoded payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

//===========================================================================//


//===========================================================================//
