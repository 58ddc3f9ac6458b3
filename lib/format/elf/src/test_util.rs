//! Construction of small in-memory ELF32 images for tests.

use std::vec::Vec;

use crate::section_header::{SectionFlags, SectionType};

/// A section to be emitted by an [`ImageBuilder`].
struct PendingSection {
    name: &'static str,
    kind: SectionType,
    address: u32,
    data: Vec<u8>,
}

/// Builds an ELF32 executable with a null section, the requested sections, and a trailing
/// `.shstrtab`, laid out as header, section contents, then the section header table.
pub struct ImageBuilder {
    big_endian: bool,
    entry: u32,
    sections: Vec<PendingSection>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self {
            big_endian: false,
            entry: 0,
            sections: Vec::new(),
        }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn entry(mut self, entry: u32) -> Self {
        self.entry = entry;
        self
    }

    pub fn section(self, name: &'static str, address: u32, data: &[u8]) -> Self {
        self.section_with_type(name, SectionType::PROGBITS, address, data)
    }

    pub fn section_with_type(
        mut self,
        name: &'static str,
        kind: SectionType,
        address: u32,
        data: &[u8],
    ) -> Self {
        self.sections.push(PendingSection {
            name,
            kind,
            address,
            data: data.to_vec(),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut names = Vec::from([0u8]);
        let mut name_offsets = Vec::new();
        for section in &self.sections {
            name_offsets.push(len_u32(&names));
            names.extend_from_slice(section.name.as_bytes());
            names.push(0);
        }
        let shstrtab_name = len_u32(&names);
        names.extend_from_slice(b".shstrtab\0");

        let mut image = Vec::new();
        image.resize(52, 0);

        let mut data_offsets = Vec::new();
        for section in &self.sections {
            data_offsets.push(len_u32(&image));
            if section.kind != SectionType::NOBITS {
                image.extend_from_slice(&section.data);
            }
        }
        let shstrtab_offset = len_u32(&image);
        image.extend_from_slice(&names);
        while image.len() % 4 != 0 {
            image.push(0);
        }

        let table_offset = len_u32(&image);
        let section_count = self.sections.len() + 2;
        let mut headers = Vec::new();
        headers.push([0u32; 10]);
        for (index, section) in self.sections.iter().enumerate() {
            let flags = match section.kind {
                SectionType::NOBITS => SectionFlags::WRITE.0 | SectionFlags::ALLOC.0,
                _ => SectionFlags::ALLOC.0 | SectionFlags::EXECINSTR.0,
            };
            headers.push([
                name_offsets[index],
                section.kind.0,
                flags,
                section.address,
                data_offsets[index],
                u32::try_from(section.data.len()).unwrap(),
                0,
                0,
                2,
                0,
            ]);
        }
        headers.push([
            shstrtab_name,
            SectionType::STRTAB.0,
            0,
            0,
            shstrtab_offset,
            len_u32(&names),
            0,
            0,
            1,
            0,
        ]);
        for header in headers {
            for field in header {
                self.put_u32(&mut image, field);
            }
        }

        let mut header = Vec::new();
        header.extend_from_slice(&[0x7F, b'E', b'L', b'F', 1]);
        header.push(if self.big_endian { 2 } else { 1 });
        header.push(1);
        header.resize(16, 0);
        self.put_u16(&mut header, 2); // ET_EXEC
        self.put_u16(&mut header, 0);
        self.put_u32(&mut header, 1);
        self.put_u32(&mut header, self.entry);
        self.put_u32(&mut header, 0);
        self.put_u32(&mut header, table_offset);
        self.put_u32(&mut header, 0);
        self.put_u16(&mut header, 52);
        self.put_u16(&mut header, 32);
        self.put_u16(&mut header, 0);
        self.put_u16(&mut header, 40);
        self.put_u16(&mut header, u16::try_from(section_count).unwrap());
        self.put_u16(&mut header, u16::try_from(section_count - 1).unwrap());
        image[..52].copy_from_slice(&header);

        image
    }

    fn put_u16(&self, buffer: &mut Vec<u8>, value: u16) {
        if self.big_endian {
            buffer.extend_from_slice(&value.to_be_bytes());
        } else {
            buffer.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn put_u32(&self, buffer: &mut Vec<u8>, value: u32) {
        if self.big_endian {
            buffer.extend_from_slice(&value.to_be_bytes());
        } else {
            buffer.extend_from_slice(&value.to_le_bytes());
        }
    }
}

fn len_u32(buffer: &[u8]) -> u32 {
    u32::try_from(buffer.len()).unwrap()
}

/// Returns the section header table offset of a little-endian image.
pub fn section_header_offset(image: &[u8]) -> u64 {
    u64::from(u32::from_le_bytes(image[32..36].try_into().unwrap()))
}

/// Overwrites the little-endian `u16` at `offset`.
pub fn patch_u16(image: &mut [u8], offset: usize, value: u16) {
    image[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Overwrites the little-endian `u32` at `offset`.
pub fn patch_u32(image: &mut [u8], offset: u64, value: u32) {
    let offset = usize::try_from(offset).unwrap();
    image[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
