//! Helpers shared by the integration tests.

#![allow(dead_code, missing_docs)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

/// `SHT_PROGBITS`.
pub const PROGBITS: u32 = 1;
/// `SHT_STRTAB`.
pub const STRTAB: u32 = 3;

/// A section to be emitted into an image.
struct Section {
    name: &'static str,
    kind: u32,
    address: u32,
    data: Vec<u8>,
}

/// Builds little-endian ELF32 executables: header, section contents, `.shstrtab`, then the
/// section header table with a leading null entry.
pub struct Image {
    class: u8,
    sections: Vec<Section>,
}

impl Image {
    pub fn new() -> Self {
        Self {
            class: 1,
            sections: Vec::new(),
        }
    }

    /// Marks the image as 64-bit in its identification bytes only.
    pub fn class64(mut self) -> Self {
        self.class = 2;
        self
    }

    pub fn section(mut self, name: &'static str, address: u32, data: &[u8]) -> Self {
        self.sections.push(Section {
            name,
            kind: PROGBITS,
            address,
            data: data.to_vec(),
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut names = vec![0u8];
        let mut name_offsets = Vec::new();
        for section in &self.sections {
            name_offsets.push(len_u32(&names));
            names.extend_from_slice(section.name.as_bytes());
            names.push(0);
        }
        let shstrtab_name = len_u32(&names);
        names.extend_from_slice(b".shstrtab\0");

        let mut image = vec![0u8; 52];
        let mut data_offsets = Vec::new();
        for section in &self.sections {
            data_offsets.push(len_u32(&image));
            image.extend_from_slice(&section.data);
        }
        let shstrtab_offset = len_u32(&image);
        image.extend_from_slice(&names);
        while image.len() % 4 != 0 {
            image.push(0);
        }

        let table_offset = len_u32(&image);
        let count = u16::try_from(self.sections.len() + 2).unwrap();

        image.extend_from_slice(&[0; 40]);
        for (index, section) in self.sections.iter().enumerate() {
            push_header(
                &mut image,
                [
                    name_offsets[index],
                    section.kind,
                    0x6,
                    section.address,
                    data_offsets[index],
                    len_u32(&section.data),
                    0,
                    0,
                    2,
                    0,
                ],
            );
        }
        push_header(
            &mut image,
            [
                shstrtab_name,
                STRTAB,
                0,
                0,
                shstrtab_offset,
                len_u32(&names),
                0,
                0,
                1,
                0,
            ],
        );

        image[..7].copy_from_slice(&[0x7F, b'E', b'L', b'F', self.class, 1, 1]);
        image[16..18].copy_from_slice(&2u16.to_le_bytes());
        image[20..24].copy_from_slice(&1u32.to_le_bytes());
        image[32..36].copy_from_slice(&table_offset.to_le_bytes());
        image[40..42].copy_from_slice(&52u16.to_le_bytes());
        image[46..48].copy_from_slice(&40u16.to_le_bytes());
        image[48..50].copy_from_slice(&count.to_le_bytes());
        image[50..52].copy_from_slice(&(count - 1).to_le_bytes());

        image
    }
}

fn push_header(image: &mut Vec<u8>, fields: [u32; 10]) {
    for field in fields {
        image.extend_from_slice(&field.to_le_bytes());
    }
}

fn len_u32(buffer: &[u8]) -> u32 {
    u32::try_from(buffer.len()).unwrap()
}

/// A file in the temporary directory that is removed when dropped.
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(contents: &[u8]) -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);

        let path = std::env::temp_dir().join(format!(
            "elf2rom-test-{}-{}.elf",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&path, contents).unwrap();

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
