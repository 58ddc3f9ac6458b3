//! Code section selection over complete images.

mod common;

use common::Image;
use elf::ident::Class;
use elf2rom::code::{DecodeError, find_code_section};

#[test]
fn selects_text_by_name() {
    let image = Image::new()
        .section(".data", 0x100, &[0xEE; 6])
        .section(".text", 0, &[0xAA, 0xBB, 0xCC, 0xDD])
        .build();

    let code = find_code_section(&image).unwrap().unwrap();

    assert_eq!(code.index(), 2);
    assert_eq!(code.bytes(), [0xAA, 0xBB, 0xCC, 0xDD]);
    assert!(code.words().eq([0xBBAA, 0xDDCC]));
}

#[test]
fn first_text_wins() {
    let image = Image::new()
        .section(".text", 0, &[0x01, 0x00])
        .section(".text", 0x40, &[0x02, 0x00])
        .build();

    let code = find_code_section(&image).unwrap().unwrap();

    assert_eq!(code.index(), 1);
    assert!(code.words().eq([0x0001]));
}

#[test]
fn similar_names_do_not_match() {
    let image = Image::new()
        .section(".text.startup", 0, &[0x01, 0x00])
        .section(".tex", 0, &[0x02, 0x00])
        .build();

    assert_eq!(find_code_section(&image), Ok(None));
}

#[test]
fn no_sections() {
    let image = Image::new().build();

    assert_eq!(find_code_section(&image), Ok(None));
}

#[test]
fn nonzero_load_address() {
    let image = Image::new().section(".text", 0x8000, &[0; 4]).build();

    assert_eq!(
        find_code_section(&image),
        Err(DecodeError::UnsupportedLoadAddress { address: 0x8000 })
    );
}

#[test]
fn elf64_is_rejected() {
    let image = Image::new().class64().section(".text", 0, &[0; 4]).build();

    let error = find_code_section(&image).unwrap_err();
    assert_eq!(error, DecodeError::UnsupportedWordSize(Class::CLASS64));
    assert_ne!(
        error.to_string(),
        DecodeError::NotRecognizedFormat([0; 4]).to_string()
    );
}

#[test]
fn corrupted_magic_is_rejected() {
    let mut image = Image::new().section(".text", 0, &[0; 4]).build();
    image[1] = b'X';

    assert_eq!(
        find_code_section(&image),
        Err(DecodeError::NotRecognizedFormat([0x7F, b'X', b'L', b'F']))
    );
}

#[test]
fn odd_length_drops_trailing_byte() {
    let image = Image::new()
        .section(".text", 0, &[0x34, 0x12, 0x78, 0x56, 0x9A])
        .build();

    let code = find_code_section(&image).unwrap().unwrap();

    assert_eq!(code.words().len(), 2);
    assert_eq!(code.words().remainder(), Some(0x9A));
}

#[test]
fn truncated_section_contents() {
    let mut image = Image::new().section(".text", 0, &[0; 4]).build();
    // Size field of the `.text` section header.
    let table_offset = usize::try_from(u32::from_le_bytes(image[32..36].try_into().unwrap()))
        .unwrap();
    let size_offset = table_offset + 40 + 20;
    image[size_offset..size_offset + 4].copy_from_slice(&0x1000u32.to_le_bytes());

    assert!(matches!(
        find_code_section(&image),
        Err(DecodeError::OutOfBounds(_))
    ));
}

#[test]
fn truncated_header() {
    let image = Image::new().section(".text", 0, &[0; 4]).build();

    assert!(matches!(
        find_code_section(&image[..30]),
        Err(DecodeError::OutOfBounds(_))
    ));
}
