//! Binary NBT reader/writer, generic over byte order
//!
//! Both editions share one tag grammar and differ only in endianness: Java
//! writes big-endian, Bedrock little-endian. The envelope wire format is the
//! Bedrock encoding with a named (empty-name) root compound.

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use super::{Compound, NbtError, Tag, MAX_DEPTH};

const TAG_END: u8 = 0;
const TAG_COMPOUND: u8 = 10;

/// Decode a little-endian (Bedrock) NBT document with a named root compound.
pub fn read_le(bytes: &[u8]) -> Result<Compound, NbtError> {
    read_root::<LittleEndian>(bytes)
}

/// Decode a big-endian (Java) NBT document with a named root compound.
pub fn read_be(bytes: &[u8]) -> Result<Compound, NbtError> {
    read_root::<BigEndian>(bytes)
}

/// Encode a compound as a little-endian (Bedrock) NBT document.
pub fn write_le(root: &Compound) -> Result<Vec<u8>, NbtError> {
    write_root::<LittleEndian>(root)
}

/// Encode a compound as a big-endian (Java) NBT document.
pub fn write_be(root: &Compound) -> Result<Vec<u8>, NbtError> {
    write_root::<BigEndian>(root)
}

fn read_root<E: ByteOrder>(bytes: &[u8]) -> Result<Compound, NbtError> {
    let mut cursor = Cursor::new(bytes);
    let id = cursor.read_u8().map_err(|_| NbtError::UnexpectedEof)?;
    if id != TAG_COMPOUND {
        return Err(NbtError::InvalidRoot(id));
    }
    // Root name is read and discarded; writers emit an empty name.
    read_string::<E>(&mut cursor)?;
    match read_payload::<E>(&mut cursor, TAG_COMPOUND, 0)? {
        Tag::Compound(compound) => Ok(compound),
        _ => unreachable!("compound id decodes to a compound tag"),
    }
}

fn write_root<E: ByteOrder>(root: &Compound) -> Result<Vec<u8>, NbtError> {
    let mut out = Vec::new();
    out.write_u8(TAG_COMPOUND)?;
    write_string::<E>(&mut out, "")?;
    write_compound::<E>(&mut out, root)?;
    Ok(out)
}

fn read_payload<E: ByteOrder>(
    cursor: &mut Cursor<&[u8]>,
    id: u8,
    depth: usize,
) -> Result<Tag, NbtError> {
    if depth > MAX_DEPTH {
        return Err(NbtError::DepthLimit);
    }

    let eof = |_| NbtError::UnexpectedEof;
    match id {
        1 => Ok(Tag::Byte(cursor.read_i8().map_err(eof)?)),
        2 => Ok(Tag::Short(cursor.read_i16::<E>().map_err(eof)?)),
        3 => Ok(Tag::Int(cursor.read_i32::<E>().map_err(eof)?)),
        4 => Ok(Tag::Long(cursor.read_i64::<E>().map_err(eof)?)),
        5 => Ok(Tag::Float(cursor.read_f32::<E>().map_err(eof)?)),
        6 => Ok(Tag::Double(cursor.read_f64::<E>().map_err(eof)?)),
        7 => {
            let len = read_len::<E>(cursor)?;
            let mut buf = vec![0u8; len];
            cursor.read_exact(&mut buf).map_err(eof)?;
            Ok(Tag::ByteArray(buf.into_iter().map(|b| b as i8).collect()))
        }
        8 => Ok(Tag::String(read_string::<E>(cursor)?)),
        9 => {
            let element_id = cursor.read_u8().map_err(eof)?;
            let len = read_len::<E>(cursor)?;
            if element_id == TAG_END && len > 0 {
                return Err(NbtError::UnknownTagId(TAG_END));
            }
            let mut items = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                items.push(read_payload::<E>(cursor, element_id, depth + 1)?);
            }
            Ok(Tag::List(items))
        }
        10 => {
            let mut compound = Compound::new();
            loop {
                let entry_id = cursor.read_u8().map_err(eof)?;
                if entry_id == TAG_END {
                    break;
                }
                let name = read_string::<E>(cursor)?;
                let value = read_payload::<E>(cursor, entry_id, depth + 1)?;
                compound.put(name, value);
            }
            Ok(Tag::Compound(compound))
        }
        11 => {
            let len = read_len::<E>(cursor)?;
            let mut values = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                values.push(cursor.read_i32::<E>().map_err(eof)?);
            }
            Ok(Tag::IntArray(values))
        }
        12 => {
            let len = read_len::<E>(cursor)?;
            let mut values = Vec::with_capacity(len.min(1024));
            for _ in 0..len {
                values.push(cursor.read_i64::<E>().map_err(eof)?);
            }
            Ok(Tag::LongArray(values))
        }
        other => Err(NbtError::UnknownTagId(other)),
    }
}

fn write_payload<E: ByteOrder>(out: &mut Vec<u8>, tag: &Tag) -> Result<(), NbtError> {
    match tag {
        Tag::Byte(v) => out.write_i8(*v)?,
        Tag::Short(v) => out.write_i16::<E>(*v)?,
        Tag::Int(v) => out.write_i32::<E>(*v)?,
        Tag::Long(v) => out.write_i64::<E>(*v)?,
        Tag::Float(v) => out.write_f32::<E>(*v)?,
        Tag::Double(v) => out.write_f64::<E>(*v)?,
        Tag::ByteArray(bytes) => {
            out.write_i32::<E>(bytes.len() as i32)?;
            out.write_all(&bytes.iter().map(|b| *b as u8).collect::<Vec<u8>>())?;
        }
        Tag::String(s) => write_string::<E>(out, s)?,
        Tag::List(items) => {
            // Empty lists carry TAG_End as their element id.
            let element_id = items.first().map(Tag::id).unwrap_or(TAG_END);
            let expected = items.first().map(Tag::kind_name).unwrap_or("End");
            out.write_u8(element_id)?;
            out.write_i32::<E>(items.len() as i32)?;
            for item in items {
                if item.id() != element_id {
                    return Err(NbtError::MixedList {
                        expected,
                        found: item.kind_name(),
                    });
                }
                write_payload::<E>(out, item)?;
            }
        }
        Tag::Compound(compound) => write_compound::<E>(out, compound)?,
        Tag::IntArray(values) => {
            out.write_i32::<E>(values.len() as i32)?;
            for v in values {
                out.write_i32::<E>(*v)?;
            }
        }
        Tag::LongArray(values) => {
            out.write_i32::<E>(values.len() as i32)?;
            for v in values {
                out.write_i64::<E>(*v)?;
            }
        }
    }
    Ok(())
}

fn write_compound<E: ByteOrder>(out: &mut Vec<u8>, compound: &Compound) -> Result<(), NbtError> {
    for (name, value) in compound.iter() {
        out.write_u8(value.id())?;
        write_string::<E>(out, name)?;
        write_payload::<E>(out, value)?;
    }
    out.write_u8(TAG_END)?;
    Ok(())
}

fn read_len<E: ByteOrder>(cursor: &mut Cursor<&[u8]>) -> Result<usize, NbtError> {
    let len = cursor
        .read_i32::<E>()
        .map_err(|_| NbtError::UnexpectedEof)?;
    if len < 0 {
        return Err(NbtError::NegativeLength(len));
    }
    let len = len as usize;
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(NbtError::UnexpectedEof);
    }
    Ok(len)
}

fn read_string<E: ByteOrder>(cursor: &mut Cursor<&[u8]>) -> Result<String, NbtError> {
    let len = cursor
        .read_u16::<E>()
        .map_err(|_| NbtError::UnexpectedEof)? as usize;
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(NbtError::UnexpectedEof);
    }
    let mut buf = vec![0u8; len];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| NbtError::UnexpectedEof)?;
    Ok(String::from_utf8(buf)?)
}

fn write_string<E: ByteOrder>(out: &mut Vec<u8>, s: &str) -> Result<(), NbtError> {
    // The length prefix is a u16; longer strings cannot be encoded.
    let len = u16::try_from(s.len()).map_err(|_| NbtError::StringTooLong { len: s.len() })?;
    out.write_u16::<E>(len)?;
    out.write_all(s.as_bytes())?;
    Ok(())
}
