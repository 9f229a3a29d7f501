//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in column families.

use questboard_core::StudentId;

/// Length of a student key.
pub const STUDENT_KEY_LEN: usize = 16;

/// Length of a `student_id || catalog_id` key.
pub const STUDENT_RECORD_KEY_LEN: usize = STUDENT_KEY_LEN + 4;

/// Create a student key from a student ID.
#[must_use]
pub fn student_key(student_id: &StudentId) -> Vec<u8> {
    student_id.as_bytes().to_vec()
}

/// Decode a student ID from a 16-byte key or index value.
#[must_use]
pub fn decode_student_id(bytes: &[u8]) -> Option<StudentId> {
    let bytes: [u8; 16] = bytes.try_into().ok()?;
    Some(StudentId::from_bytes(bytes))
}

/// Create a unique-index key for a name or email.
#[must_use]
pub fn unique_key(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// Create a catalog key from a catalog id's big-endian bytes.
#[must_use]
pub fn catalog_key(id_bytes: [u8; 4]) -> Vec<u8> {
    id_bytes.to_vec()
}

/// Create a per-student record key.
///
/// Format: `student_id (16 bytes) || catalog_id (4 bytes, big-endian)`
///
/// Records for a student are therefore contiguous and sorted by catalog id.
#[must_use]
pub fn student_record_key(student_id: &StudentId, id_bytes: [u8; 4]) -> Vec<u8> {
    let mut key = Vec::with_capacity(STUDENT_RECORD_KEY_LEN);
    key.extend_from_slice(student_id.as_bytes());
    key.extend_from_slice(&id_bytes);
    key
}

/// Create a prefix for iterating all records of a student.
#[must_use]
pub fn student_records_prefix(student_id: &StudentId) -> Vec<u8> {
    student_id.as_bytes().to_vec()
}

/// Create a mission trigger index key.
///
/// Format: `trigger (utf-8) || 0x00 || mission_id (4 bytes)`
#[must_use]
pub fn trigger_key(trigger: &str, mission_id_bytes: [u8; 4]) -> Vec<u8> {
    let mut key = trigger_prefix(trigger);
    key.extend_from_slice(&mission_id_bytes);
    key
}

/// Create the prefix for iterating the missions of one trigger.
#[must_use]
pub fn trigger_prefix(trigger: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(trigger.len() + 5);
    key.extend_from_slice(trigger.as_bytes());
    key.push(0);
    key
}

/// Extract the trailing 4-byte catalog id from a record or index key.
#[must_use]
pub fn trailing_catalog_id(key: &[u8]) -> Option<[u8; 4]> {
    let start = key.len().checked_sub(4)?;
    key[start..].try_into().ok()
}
