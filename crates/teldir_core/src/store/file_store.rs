//! File-backed directory store.
//!
//! # Responsibility
//! - Keep an in-memory position -> slot index over the record file.
//! - Append and overwrite slots in place where the byte length allows.
//! - Rewrite the whole file through a scoped temp file for deletes and
//!   length-changing updates.
//!
//! # Invariants
//! - `slots[i]` covers exactly the bytes of entry `i + 1`, terminator included.
//! - `end` is the file length as last written by this store.
//! - A rewrite that fails before the rename leaves the file and index untouched.

use super::{DirectoryStore, OpenMode, Position, SessionCounters, StoreError, StoreResult};
use crate::codec::record::{decode_line, encode_entry, is_header, HEADER_LINE};
use crate::model::entry::Entry;
use log::{debug, error, info, warn};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    offset: u64,
    len: u64,
}

/// Directory store over a single line-oriented record file.
#[derive(Debug)]
pub struct FileDirectoryStore {
    path: PathBuf,
    file: File,
    slots: Vec<Slot>,
    end: u64,
    session: SessionCounters,
}

impl FileDirectoryStore {
    /// Opens the directory file at `path`.
    ///
    /// # Errors
    /// - `StorageUnavailable` when the file cannot be opened or created.
    /// - `InvalidData` when `OpenMode::Persist` finds malformed content.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        if mode == OpenMode::Truncate {
            options.truncate(true);
        }

        let file = options
            .open(&path)
            .map_err(|source| StoreError::StorageUnavailable {
                path: path.clone(),
                source,
            })?;

        let mut store = Self {
            path,
            file,
            slots: Vec::new(),
            end: 0,
            session: SessionCounters {
                next_entry_number: 1,
                deletes: 0,
            },
        };

        if store.file.metadata()?.len() == 0 {
            store.write_header()?;
        } else {
            store.load_index()?;
        }
        store.session.next_entry_number = store.slots.len() + 1;

        Ok(store)
    }

    /// Path of the backing directory file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_header(&mut self) -> StoreResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(HEADER_LINE.as_bytes())?;
        self.file.flush()?;
        self.end = HEADER_LINE.len() as u64;
        self.slots.clear();
        Ok(())
    }

    fn load_index(&mut self) -> StoreResult<()> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut reader = BufReader::new(&self.file);
        let mut line = String::new();

        let header_len = read_line(&mut reader, &mut line)?;
        if !is_header(&line) {
            return Err(StoreError::InvalidData(
                "first line is not the directory header".to_string(),
            ));
        }
        if !line.ends_with('\n') {
            return Err(StoreError::InvalidData(
                "directory header is not newline-terminated".to_string(),
            ));
        }

        let mut slots = Vec::new();
        let mut offset = header_len;
        loop {
            line.clear();
            let len = read_line(&mut reader, &mut line)?;
            if len == 0 {
                break;
            }
            let position = slots.len() + 1;
            if !line.ends_with('\n') {
                return Err(StoreError::InvalidData(format!(
                    "entry {position} is not newline-terminated"
                )));
            }
            decode_line(&line).map_err(|err| {
                StoreError::InvalidData(format!("entry {position}: {err}"))
            })?;
            slots.push(Slot { offset, len });
            offset += len;
        }

        self.slots = slots;
        self.end = offset;
        Ok(())
    }

    fn slot(&self, position: Position) -> StoreResult<Slot> {
        position
            .checked_sub(1)
            .and_then(|index| self.slots.get(index))
            .copied()
            .ok_or(StoreError::OutOfRange {
                position,
                len: self.slots.len(),
            })
    }

    fn read_slot(&mut self, slot: Slot) -> StoreResult<String> {
        let len = usize::try_from(slot.len)
            .map_err(|_| StoreError::InvalidData("record slot is too large".to_string()))?;
        let mut buffer = vec![0_u8; len];
        self.file.seek(SeekFrom::Start(slot.offset))?;
        self.file.read_exact(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|_| StoreError::InvalidData("record is not valid UTF-8".to_string()))
    }

    /// Raw record lines in position order, terminators included.
    fn read_records(&mut self) -> StoreResult<Vec<String>> {
        let slots = self.slots.clone();
        slots.into_iter().map(|slot| self.read_slot(slot)).collect()
    }

    /// Replaces the file with `HEADER_LINE` followed by `records`.
    ///
    /// The new content is staged in a temp file next to the directory file
    /// and renamed over it; the temp file is removed if anything fails. The
    /// persisted temp handle becomes the store handle, so nothing can fail
    /// between the rename and the index swap.
    fn replace_records(&mut self, records: &[String]) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut temp = NamedTempFile::new_in(&dir).map_err(StoreError::TempFileUnavailable)?;
        stage_records(&mut temp, records).map_err(StoreError::TempFileUnavailable)?;

        let mut slots = Vec::with_capacity(records.len());
        let mut offset = HEADER_LINE.len() as u64;
        for record in records {
            let len = record.len() as u64;
            slots.push(Slot { offset, len });
            offset += len;
        }

        let file = temp.persist(&self.path).map_err(|err| {
            error!(
                "event=store_rewrite module=store status=error error_code=rename_failed error={}",
                err.error
            );
            StoreError::Io(err.error)
        })?;

        self.file = file;
        self.slots = slots;
        self.end = offset;
        Ok(())
    }
}

impl DirectoryStore for FileDirectoryStore {
    fn insert(&mut self, entry: &Entry) -> StoreResult<Position> {
        entry.validate()?;
        let line = encode_entry(entry);

        let written = self
            .file
            .seek(SeekFrom::Start(self.end))
            .and_then(|_| self.file.write_all(line.as_bytes()))
            .and_then(|()| self.file.flush());
        if let Err(err) = written {
            // Drop any partial tail so the next append starts on a line boundary.
            if let Err(trim_err) = self.file.set_len(self.end) {
                warn!(
                    "event=entry_insert module=store status=error error_code=trim_failed error={}",
                    trim_err
                );
            }
            return Err(err.into());
        }

        let len = line.len() as u64;
        self.slots.push(Slot {
            offset: self.end,
            len,
        });
        self.end += len;
        self.session.next_entry_number += 1;

        let position = self.slots.len();
        debug!("event=entry_insert module=store status=ok position={position}");
        Ok(position)
    }

    fn get(&mut self, position: Position) -> StoreResult<Entry> {
        let slot = self.slot(position)?;
        let line = self.read_slot(slot)?;
        Ok(decode_line(&line)?)
    }

    fn update(&mut self, position: Position, entry: &Entry) -> StoreResult<()> {
        entry.validate()?;
        let slot = self.slot(position)?;
        let line = encode_entry(entry);

        if line.len() as u64 == slot.len {
            self.file.seek(SeekFrom::Start(slot.offset))?;
            self.file.write_all(line.as_bytes())?;
            self.file.flush()?;
            debug!("event=entry_update module=store status=ok mode=in_place position={position}");
            return Ok(());
        }

        let mut records = self.read_records()?;
        records[position - 1] = line;
        self.replace_records(&records)?;
        debug!("event=entry_update module=store status=ok mode=rewrite position={position}");
        Ok(())
    }

    fn delete(&mut self, position: Position) -> StoreResult<Entry> {
        self.slot(position)?;

        let mut records = self.read_records()?;
        let removed = decode_line(&records.remove(position - 1))?;
        self.replace_records(&records)?;
        self.session.deletes += 1;

        info!(
            "event=entry_delete module=store status=ok position={} remaining={}",
            position,
            self.slots.len()
        );
        Ok(removed)
    }

    fn list(&mut self) -> StoreResult<Vec<Entry>> {
        self.read_records()?
            .iter()
            .map(|line| decode_line(line).map_err(StoreError::from))
            .collect()
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn session(&self) -> SessionCounters {
        self.session
    }
}

fn read_line(reader: &mut impl BufRead, line: &mut String) -> StoreResult<u64> {
    match reader.read_line(line) {
        Ok(len) => Ok(len as u64),
        Err(err) if err.kind() == std::io::ErrorKind::InvalidData => Err(
            StoreError::InvalidData("directory file is not valid UTF-8".to_string()),
        ),
        Err(err) => Err(err.into()),
    }
}

fn stage_records(temp: &mut NamedTempFile, records: &[String]) -> std::io::Result<()> {
    temp.write_all(HEADER_LINE.as_bytes())?;
    for record in records {
        temp.write_all(record.as_bytes())?;
    }
    temp.flush()?;
    temp.as_file().sync_all()
}
