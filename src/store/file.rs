use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{InventoryError, Result};

use super::codec::{decode_lenient, encode};
use super::inventory::Inventory;

/// Text of one raw line. Bytes that are not UTF-8 are read as Latin-1 so every
/// character survives the next save.
fn line_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().copied().map(char::from).collect()),
    }
}

impl Inventory {
    /// Decode boats from any line-oriented source. Whitespace-only lines are
    /// skipped and reading stops once `capacity` boats are held; the rest of
    /// the source is ignored. A read error ends the load early with the boats
    /// decoded so far.
    pub fn read_from<R: BufRead>(reader: R, capacity: usize) -> Self {
        let mut inventory = Inventory::new(capacity);
        let mut lines = reader.split(b'\n').enumerate();

        while !inventory.is_full() {
            let Some((idx, line)) = lines.next() else { break };
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(line = idx + 1, %err, kept = inventory.len(), "read failed, keeping boats read so far");
                    return inventory;
                }
            };
            let text = line_text(&line);
            if let Cow::Owned(_) = text {
                warn!(line = idx + 1, "record is not valid UTF-8, read as Latin-1");
            }
            if text.trim().is_empty() {
                continue;
            }
            if inventory.push(decode_lenient(&text)).is_err() {
                break;
            }
        }

        let ignored = lines
            .map_while(|(_, line)| line.ok())
            .filter(|line| !line_text(line).trim().is_empty())
            .count();
        if ignored > 0 {
            warn!(capacity, ignored, "inventory full, remaining records ignored");
        }

        inventory
    }

    /// Load the inventory from `path`. A file that is missing or unreadable
    /// yields an empty inventory; the problem is logged, not returned.
    pub fn load(path: &Path, capacity: usize) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                warn!(path = %path.display(), %err, "could not open data file, starting empty");
                return Inventory::new(capacity);
            }
        };

        let inventory = Inventory::read_from(BufReader::new(file), capacity);
        info!(path = %path.display(), boats = inventory.len(), "inventory loaded");
        inventory
    }

    /// Write one record per boat, in the current order.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for boat in self.iter() {
            writeln!(writer, "{}", encode(boat))?;
        }
        writer.flush()
    }

    /// Replace the file at `path` with the current inventory. The records go
    /// to a temporary file beside the destination which is then renamed over
    /// it, so a failed save leaves the previous file intact.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let tmp = NamedTempFile::new_in(dir).map_err(|err| InventoryError::io(path, err))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            self.write_to(&mut writer)
                .map_err(|err| InventoryError::io(path, err))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|err| InventoryError::io(path, err))?;
        tmp.persist(path)
            .map_err(|err| InventoryError::io(path, err.error))?;

        info!(path = %path.display(), boats = self.len(), "inventory saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;
    use crate::models::{Location, Money};

    #[test]
    fn read_skips_blank_lines() {
        let data = "Alpha,20,slip,1,10.00\n\n   \nBravo,15,land,A,0.00\n";
        let inventory = Inventory::read_from(Cursor::new(data), 10);
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.boats()[1].location, Location::Land('A'));
    }

    #[test]
    fn read_stops_at_capacity() {
        let data: String = (0..5).map(|i| format!("Boat {i},10,slip,{i},0.00\n")).collect();
        let inventory = Inventory::read_from(Cursor::new(data), 3);
        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory.boats()[2].name, "Boat 2");
    }

    #[test]
    fn read_handles_missing_trailing_newline() {
        let inventory = Inventory::read_from(Cursor::new("Alpha,20,storage,9,3.50"), 10);
        assert_eq!(inventory.boats()[0].amount_owed, Money::from_cents(350));
    }

    struct BrokenSource;

    impl Read for BrokenSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk went away"))
        }
    }

    #[test]
    fn read_error_keeps_boats_already_decoded() {
        let data = Cursor::new("Alpha,20,slip,1,0.00\nBravo,15,land,A,0.00\n").chain(BrokenSource);
        let inventory = Inventory::read_from(BufReader::new(data), 10);
        let names: Vec<_> = inventory.iter().map(|boat| boat.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Bravo"]);
    }

    #[test]
    fn latin1_records_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("boats.csv");
        std::fs::write(&path, b"Se\xf1ora,20,slip,1,0.00\nPlain,10,slip,2,0.00\n").unwrap();

        let inventory = Inventory::load(&path, 10);
        assert_eq!(inventory.boats()[0].name, "Se\u{f1}ora");
        assert_eq!(inventory.boats()[1].name, "Plain");

        inventory.save(&path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved, "Se\u{f1}ora,20,slip,1,0.00\nPlain,10,slip,2,0.00\n");
        assert!(!saved.contains(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn write_emits_one_line_per_boat() {
        let mut inventory = Inventory::default();
        inventory.add_record("Alpha,20,slip,1,10").unwrap();
        inventory.add_record("Bravo,15,trailor,XY-1,0.5").unwrap();

        let mut out = Vec::new();
        inventory.write_to(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Alpha,20,slip,1,10.00\nBravo,15,trailor,XY-1,0.50\n"
        );
    }
}
